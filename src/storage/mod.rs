//! Storage layer
//!
//! The engine only ever reads: tables live in memory for the whole session.

pub mod memory;

pub use memory::{Dataset, Table};

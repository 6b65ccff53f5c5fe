use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    sql::{
        executor::ResultSet,
        parser::{is_select, Parser},
        plan::Plan,
        types::Record,
        validator,
    },
    storage::Dataset,
};

/// SQL engine over a read-only dataset.
///
/// Cloning is cheap and every entry point takes `&self`, so one engine can
/// serve any number of threads.
#[derive(Debug, Clone)]
pub struct Engine {
    dataset: Arc<Dataset>,
}

impl Engine {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Executes a SELECT statement
    pub fn execute(&self, sql: &str) -> Result<ResultSet> {
        if sql.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        if !is_select(sql) {
            return Err(Error::UnsupportedStatement);
        }

        let stmt = Parser::new(sql).parse()?;
        if self.dataset.get(&stmt.from.table).is_none() {
            return Err(Error::UnknownTable {
                name: stmt.from.table,
                available: self.dataset.table_names(),
            });
        }

        let rows = Plan::build(stmt).execute(&self.dataset)?;
        debug!(rows = rows.len(), "query executed");
        Ok(ResultSet::new(rows))
    }

    /// Executes a statement and reports the outcome in the shape the UI renders
    pub fn run(&self, sql: &str) -> QueryResult {
        self.execute(sql).into()
    }

    /// Whether `submitted` counts as the same query as `expected`
    pub fn is_equivalent(&self, submitted: &str, expected: &str) -> bool {
        validator::is_equivalent(submitted, expected)
    }
}

/// Outcome of a query: `{success: true, data, message}` or `{success: false, error}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<ResultSet>> for QueryResult {
    fn from(result: Result<ResultSet>) -> Self {
        match result {
            Ok(ResultSet { data, message }) => Self {
                success: true,
                data: Some(data),
                message: Some(message),
                error: None,
            },
            Err(err) => Self {
                success: false,
                data: None,
                message: None,
                error: Some(err.to_string()),
            },
        }
    }
}

use thiserror::Error;

/// Custom Result type for EcoDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for EcoDB
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Blank or whitespace-only query
    #[error("query cannot be empty")]
    EmptyQuery,
    /// Anything that does not start with SELECT
    #[error("only SELECT statements are supported")]
    UnsupportedStatement,
    /// Table missing from the dataset, with the tables that do exist
    #[error("table '{name}' does not exist. Available tables: {}", available.join(", "))]
    UnknownTable { name: String, available: Vec<String> },
    /// SQL parsing error
    #[error("parse error: {0}")]
    Parse(String),
    /// Failure while applying a clause
    #[error("error executing query: {0}")]
    Internal(String),
    /// Game configuration could not be loaded or is inconsistent
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Config(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Config(value.to_string())
    }
}

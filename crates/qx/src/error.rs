//! Error types for qx

use thiserror::Error;

/// Result type alias for qx operations
pub type QxResult<T> = Result<T, QxError>;

/// Error types for building, compiling and executing statements
#[derive(Debug, Error)]
pub enum QxError {
    /// A clause the statement cannot be rendered without was never set
    #[error("{clause} clause is missing for {statement}")]
    MissingClause {
        statement: &'static str,
        clause: &'static str,
    },

    /// A builder method received input it cannot normalize
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QxError {
    /// Create a missing clause error
    pub fn missing(statement: &'static str, clause: &'static str) -> Self {
        Self::MissingClause { statement, clause }
    }

    /// Create a malformed input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    /// Check if this is a missing clause error
    pub fn is_missing_clause(&self) -> bool {
        matches!(self, Self::MissingClause { .. })
    }

    /// Check if this is a malformed input error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }

    /// Wrap a driver error, keeping the server message when there is one.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return Self::Connection(err.to_string());
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for QxError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<serde_json::Error> for QxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

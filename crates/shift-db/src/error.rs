//! Error types for shift-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// A statement tried to take over transaction control (D004)
    #[error("[D004] Manual transaction control is not allowed in migrations: found '{statement}'. Transactions are managed by the migration runner")]
    TransactionControl { statement: String },

    /// SQL text could not be tokenized (D005)
    #[error("[D005] Could not tokenize SQL: {0}")]
    InvalidSql(String),

    /// Ledger row missing or duplicated (D006)
    #[error("[D006] Ledger inconsistency: {0}")]
    Ledger(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

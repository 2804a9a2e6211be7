//! Database connection wrapper.
//!
//! [`ShiftDb`] owns a DuckDB [`Connection`], creates the ledger table on
//! open, and runs closures inside a `BEGIN` / `COMMIT` transaction.

use crate::error::{DbError, DbResult};
use crate::executor::SchemaConnection;
use crate::ledger::ensure_tracking_table;
use duckdb::Connection;
use std::path::Path;

/// Wrapper around the DuckDB connection of the database being migrated.
///
/// Single-threaded; a run owns its `ShiftDb` exclusively.
pub struct ShiftDb {
    conn: Connection,
}

impl ShiftDb {
    /// Open (or create) the database at `path` and ensure the ledger table.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        log::debug!("Opened database {}", path.display());
        Self::from_connection(conn)
    }

    /// Create an in-memory database with the ledger table in place.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        ensure_tracking_table(&conn)?;
        Ok(Self { conn })
    }

    /// Borrow the underlying DuckDB connection for reads.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    ///
    /// `body` only ever sees a [`SchemaConnection`], so nothing it calls can
    /// commit or roll back on its own.
    pub fn transaction<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&SchemaConnection<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&SchemaConnection::new(&self.conn));

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    self.rollback();
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    ))
                    .into());
                }
            }
            Err(_) => self.rollback(),
        }
        result
    }

    fn rollback(&self) {
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            log::warn!("ROLLBACK failed: {e}");
        }
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;

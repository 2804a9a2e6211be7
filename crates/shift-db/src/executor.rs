//! The statement-execution handle given to migration units.

use crate::error::DbResult;
use crate::guard::{ensure_no_transaction_control, is_blank};
use duckdb::Connection;

/// A borrowed connection that is only ever handed out inside a transaction
/// owned by [`crate::ShiftDb::transaction`].
///
/// It exposes statement execution and a few catalog reads, never `BEGIN`,
/// `COMMIT`, or `ROLLBACK`. Every SQL string is also screened for
/// transaction-control statements before it reaches DuckDB, so a unit cannot
/// end the surrounding transaction by passing `COMMIT` as text.
pub struct SchemaConnection<'a> {
    conn: &'a Connection,
}

impl<'a> SchemaConnection<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Raw connection for ledger writes inside this crate.
    pub(crate) fn raw(&self) -> &Connection {
        self.conn
    }

    /// Execute a single statement, returning the number of affected rows.
    pub fn execute(&self, sql: &str) -> DbResult<usize> {
        ensure_no_transaction_control(sql)?;
        Ok(self.conn.execute(sql, [])?)
    }

    /// Execute a single statement with bound parameters.
    pub fn execute_params<P: duckdb::Params>(&self, sql: &str, params: P) -> DbResult<usize> {
        ensure_no_transaction_control(sql)?;
        Ok(self.conn.execute(sql, params)?)
    }

    /// Execute a `;`-separated script. Scripts holding only comments are a no-op.
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        ensure_no_transaction_control(sql)?;
        if is_blank(sql)? {
            log::debug!("Skipping empty SQL script");
            return Ok(());
        }
        Ok(self.conn.execute_batch(sql)?)
    }

    /// Count the rows returned by `sql`.
    pub fn query_count(&self, sql: &str) -> DbResult<usize> {
        ensure_no_transaction_control(sql)?;
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }

    /// Check whether a table or view exists (optionally `schema.name`).
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        relation_exists(self.conn, name)
    }

    /// Column names of `table`, in ordinal order.
    pub fn column_names(&self, table: &str) -> DbResult<Vec<String>> {
        column_names(self.conn, table)
    }
}

fn split_qualified(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

/// Check whether a table or view exists on `conn`.
pub fn relation_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let (schema, table) = split_qualified(name);
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
        duckdb::params![schema, table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Column names of a table on `conn`, in ordinal order.
pub fn column_names(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let (schema, table) = split_qualified(table);
    let mut stmt = conn.prepare(
        "SELECT column_name FROM information_schema.columns
         WHERE table_schema = ? AND table_name = ?
         ORDER BY ordinal_position",
    )?;
    let names = stmt
        .query_map(duckdb::params![schema, table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

//! The persisted ledger of applied migration versions.
//!
//! One table per database file, shared by every logical database identity
//! and filtered on `db_name`. Reads take a plain [`Connection`]; writes take
//! a [`SchemaConnection`], which only exists inside a transaction, so a ledger
//! row can never be committed separately from the schema change it records.

use crate::error::{DbError, DbResult};
use crate::executor::SchemaConnection;
use chrono::{DateTime, Utc};
use duckdb::Connection;
use shift_core::DatabaseName;

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "schema_migrations_shift";

/// One applied migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Store-assigned, increasing with application order
    pub sequence_id: i64,
    /// Applied version string
    pub version: String,
    /// Database identity the version was applied for
    pub db_name: String,
    /// When the row was written
    pub applied_at: DateTime<Utc>,
}

/// Create the ledger table and its id sequence if they do not exist.
pub fn ensure_tracking_table(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(&format!(
        "CREATE SEQUENCE IF NOT EXISTS {table}_id_seq START 1;
         CREATE TABLE IF NOT EXISTS {table} (
             id         BIGINT NOT NULL DEFAULT nextval('{table}_id_seq'),
             version    VARCHAR NOT NULL,
             db_name    VARCHAR NOT NULL,
             created_at TIMESTAMP NOT NULL DEFAULT now(),
             UNIQUE (version, db_name)
         );",
        table = LEDGER_TABLE
    ))
    .map_err(|e| DbError::ExecutionError(format!("failed to create {LEDGER_TABLE}: {e}")))
}

/// Applied versions for `db_name`, in application order.
pub fn applied_versions(conn: &Connection, db_name: &DatabaseName) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT version FROM {LEDGER_TABLE} WHERE db_name = ? ORDER BY id ASC"
    ))?;
    let versions = stmt
        .query_map(duckdb::params![db_name.as_str()], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(versions)
}

/// Full ledger rows for `db_name`, in application order.
pub fn applied_records(conn: &Connection, db_name: &DatabaseName) -> DbResult<Vec<LedgerRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, version, db_name, epoch_ms(created_at)
         FROM {LEDGER_TABLE} WHERE db_name = ? ORDER BY id ASC"
    ))?;
    let rows = stmt
        .query_map(duckdb::params![db_name.as_str()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(sequence_id, version, db_name, millis)| {
            let applied_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                DbError::Ledger(format!("invalid created_at for version {version}"))
            })?;
            Ok(LedgerRecord {
                sequence_id,
                version,
                db_name,
                applied_at,
            })
        })
        .collect()
}

fn is_recorded(conn: &Connection, version: &str, db_name: &DatabaseName) -> DbResult<bool> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {LEDGER_TABLE} WHERE version = ? AND db_name = ?"),
        duckdb::params![version, db_name.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Insert the ledger row for `version` inside the caller's transaction.
pub fn record_applied(
    tx: &SchemaConnection<'_>,
    version: &str,
    db_name: &DatabaseName,
) -> DbResult<()> {
    let conn = tx.raw();
    if is_recorded(conn, version, db_name)? {
        return Err(DbError::Ledger(format!(
            "version {version} is already recorded for database {db_name}"
        )));
    }
    conn.execute(
        &format!("INSERT INTO {LEDGER_TABLE} (version, db_name) VALUES (?, ?)"),
        duckdb::params![version, db_name.as_str()],
    )?;
    log::debug!("Recorded {version} for {db_name}");
    Ok(())
}

/// Delete the ledger row for `version` inside the caller's transaction.
///
/// A missing row is an error so that the surrounding downgrade rolls back.
pub fn remove_applied(
    tx: &SchemaConnection<'_>,
    version: &str,
    db_name: &DatabaseName,
) -> DbResult<()> {
    let deleted = tx.raw().execute(
        &format!("DELETE FROM {LEDGER_TABLE} WHERE version = ? AND db_name = ?"),
        duckdb::params![version, db_name.as_str()],
    )?;
    if deleted == 0 {
        return Err(DbError::Ledger(format!(
            "version {version} is not recorded for database {db_name}"
        )));
    }
    log::debug!("Removed {version} for {db_name}");
    Ok(())
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;

//! shift-db - Database layer for schema-shift
//!
//! Owns the DuckDB connection, the transaction protocol, the restricted
//! [`SchemaConnection`] handle given to migration units, and the ledger of
//! applied versions.

pub mod connection;
pub mod error;
pub mod executor;
pub mod guard;
pub mod ledger;

pub use connection::ShiftDb;
pub use error::{DbError, DbResult};
pub use executor::SchemaConnection;
pub use ledger::{LedgerRecord, LEDGER_TABLE};

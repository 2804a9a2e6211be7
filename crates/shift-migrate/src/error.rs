//! Error types for the migration manager.

use shift_core::CoreError;
use shift_db::DbError;
use thiserror::Error;

/// Migration manager errors. Every variant is fatal to the current run.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration could not be loaded or resolved (M001).
    #[error("[M001] Configuration error: {0}")]
    Config(#[from] CoreError),

    /// A unit's declared predecessor is not the unit before it (M002).
    #[error("[M002] Migration {unit} does not correctly reference the previous migration: declares '{actual}', expected '{expected}'")]
    ChainMismatch {
        unit: String,
        expected: String,
        actual: String,
    },

    /// Two units share an ordinal (M003).
    #[error("[M003] Duplicate migration version {ordinal}: '{first}' and '{second}'")]
    DuplicateVersion {
        ordinal: u64,
        first: String,
        second: String,
    },

    /// The ledger references versions with no unit (M004).
    #[error("[M004] Some applied migrations are missing from the migrations directory: {}. Restore the missing files or revert those migrations manually", .versions.join(", "))]
    MissingMigrationFiles { versions: Vec<String> },

    /// Applied versions are not a prefix of the chain (M005).
    #[error("[M005] Applied migrations do not follow the migration chain: position {position} holds '{found}', expected '{expected}'")]
    LedgerOutOfOrder {
        position: usize,
        expected: String,
        found: String,
    },

    /// A unit is missing attributes or tries to control transactions (M006).
    #[error("[M006] Malformed migration '{unit}': {reason}")]
    MalformedUnit { unit: String, reason: String },

    /// `upgrade` or its ledger write failed; the step was rolled back (M007).
    #[error("[M007] Failed to apply migration {version}: {source}")]
    ApplyError {
        version: String,
        #[source]
        source: DbError,
    },

    /// `downgrade` or its ledger delete failed; the step was rolled back (M008).
    #[error("[M008] Failed to revert migration {version}: {source}")]
    RevertError {
        version: String,
        #[source]
        source: DbError,
    },

    /// Scaffolding name rule (M009).
    #[error("[M009] Invalid migration name '{name}': only lowercase letters and underscores are allowed")]
    InvalidMigrationName { name: String },

    /// Database error outside a unit step (M010).
    #[error("[M010] {0}")]
    Db(#[from] DbError),

    /// Filesystem error with path context (M011).
    #[error("[M011] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    pub(crate) fn malformed(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        MigrateError::MalformedUnit {
            unit: unit.into(),
            reason: reason.into(),
        }
    }
}

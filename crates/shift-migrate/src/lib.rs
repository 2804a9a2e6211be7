//! shift-migrate - the migration manager
//!
//! Discovers migration units from a [`MigrationRegistry`], checks their
//! predecessor chain against the ledger, and applies or reverts them one
//! transaction per unit through a [`MigrationRunner`].

pub mod chain;
pub mod error;
pub mod registry;
pub mod runner;
pub mod scaffold;
pub mod unit;

pub use error::{MigrateError, MigrateResult};
pub use registry::MigrationRegistry;
pub use runner::{ApplyReport, MigrationRunner, RevertOutcome, RunState, UnitStatus};
pub use scaffold::{plan_migration, validate_migration_name, write_migration, ScaffoldPlan};
pub use unit::{MigrationUnit, SqlMigration};

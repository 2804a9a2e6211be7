//! shift-core - Core library for schema-shift
//!
//! This crate provides the shared types used across the migration manager:
//! configuration parsing and path resolution, strongly-typed database
//! identities, and ordinal-prefixed migration versions.

pub mod config;
pub mod database_name;
pub mod error;
pub mod version;

pub use config::{Config, DatabaseConfig, DatabaseTarget, DEFAULT_CONFIG_FILE, MIGRATIONS_DIR_NAME};
pub use database_name::DatabaseName;
pub use error::{CoreError, CoreResult};
pub use version::{display_previous, MigrationVersion, ROOT_SENTINEL};

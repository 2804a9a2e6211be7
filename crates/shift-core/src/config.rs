//! Configuration types and parsing for shift.yml

use crate::database_name::DatabaseName;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "shift.yml";

/// Required leaf name of every migrations directory.
pub const MIGRATIONS_DIR_NAME: &str = "schema_migrations";

/// Top-level configuration from shift.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// One section per logical database identity
    pub databases: BTreeMap<String, DatabaseConfig>,
}

/// Per-database configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path of the DuckDB database file
    pub db_path: String,

    /// Directory holding the migration unit files
    pub migrations_path: String,
}

/// A database section resolved to absolute locations.
///
/// This is what the migration manager is constructed from; nothing downstream
/// consults the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    /// Logical database identity
    pub name: DatabaseName,

    /// Database file
    pub db_path: PathBuf,

    /// Migration unit directory
    pub migrations_path: PathBuf,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        log::debug!(
            "Loaded config {} with {} database(s)",
            path.display(),
            config.databases.len()
        );
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.databases.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one database section must be specified".to_string(),
            });
        }

        for (name, db) in &self.databases {
            if DatabaseName::try_new(name.as_str()).is_none() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Invalid database name '{}'", name),
                });
            }
            if db.db_path.trim().is_empty() || db.migrations_path.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Database '{}' must set both db_path and migrations_path",
                        name
                    ),
                });
            }
        }

        Ok(())
    }

    /// Get the list of configured database names
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(|s| s.as_str()).collect()
    }

    /// Resolve the section for `name` into a [`DatabaseTarget`].
    ///
    /// Relative paths are joined onto `base_dir` (normally the directory the
    /// config file lives in). The migrations directory must exist and be named
    /// [`MIGRATIONS_DIR_NAME`]; the database file must already exist.
    pub fn target(&self, name: &str, base_dir: &Path) -> CoreResult<DatabaseTarget> {
        let section = self
            .databases
            .get(name)
            .ok_or_else(|| CoreError::DatabaseNotFound {
                name: name.to_string(),
                available: self.database_names().join(", "),
            })?;

        let db_path = base_dir.join(&section.db_path);
        let migrations_path = base_dir.join(&section.migrations_path);

        if !migrations_path.is_dir() {
            return Err(CoreError::PathNotFound {
                what: "migrations directory",
                path: migrations_path.display().to_string(),
            });
        }

        let dir_name = migrations_path
            .components()
            .next_back()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default();
        if dir_name != MIGRATIONS_DIR_NAME {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "The migrations directory must be named '{}', but was named '{}'",
                    MIGRATIONS_DIR_NAME, dir_name
                ),
            });
        }

        if !db_path.is_file() {
            return Err(CoreError::PathNotFound {
                what: "database file",
                path: db_path.display().to_string(),
            });
        }

        let name = DatabaseName::try_new(name).ok_or_else(|| CoreError::ConfigInvalid {
            message: format!("Invalid database name '{}'", name),
        })?;

        Ok(DatabaseTarget {
            name,
            db_path,
            migrations_path,
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

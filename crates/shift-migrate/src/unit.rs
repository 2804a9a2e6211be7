//! Migration units: the trait the runner drives and the SQL-file unit.

use crate::error::{MigrateError, MigrateResult};
use serde::Deserialize;
use shift_core::{DatabaseName, MigrationVersion, ROOT_SENTINEL};
use shift_db::guard::find_transaction_control;
use shift_db::{DbResult, SchemaConnection};
use std::path::Path;

/// A named, ordered pair of schema operations.
///
/// `upgrade` and `downgrade` receive a [`SchemaConnection`] scoped to a
/// transaction the runner owns. Units never begin, commit, or roll back.
pub trait MigrationUnit {
    /// Version identity, e.g. `002_add_age`.
    fn version(&self) -> &MigrationVersion;

    /// The unit that must come immediately before this one, or `None` for the
    /// first unit of the chain.
    fn previous_version(&self) -> Option<&MigrationVersion>;

    /// Database identity this unit targets.
    fn database(&self) -> &DatabaseName;

    /// Optional human-readable description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Apply the schema change.
    fn upgrade(&self, conn: &SchemaConnection<'_>) -> DbResult<()>;

    /// Undo the schema change.
    fn downgrade(&self, conn: &SchemaConnection<'_>) -> DbResult<()>;
}

/// A unit whose bodies are SQL scripts.
#[derive(Debug, Clone)]
pub struct SqlMigration {
    version: MigrationVersion,
    previous: Option<MigrationVersion>,
    database: DatabaseName,
    description: Option<String>,
    upgrade_sql: String,
    downgrade_sql: String,
}

/// On-disk shape of a unit file. Every key is optional here so that a
/// missing key becomes a `MalformedUnit` naming it rather than a YAML error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnitFile {
    db_name: Option<String>,
    previous_migration: Option<String>,
    description: Option<String>,
    upgrade: Option<String>,
    downgrade: Option<String>,
}

impl SqlMigration {
    /// Build a SQL unit, rejecting bodies that contain transaction control.
    pub fn new(
        version: MigrationVersion,
        previous: Option<MigrationVersion>,
        database: DatabaseName,
        upgrade_sql: impl Into<String>,
        downgrade_sql: impl Into<String>,
    ) -> MigrateResult<Self> {
        let unit = Self {
            version,
            previous,
            database,
            description: None,
            upgrade_sql: upgrade_sql.into(),
            downgrade_sql: downgrade_sql.into(),
        };
        unit.screen("upgrade", &unit.upgrade_sql)?;
        unit.screen("downgrade", &unit.downgrade_sql)?;
        Ok(unit)
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    fn screen(&self, body: &str, sql: &str) -> MigrateResult<()> {
        match find_transaction_control(sql) {
            Ok(None) => Ok(()),
            Ok(Some(statement)) => Err(MigrateError::malformed(
                self.version.as_str(),
                format!(
                    "{body} contains manual transaction control ('{statement}'); transactions are managed by the migration runner"
                ),
            )),
            Err(e) => Err(MigrateError::malformed(
                self.version.as_str(),
                format!("{body} is not valid SQL: {e}"),
            )),
        }
    }

    /// Parse a unit file's YAML content. `version` comes from the file name.
    pub fn from_yaml(version: MigrationVersion, content: &str) -> MigrateResult<Self> {
        let name = version.to_string();
        let file: UnitFile = serde_yaml::from_str(content)
            .map_err(|e| MigrateError::malformed(&name, format!("invalid unit file: {e}")))?;

        let missing = |key: &str| MigrateError::malformed(&name, format!("'{key}' is missing"));

        let db_name = file.db_name.ok_or_else(|| missing("db_name"))?;
        let database = DatabaseName::try_new(db_name.as_str()).ok_or_else(|| {
            MigrateError::malformed(&name, format!("invalid db_name '{db_name}'"))
        })?;

        let previous_raw = file
            .previous_migration
            .ok_or_else(|| missing("previous_migration"))?;
        let previous = if previous_raw.trim() == ROOT_SENTINEL {
            None
        } else {
            Some(MigrationVersion::parse(previous_raw.trim()).map_err(|e| {
                MigrateError::malformed(&name, format!("invalid previous_migration: {e}"))
            })?)
        };

        let upgrade = file.upgrade.ok_or_else(|| missing("upgrade"))?;
        let downgrade = file.downgrade.ok_or_else(|| missing("downgrade"))?;

        let unit = Self::new(version, previous, database, upgrade, downgrade)?;
        Ok(match file.description {
            Some(d) => unit.with_description(d),
            None => unit,
        })
    }

    /// Load a unit file; its stem is the version.
    pub fn load(path: &Path) -> MigrateResult<Self> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                MigrateError::malformed(path.display().to_string(), "file name is not valid UTF-8")
            })?;
        let version = MigrationVersion::parse(stem)
            .map_err(|e| MigrateError::malformed(stem, e.to_string()))?;
        let content = std::fs::read_to_string(path).map_err(|e| MigrateError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(version, &content)
    }

    /// SQL run by `upgrade`.
    pub fn upgrade_sql(&self) -> &str {
        &self.upgrade_sql
    }

    /// SQL run by `downgrade`.
    pub fn downgrade_sql(&self) -> &str {
        &self.downgrade_sql
    }
}

impl MigrationUnit for SqlMigration {
    fn version(&self) -> &MigrationVersion {
        &self.version
    }

    fn previous_version(&self) -> Option<&MigrationVersion> {
        self.previous.as_ref()
    }

    fn database(&self) -> &DatabaseName {
        &self.database
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn upgrade(&self, conn: &SchemaConnection<'_>) -> DbResult<()> {
        conn.execute_batch(&self.upgrade_sql)
    }

    fn downgrade(&self, conn: &SchemaConnection<'_>) -> DbResult<()> {
        conn.execute_batch(&self.downgrade_sql)
    }
}

#[cfg(test)]
#[path = "unit_test.rs"]
mod tests;

//! Scaffolding of new migration unit files.

use crate::error::{MigrateError, MigrateResult};
use crate::runner::MigrationRunner;
use shift_core::{display_previous, DatabaseName, MigrationVersion};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A unit file ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPlan {
    /// Version of the new unit
    pub version: MigrationVersion,
    /// Current tail of the chain, `None` for an empty store
    pub previous: Option<MigrationVersion>,
    /// `<version>.yml`
    pub file_name: String,
    /// Rendered YAML
    pub contents: String,
}

/// Check a requested migration name: non-empty, lowercase ASCII letters and
/// underscores only.
pub fn validate_migration_name(name: &str) -> MigrateResult<()> {
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase() || b == b'_') {
        Ok(())
    } else {
        Err(MigrateError::InvalidMigrationName {
            name: name.to_string(),
        })
    }
}

/// Work out the next unit for `runner`'s database.
///
/// The store and ledger must pass every validation gate first; a new unit is
/// never appended to a broken chain.
pub fn plan_migration(runner: &MigrationRunner, name: &str) -> MigrateResult<ScaffoldPlan> {
    validate_migration_name(name)?;
    runner.validate()?;

    let units = runner.registry().list_units()?;
    let previous = units.last().map(|u| u.version().clone());
    let ordinal = previous.as_ref().map_or(1, |v| v.ordinal() + 1);
    let version = MigrationVersion::from_parts(ordinal, name)?;

    let contents = render_unit(runner.database(), previous.as_ref());
    Ok(ScaffoldPlan {
        file_name: format!("{version}.yml"),
        version,
        previous,
        contents,
    })
}

fn render_unit(database: &DatabaseName, previous: Option<&MigrationVersion>) -> String {
    format!(
        "db_name: \"{database}\"\n\
         previous_migration: \"{previous}\"\n\
         description: \"\"\n\
         upgrade: |\n  \
           -- To be implemented\n\
         downgrade: |\n  \
           -- To be implemented\n",
        previous = display_previous(previous),
    )
}

/// Write `plan` into `dir`. An existing file with the same name is never
/// overwritten.
pub fn write_migration(dir: &Path, plan: &ScaffoldPlan) -> MigrateResult<PathBuf> {
    let path = dir.join(&plan.file_name);
    let io_err = |e: std::io::Error| MigrateError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(io_err)?;
    file.write_all(plan.contents.as_bytes()).map_err(io_err)?;

    log::debug!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;

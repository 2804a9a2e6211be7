//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use shift_core::{Config, DatabaseTarget};
use shift_migrate::MigrationRunner;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Load the config file and resolve `dbname` against it.
///
/// Relative paths in the config are joined onto the directory holding the
/// config file, not the working directory.
pub(crate) fn resolve_target(global: &GlobalArgs, dbname: &str) -> Result<DatabaseTarget> {
    let config_path = Path::new(&global.config);
    let config = Config::load(config_path).context("Failed to load config")?;

    let base_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let target = config
        .target(dbname, base_dir)
        .with_context(|| format!("Failed to resolve database '{dbname}'"))?;

    log::debug!(
        "Database {}: {} (migrations in {})",
        target.name,
        target.db_path.display(),
        target.migrations_path.display()
    );
    Ok(target)
}

/// Resolve `dbname` and open a runner for it.
pub(crate) fn open_runner(global: &GlobalArgs, dbname: &str) -> Result<(DatabaseTarget, MigrationRunner)> {
    let target = resolve_target(global, dbname)?;
    let runner = MigrationRunner::from_target(&target)
        .with_context(|| format!("Failed to open database '{dbname}'"))?;
    Ok((target, runner))
}

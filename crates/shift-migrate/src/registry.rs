//! The migration unit store and discovery.
//!
//! Units are registered explicitly (or loaded from a directory of unit files
//! at startup) and never mutated afterwards. [`MigrationRegistry::list_units`]
//! recomputes the ordered view on every call, so registration order and
//! directory listing order never leak into execution order.

use crate::error::{MigrateError, MigrateResult};
use crate::unit::{MigrationUnit, SqlMigration};
use std::path::Path;

/// Ordered store of migration units.
#[derive(Default)]
pub struct MigrationRegistry {
    units: Vec<Box<dyn MigrationUnit>>,
}

impl MigrationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit. Registering the same version twice is a
    /// `DuplicateVersion` error.
    pub fn register<U: MigrationUnit + 'static>(&mut self, unit: U) -> MigrateResult<()> {
        self.register_boxed(Box::new(unit))
    }

    /// Register an already boxed unit.
    pub fn register_boxed(&mut self, unit: Box<dyn MigrationUnit>) -> MigrateResult<()> {
        if let Some(existing) = self.get(unit.version().as_str()) {
            return Err(MigrateError::DuplicateVersion {
                ordinal: unit.version().ordinal(),
                first: existing.version().to_string(),
                second: unit.version().to_string(),
            });
        }
        log::debug!("Registered migration {}", unit.version());
        self.units.push(unit);
        Ok(())
    }

    /// Load every `*.yml` / `*.yaml` unit file in `dir` (non-recursive).
    pub fn load_dir(dir: &Path) -> MigrateResult<Self> {
        let io_err = |e: std::io::Error| MigrateError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        };

        let mut registry = Self::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() || !path.extension().is_some_and(|e| e == "yml" || e == "yaml") {
                continue;
            }
            registry.register(SqlMigration::load(&path)?)?;
        }
        log::debug!(
            "Loaded {} migration(s) from {}",
            registry.len(),
            dir.display()
        );
        Ok(registry)
    }

    /// Look up a unit by its exact version string.
    pub fn get(&self, version: &str) -> Option<&dyn MigrationUnit> {
        self.units
            .iter()
            .find(|u| u.version().as_str() == version)
            .map(|u| u.as_ref())
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All units in strictly increasing ordinal order.
    ///
    /// Two units sharing an ordinal (`002_a`, `002_b`) is a
    /// `DuplicateVersion` error.
    pub fn list_units(&self) -> MigrateResult<Vec<&dyn MigrationUnit>> {
        let mut units: Vec<&dyn MigrationUnit> = self.units.iter().map(|u| u.as_ref()).collect();
        units.sort_by(|a, b| a.version().cmp(b.version()));

        for pair in units.windows(2) {
            let (first, second) = (pair[0].version(), pair[1].version());
            if first.ordinal() == second.ordinal() {
                return Err(MigrateError::DuplicateVersion {
                    ordinal: first.ordinal(),
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
        Ok(units)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

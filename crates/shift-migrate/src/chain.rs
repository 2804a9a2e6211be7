//! Chain validation gates.
//!
//! Pure, linear checks run before every apply, revert, and scaffold. None of
//! them touch the database; the runner reads the ledger and passes it in.

use crate::error::{MigrateError, MigrateResult};
use crate::unit::MigrationUnit;
use shift_core::{display_previous, DatabaseName, MigrationVersion};
use std::collections::HashSet;

/// Check that each unit names the unit before it as its predecessor, and the
/// first unit names none.
///
/// `units` must already be in ordinal order (see
/// [`crate::MigrationRegistry::list_units`]).
pub fn validate_chain(units: &[&dyn MigrationUnit]) -> MigrateResult<()> {
    let mut expected_previous: Option<&MigrationVersion> = None;
    for unit in units {
        if unit.previous_version() != expected_previous {
            return Err(MigrateError::ChainMismatch {
                unit: unit.version().to_string(),
                expected: display_previous(expected_previous),
                actual: display_previous(unit.previous_version()),
            });
        }
        expected_previous = Some(unit.version());
    }
    Ok(())
}

/// Check that every applied version still has a unit.
pub fn validate_ledger_consistency(applied: &[String], discovered: &[&str]) -> MigrateResult<()> {
    let known: HashSet<&str> = discovered.iter().copied().collect();
    let missing: Vec<String> = applied
        .iter()
        .filter(|v| !known.contains(v.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MigrateError::MissingMigrationFiles { versions: missing })
    }
}

/// Check that the applied versions are exactly the head of the chain, in
/// chain order.
pub fn validate_applied_prefix(applied: &[String], discovered: &[&str]) -> MigrateResult<()> {
    for (position, found) in applied.iter().enumerate() {
        let expected = discovered.get(position).copied().unwrap_or_default();
        if found != expected {
            return Err(MigrateError::LedgerOutOfOrder {
                position,
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
    }
    Ok(())
}

/// Check that every unit targets `database`.
pub fn validate_identity(units: &[&dyn MigrationUnit], database: &DatabaseName) -> MigrateResult<()> {
    match units.iter().find(|u| u.database() != database) {
        Some(unit) => Err(MigrateError::malformed(
            unit.version().as_str(),
            format!(
                "declares db_name '{}' but is being run for database '{}'",
                unit.database(),
                database
            ),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;

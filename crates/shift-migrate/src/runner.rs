//! The apply/revert runner.
//!
//! Every run validates first, then selects units, then executes each selected
//! unit in its own transaction together with its ledger write. The first
//! failure rolls that unit's transaction back and ends the run; units
//! committed earlier in the same run stay committed.

use crate::chain::{
    validate_applied_prefix, validate_chain, validate_identity, validate_ledger_consistency,
};
use crate::error::{MigrateError, MigrateResult};
use crate::registry::MigrationRegistry;
use crate::unit::MigrationUnit;
use chrono::{DateTime, Utc};
use shift_core::{DatabaseName, DatabaseTarget, MigrationVersion};
use shift_db::ledger::{applied_records, applied_versions, record_applied, remove_applied};
use shift_db::{DbError, DbResult, ShiftDb};
use std::collections::HashSet;

/// Where the current (or last) run is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// No run started yet
    Idle,
    /// Running the validation gates
    Validating,
    /// Computing which units to run
    Selecting,
    /// Inside the transaction of this unit
    Executing(MigrationVersion),
    /// Every selected unit committed
    Committed,
    /// A unit failed and its transaction was rolled back
    RolledBack,
    /// Validation failed; nothing was executed
    Failed,
}

/// Result of [`MigrationRunner::apply_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Versions applied by this run, in order
    pub applied: Vec<MigrationVersion>,
}

impl ApplyReport {
    /// Number of units applied by this run.
    pub fn count(&self) -> usize {
        self.applied.len()
    }
}

/// Result of [`MigrationRunner::revert_last`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertOutcome {
    /// This version was downgraded and removed from the ledger
    Reverted(MigrationVersion),
    /// The ledger was empty
    NothingToRevert,
}

/// One line of [`MigrationRunner::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitStatus {
    pub version: MigrationVersion,
    pub description: Option<String>,
    /// `None` while pending
    pub applied_at: Option<DateTime<Utc>>,
}

/// Units and ledger that passed validation.
struct Validated<'r> {
    units: Vec<&'r dyn MigrationUnit>,
    applied: Vec<String>,
}

fn validate<'r>(
    registry: &'r MigrationRegistry,
    db: &ShiftDb,
    database: &DatabaseName,
) -> MigrateResult<Validated<'r>> {
    let units = registry.list_units()?;
    validate_identity(&units, database)?;
    validate_chain(&units)?;

    let applied = applied_versions(db.conn(), database)?;
    let discovered: Vec<&str> = units.iter().map(|u| u.version().as_str()).collect();
    validate_ledger_consistency(&applied, &discovered)?;
    validate_applied_prefix(&applied, &discovered)?;

    Ok(Validated { units, applied })
}

/// Which direction a failed step was going.
#[derive(Clone, Copy)]
enum Step {
    Apply,
    Revert,
}

fn step_error(step: Step, version: &MigrationVersion, source: DbError) -> MigrateError {
    let version = version.to_string();
    match (step, source) {
        (_, DbError::TransactionControl { statement }) => MigrateError::MalformedUnit {
            unit: version,
            reason: format!(
                "issued transaction control ('{statement}'); transactions are managed by the migration runner"
            ),
        },
        (Step::Apply, source) => MigrateError::ApplyError { version, source },
        (Step::Revert, source) => MigrateError::RevertError { version, source },
    }
}

/// Applies and reverts the units of one registry against one database.
///
/// Owns its database connection for as long as it lives.
pub struct MigrationRunner {
    db: ShiftDb,
    registry: MigrationRegistry,
    database: DatabaseName,
    state: RunState,
}

impl MigrationRunner {
    /// Create a runner. The ledger table is ensured by [`ShiftDb`] on open.
    pub fn new(db: ShiftDb, registry: MigrationRegistry, database: DatabaseName) -> Self {
        Self {
            db,
            registry,
            database,
            state: RunState::Idle,
        }
    }

    /// Open the target's database and load its unit directory.
    pub fn from_target(target: &DatabaseTarget) -> MigrateResult<Self> {
        let registry = MigrationRegistry::load_dir(&target.migrations_path)?;
        let db = ShiftDb::open(&target.db_path)?;
        Ok(Self::new(db, registry, target.name.clone()))
    }

    /// The database being migrated.
    pub fn db(&self) -> &ShiftDb {
        &self.db
    }

    /// The unit store.
    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// The database identity.
    pub fn database(&self) -> &DatabaseName {
        &self.database
    }

    /// State of the current or last run.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Run every validation gate without changing anything.
    pub fn validate(&self) -> MigrateResult<()> {
        validate(&self.registry, &self.db, &self.database).map(|_| ())
    }

    /// Versions recorded in the ledger for this database, in application order.
    pub fn applied_versions(&self) -> MigrateResult<Vec<String>> {
        Ok(applied_versions(self.db.conn(), &self.database)?)
    }

    /// Apply every pending unit in chain order, one transaction each.
    pub fn apply_all(&mut self) -> MigrateResult<ApplyReport> {
        self.state = RunState::Validating;
        let validated = match validate(&self.registry, &self.db, &self.database) {
            Ok(v) => v,
            Err(e) => {
                self.state = RunState::Failed;
                return Err(e);
            }
        };

        self.state = RunState::Selecting;
        let applied: HashSet<&str> = validated.applied.iter().map(String::as_str).collect();
        let pending: Vec<&dyn MigrationUnit> = validated
            .units
            .iter()
            .copied()
            .filter(|u| !applied.contains(u.version().as_str()))
            .collect();
        log::debug!(
            "{} applied, {} pending for {}",
            applied.len(),
            pending.len(),
            self.database
        );

        let mut report = ApplyReport::default();
        for unit in pending {
            let version = unit.version();
            self.state = RunState::Executing(version.clone());
            log::debug!("Applying migration {version}");

            let database = &self.database;
            let result = self.db.transaction(|tx| -> DbResult<()> {
                unit.upgrade(tx)?;
                record_applied(tx, version.as_str(), database)
            });

            if let Err(source) = result {
                self.state = RunState::RolledBack;
                log::warn!("Migration {version} failed, rolled back: {source}");
                return Err(step_error(Step::Apply, version, source));
            }
            log::info!("Applied migration {version}");
            report.applied.push(version.clone());
        }

        self.state = RunState::Committed;
        Ok(report)
    }

    /// Revert the most recently applied unit, and only that one.
    pub fn revert_last(&mut self) -> MigrateResult<RevertOutcome> {
        self.state = RunState::Validating;
        let validated = match validate(&self.registry, &self.db, &self.database) {
            Ok(v) => v,
            Err(e) => {
                self.state = RunState::Failed;
                return Err(e);
            }
        };

        self.state = RunState::Selecting;
        let Some(last) = validated.applied.last() else {
            self.state = RunState::Committed;
            log::debug!("Nothing to revert for {}", self.database);
            return Ok(RevertOutcome::NothingToRevert);
        };
        let unit = validated
            .units
            .iter()
            .copied()
            .find(|u| u.version().as_str() == last.as_str())
            .ok_or_else(|| MigrateError::MissingMigrationFiles {
                versions: vec![last.clone()],
            })?;

        let version = unit.version();
        self.state = RunState::Executing(version.clone());
        log::debug!("Reverting migration {version}");

        let database = &self.database;
        let result = self.db.transaction(|tx| -> DbResult<()> {
            unit.downgrade(tx)?;
            remove_applied(tx, version.as_str(), database)
        });

        if let Err(source) = result {
            self.state = RunState::RolledBack;
            log::warn!("Revert of {version} failed, rolled back: {source}");
            return Err(step_error(Step::Revert, version, source));
        }

        log::info!("Reverted migration {version}");
        self.state = RunState::Committed;
        Ok(RevertOutcome::Reverted(version.clone()))
    }

    /// Every unit with its applied time, after validation.
    pub fn status(&self) -> MigrateResult<Vec<UnitStatus>> {
        let validated = validate(&self.registry, &self.db, &self.database)?;
        let records = applied_records(self.db.conn(), &self.database)?;

        Ok(validated
            .units
            .iter()
            .map(|unit| UnitStatus {
                version: unit.version().clone(),
                description: unit.description().map(str::to_string),
                applied_at: records
                    .iter()
                    .find(|r| r.version == unit.version().as_str())
                    .map(|r| r.applied_at),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;

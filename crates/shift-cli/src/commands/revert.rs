//! Revert command implementation

use anyhow::Result;
use shift_migrate::RevertOutcome;

use crate::cli::{GlobalArgs, TargetArgs};
use crate::commands::common::open_runner;

/// Execute the revert command
pub fn execute(args: &TargetArgs, global: &GlobalArgs) -> Result<()> {
    let (_, mut runner) = open_runner(global, &args.dbname)?;

    match runner.revert_last()? {
        RevertOutcome::Reverted(version) => println!("Reverted migration {version}"),
        RevertOutcome::NothingToRevert => println!("No migrations have been applied."),
    }
    Ok(())
}

//! Create command implementation

use anyhow::Result;
use shift_migrate::{plan_migration, write_migration};

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::open_runner;

/// Execute the create command
pub fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let (target, runner) = open_runner(global, &args.dbname)?;

    let plan = plan_migration(&runner, &args.migration_name)?;
    let path = write_migration(&target.migrations_path, &plan)?;

    println!("Created migration: {}", path.display());
    Ok(())
}

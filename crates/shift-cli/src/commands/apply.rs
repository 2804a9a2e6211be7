//! Apply command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, TargetArgs};
use crate::commands::common::open_runner;

/// Execute the apply command
pub fn execute(args: &TargetArgs, global: &GlobalArgs) -> Result<()> {
    let (_, mut runner) = open_runner(global, &args.dbname)?;

    let report = runner.apply_all()?;
    for version in &report.applied {
        println!("Applied migration {version}");
    }
    println!("{} migration(s) applied", report.count());
    Ok(())
}

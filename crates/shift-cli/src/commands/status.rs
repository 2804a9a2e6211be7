//! Status command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, TargetArgs};
use crate::commands::common::open_runner;

/// Execute the status command
pub fn execute(args: &TargetArgs, global: &GlobalArgs) -> Result<()> {
    let (_, runner) = open_runner(global, &args.dbname)?;
    let units = runner.status()?;

    if units.is_empty() {
        println!("No migrations found for {}", runner.database());
        return Ok(());
    }

    let width = units
        .iter()
        .map(|u| u.version.as_str().len())
        .max()
        .unwrap_or(0);
    for unit in &units {
        let applied = match unit.applied_at {
            Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "pending".to_string(),
        };
        match &unit.description {
            Some(description) => {
                println!("{:<width$}  {:<19}  {}", unit.version.as_str(), applied, description)
            }
            None => println!("{:<width$}  {}", unit.version.as_str(), applied),
        }
    }

    let pending = units.iter().filter(|u| u.applied_at.is_none()).count();
    println!("{} applied, {} pending", units.len() - pending, pending);
    Ok(())
}

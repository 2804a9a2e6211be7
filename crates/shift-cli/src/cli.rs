//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use shift_core::DEFAULT_CONFIG_FILE;

/// schema-shift - ordered, chain-validated schema migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "shift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE, env = "SHIFT_CONFIG")]
    pub config: String,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every pending migration
    Apply(TargetArgs),

    /// Revert the most recently applied migration
    Revert(TargetArgs),

    /// Scaffold the next migration file
    Create(CreateArgs),

    /// List migrations and when they were applied
    Status(TargetArgs),
}

/// Arguments shared by commands that act on one database
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Database section name from the config file
    pub dbname: String,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Database section name from the config file
    pub dbname: String,

    /// Name of the new migration (lowercase letters and underscores)
    #[arg(short = 'n', long = "migration_name")]
    pub migration_name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

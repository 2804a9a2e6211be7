//! schema-shift CLI - ordered, chain-validated schema migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{apply, create, revert, status};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_target(false)
        .init();

    match &cli.command {
        cli::Commands::Apply(args) => apply::execute(args, &cli.global),
        cli::Commands::Revert(args) => revert::execute(args, &cli.global),
        cli::Commands::Create(args) => create::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
    }
}

//! Mapdepot CLI - Command-line utility for installing map packages into a
//! mod's maps directory, with privileged relaunch where the platform
//! requires it.

mod cli;
mod commands;
mod error;
mod output;
mod sink;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match &cli.command {
        cli::Commands::Install(args) => commands::install::execute(args, &cli, &*formatter),
        cli::Commands::Extract(args) => commands::extract::execute(args, &cli, &*formatter),
    }
}

//! S-57 chart CLI library.
//!
//! Types and command handlers behind the `s57` binary. The binary parses
//! arguments, sets up logging and calls [`run`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

use cli::{Cli, Commands};
use s57_chart::BoundingBox;

/// Dispatch a parsed [`Cli`] to its command handler.
pub fn run(cli: Cli) -> error::CliResult<()> {
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Dump { file, limit } => commands::dump::run(&file, limit),

        Commands::Info { file, format } => {
            let lookups = config.lookups()?;
            commands::info::run(&file, format, &lookups)
        }

        Commands::Catalog { dir, format } => commands::catalog::run(&dir, format, &config),

        Commands::Select {
            dir,
            south,
            north,
            west,
            east,
            format,
        } => {
            let region = BoundingBox::new(south, north, west, east);
            commands::select::run(&dir, region, format, &config)
        }
    }
}

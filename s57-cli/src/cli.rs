use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "s57", about = "S-57 electronic chart inspector", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a TOML package config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the field types and generic records of an ISO 8211 file
    Dump {
        /// ISO 8211 file (cell or catalog)
        file: PathBuf,

        /// Stop after this many records
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Summarise a chart cell
    Info {
        /// Cell file (e.g. GB4X0000.000)
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the entries of a package catalog
    Catalog {
        /// Package root directory
        dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Load the cells covering a region and list the features inside it
    Select {
        /// Package root directory
        dir: PathBuf,

        /// Southern bound in degrees
        #[arg(long, allow_negative_numbers = true)]
        south: f64,

        /// Northern bound in degrees
        #[arg(long, allow_negative_numbers = true)]
        north: f64,

        /// Western bound in degrees
        #[arg(long, allow_negative_numbers = true)]
        west: f64,

        /// Eastern bound in degrees
        #[arg(long, allow_negative_numbers = true)]
        east: f64,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

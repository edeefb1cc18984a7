use colored::Colorize;
use s57_chart::ChartError;
use s57_iso8211::Iso8211Error;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error building a chart or package.
    Chart(ChartError),
    /// Error decoding an ISO 8211 file.
    Decode(Iso8211Error),
    /// Configuration file issues.
    Config(String),
    /// Bad file path, unreadable input.
    Input(String),
    /// Argument / usage errors.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Chart(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Decode(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Config(msg) => write!(
                f,
                "{} {msg}\n  {} see --config for the package config file",
                "error:".red().bold(),
                "help:".cyan().bold(),
            ),
            CliError::Input(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<ChartError> for CliError {
    fn from(e: ChartError) -> Self {
        match e {
            ChartError::Config(msg) => CliError::Config(msg),
            other => CliError::Chart(other),
        }
    }
}

impl From<Iso8211Error> for CliError {
    fn from(e: Iso8211Error) -> Self {
        CliError::Decode(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON error: {e}"))
    }
}

impl From<toml::de::Error> for CliError {
    fn from(e: toml::de::Error) -> Self {
        CliError::Config(format!("invalid config: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}

pub type CliResult<T> = std::result::Result<T, CliError>;

//! Package config loading.
//!
//! The config is a TOML rendering of [`PackageConfig`]:
//!
//! ```toml
//! catalog_file = "CATALOG.031"
//! base_suffix = ".000"
//!
//! [lookups]
//! attributes = "s57attributes.csv"
//! object_classes = "s57objectclasses.csv"
//! expected_input = "s57expectedinput.csv"
//! ```
//!
//! Lookup paths are relative to the config file's directory.

use crate::error::{CliError, CliResult};
use s57_chart::{LookupTables, PackageConfig};
use std::path::{Path, PathBuf};

pub struct LoadedConfig {
    pub package: PackageConfig,
    /// Directory lookup table paths are resolved against.
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    pub fn lookups(&self) -> CliResult<LookupTables> {
        Ok(self.package.lookups.load(&self.base_dir)?)
    }
}

/// Load the `--config` file, or defaults when none is given.
pub fn load(config_override: Option<&Path>) -> CliResult<LoadedConfig> {
    let Some(path) = config_override else {
        return Ok(LoadedConfig {
            package: PackageConfig::default(),
            base_dir: std::env::current_dir()?,
        });
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("cannot read config {}: {e}", path.display()))
    })?;
    let package: PackageConfig = toml::from_str(&text)?;
    package.validate()?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    tracing::debug!(path = %path.display(), "loaded package config");
    Ok(LoadedConfig { package, base_dir })
}

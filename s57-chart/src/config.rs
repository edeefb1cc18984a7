//! Package configuration.

use crate::error::{ChartError, Result};
use crate::lookup::{AttributeCatalog, ExpectedInputCatalog, LookupTables, ObjectCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default name of the exchange-set catalog.
pub const DEFAULT_CATALOG_FILE: &str = "CATALOG.031";

/// Default suffix of base cells; update files use `.001` and up.
pub const DEFAULT_BASE_SUFFIX: &str = ".000";

/// Configuration for opening a chart package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Catalog file name, relative to the package root.
    pub catalog_file: String,

    /// Only catalog entries whose file ends with this suffix are indexed.
    pub base_suffix: String,

    /// Reference tables used to name codes.
    pub lookups: LookupConfig,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
            base_suffix: DEFAULT_BASE_SUFFIX.to_string(),
            lookups: LookupConfig::default(),
        }
    }
}

impl PackageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.catalog_file.trim().is_empty() {
            return Err(ChartError::Config("catalog_file must not be empty".into()));
        }
        if !self.base_suffix.starts_with('.') {
            return Err(ChartError::Config(format!(
                "base_suffix must start with '.', got {:?}",
                self.base_suffix
            )));
        }
        Ok(())
    }
}

/// Paths of the CSV reference tables. Relative paths are resolved against
/// the directory passed to [`LookupConfig::load`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub attributes: Option<PathBuf>,
    pub object_classes: Option<PathBuf>,
    pub expected_input: Option<PathBuf>,
}

impl LookupConfig {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_none() && self.object_classes.is_none() && self.expected_input.is_none()
    }

    pub fn load(&self, base: &Path) -> Result<LookupTables> {
        let resolve = |p: &PathBuf| base.join(p);
        let attributes = self
            .attributes
            .as_ref()
            .map(|p| AttributeCatalog::load(&resolve(p)).map_err(|e| lookup_error(p, e)))
            .transpose()?;
        let objects = self
            .object_classes
            .as_ref()
            .map(|p| ObjectCatalog::load(&resolve(p)).map_err(|e| lookup_error(p, e)))
            .transpose()?;
        let expected = self
            .expected_input
            .as_ref()
            .map(|p| ExpectedInputCatalog::load(&resolve(p)).map_err(|e| lookup_error(p, e)))
            .transpose()?;
        tracing::debug!(
            attributes = attributes.as_ref().map_or(0, |t| t.len()),
            object_classes = objects.as_ref().map_or(0, |t| t.len()),
            expected_input = expected.as_ref().map_or(0, |t| t.len()),
            "lookup tables loaded"
        );
        Ok(LookupTables {
            attributes: attributes.map(Arc::new),
            objects: objects.map(Arc::new),
            expected: expected.map(Arc::new),
        })
    }
}

fn lookup_error(path: &Path, e: ChartError) -> ChartError {
    ChartError::Lookup(format!("{}: {e}", path.display()))
}

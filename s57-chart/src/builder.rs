//! Chart builder.
//!
//! Turns generic items into chart objects. The builder:
//! 1. Captures the first `DSPM` and `DSSI` groups seen
//! 2. Classifies each keyed item as catalog entry, vector or feature
//! 3. Builds the domain object, skipping and counting records that fail
//! 4. Resolves pointers once every record is in
//!
//! # Usage
//!
//! ```ignore
//! let mut builder = ChartBuilder::new(&lookups);
//! while let Some(item) = reader.next_item()? {
//!     builder.add_item(&item);
//! }
//! let chart = builder.finish();
//! ```

use crate::catalog::CatalogEntry;
use crate::chart::Chart;
use crate::dataset::{DatasetParameters, DatasetStructure};
use crate::error::Result;
use crate::feature::Feature;
use crate::lookup::LookupTables;
use crate::resolver::{self, FeatureMap, VectorMap};
use crate::vector::{describe, SpatialVector};
use s57_iso8211::GenericItem;
use serde::Serialize;

/// What a keyed item describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    Catalog,
    Vector,
    Feature,
    Other,
}

impl RecordClass {
    pub fn of(item: &GenericItem) -> Self {
        match item.key_field.as_deref() {
            Some("CATD") => Self::Catalog,
            Some("VRID") => Self::Vector,
            Some("FRID") => Self::Feature,
            _ => Self::Other,
        }
    }
}

/// Statistics collected while building a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Number of records seen.
    pub records: u64,

    pub catalog_entries: u64,

    pub vectors: u64,

    pub features: u64,

    /// Records of other kinds (dataset description, parameters, ...).
    pub other_records: u64,

    /// Records that failed to build and were left out.
    pub records_skipped: u64,

    /// Features loaded without `FOID`, all sharing id 0.
    pub features_without_identifier: u64,

    /// Records that replaced an earlier one with the same id.
    pub identity_collisions: u64,
}

/// Accumulates the records of one file into a [`Chart`].
pub struct ChartBuilder<'a> {
    lookups: &'a LookupTables,
    parameters: Option<DatasetParameters>,
    structure: Option<DatasetStructure>,
    vectors: VectorMap,
    features: FeatureMap,
    catalog: Vec<CatalogEntry>,
    stats: BuildStats,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(lookups: &'a LookupTables) -> Self {
        Self {
            lookups,
            parameters: None,
            structure: None,
            vectors: VectorMap::default(),
            features: FeatureMap::default(),
            catalog: Vec::new(),
            stats: BuildStats::default(),
        }
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// `DSSI` lexical levels, once a record carrying them has been added.
    pub fn structure(&self) -> Option<&DatasetStructure> {
        self.structure.as_ref()
    }

    pub fn parameters(&self) -> Option<&DatasetParameters> {
        self.parameters.as_ref()
    }

    /// Add one record.
    ///
    /// # Returns
    ///
    /// - `true` if the record was added
    /// - `false` if it failed to build and was skipped
    ///
    /// Failures are logged and counted in `stats.records_skipped`, not
    /// propagated, so one bad record does not lose the rest of the file.
    pub fn add_item(&mut self, item: &GenericItem) -> bool {
        self.stats.records += 1;
        match self.try_add(item) {
            Ok(()) => true,
            Err(e) => {
                self.stats.records_skipped += 1;
                tracing::warn!(record = %describe(item), error = %e, "skipping record");
                false
            }
        }
    }

    fn try_add(&mut self, item: &GenericItem) -> Result<()> {
        if self.parameters.is_none() {
            if let Some(group) = item.group("DSPM") {
                let parameters = DatasetParameters::from_group(group)?;
                tracing::debug!(
                    comf = parameters.coordinate_factor,
                    somf = parameters.sounding_factor,
                    cscl = parameters.compilation_scale,
                    "dataset parameters"
                );
                self.parameters = Some(parameters);
            }
        }
        if self.structure.is_none() {
            if let Some(group) = item.group("DSSI") {
                let structure = DatasetStructure::from_group(group)?;
                tracing::debug!(
                    aall = structure.attribute_level,
                    nall = structure.national_level,
                    "dataset lexical levels"
                );
                self.structure = Some(structure);
            }
        }

        match RecordClass::of(item) {
            RecordClass::Catalog => {
                let entry = CatalogEntry::from_item(item)?;
                tracing::trace!(id = entry.id, file = %entry.file, "catalog entry");
                self.catalog.push(entry);
                self.stats.catalog_entries += 1;
            }
            RecordClass::Vector => {
                let vector = SpatialVector::from_item(item, self.parameters.as_ref(), self.lookups)?;
                let id = vector.id();
                if self.vectors.insert(id, vector).is_some() {
                    self.stats.identity_collisions += 1;
                    tracing::warn!(vector = %id, "duplicate vector id, keeping the later record");
                }
                self.stats.vectors += 1;
            }
            RecordClass::Feature => {
                let feature = Feature::from_item(item, self.lookups)?;
                if !feature.has_object_identifier {
                    self.stats.features_without_identifier += 1;
                    tracing::debug!(rcid = feature.rcid, "feature without FOID, using id 0");
                }
                let id = feature.id();
                if self.features.insert(id, feature).is_some() {
                    self.stats.identity_collisions += 1;
                    tracing::warn!(feature = %id, "duplicate feature id, keeping the later record");
                }
                self.stats.features += 1;
            }
            RecordClass::Other => self.stats.other_records += 1,
        }
        Ok(())
    }

    /// Resolve pointers and produce the chart.
    pub fn finish(mut self) -> Chart {
        let resolve_stats = resolver::resolve_all(&mut self.vectors, &mut self.features);
        Chart {
            vectors: self.vectors,
            features: self.features,
            catalog: self.catalog,
            parameters: self.parameters,
            structure: self.structure,
            stats: self.stats,
            resolve_stats,
        }
    }
}

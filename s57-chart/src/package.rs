//! Chart packages: a catalog plus the cells it lists.
//!
//! A package indexes its base cells by coverage and keeps the features of
//! the cells covering the current region in memory. Selecting a region
//! reloads only when the covering set changes. The first covering cell is
//! loaded as the base; features of the remaining cells are added without
//! replacing any already present.

use crate::catalog::CatalogEntry;
use crate::chart::{geometry_intersects, path_bounding_box, Chart, FeatureClass};
use crate::config::PackageConfig;
use crate::error::Result;
use crate::feature::Feature;
use crate::geometry::BoundingBox;
use crate::ids::FeatureId;
use crate::lookup::LookupTables;
use crate::parser::parse_file;
use crate::resolver::FeaturePath;
use crate::tile_tree::{covering_set_changed, TileTree};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A feature held by the package, with its geometry already assembled.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedFeature {
    /// Id of the catalog entry of the cell it came from.
    pub cell: u32,
    pub feature: Feature,
    pub path: FeaturePath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl LoadedFeature {
    fn new(cell: u32, chart: &Chart, feature: &Feature) -> Self {
        let path = chart.feature_path(feature);
        Self {
            cell,
            bbox: path_bounding_box(&path),
            feature: feature.clone(),
            path,
        }
    }

    pub fn intersects(&self, region: &BoundingBox) -> bool {
        geometry_intersects(self.feature.primitive, &self.path, self.bbox.as_ref(), region)
    }
}

pub struct ChartPackage {
    root: PathBuf,
    config: PackageConfig,
    lookups: LookupTables,
    catalog: Vec<CatalogEntry>,
    tree: TileTree,
    /// Ids of the current covering set.
    selection: Vec<u32>,
    loaded: Vec<CatalogEntry>,
    features: FxHashMap<FeatureId, LoadedFeature>,
    feature_classes: Vec<FeatureClass>,
    compilation_scale: Option<u32>,
}

impl ChartPackage {
    /// Read the catalog under `root` and index its base cells.
    pub fn open(root: impl Into<PathBuf>, config: PackageConfig, lookups: LookupTables) -> Result<Self> {
        config.validate()?;
        let root = root.into();
        let catalog_path = root.join(&config.catalog_file);
        let catalog = parse_file(&catalog_path, &lookups)?.catalog;

        let tree = TileTree::build(
            catalog
                .iter()
                .filter(|e| e.has_suffix(&config.base_suffix))
                .cloned(),
        );
        tracing::info!(
            root = %root.display(),
            entries = catalog.len(),
            indexed = tree.len(),
            depth = tree.depth(),
            "chart package opened"
        );

        Ok(Self {
            root,
            config,
            lookups,
            catalog,
            tree,
            selection: Vec::new(),
            loaded: Vec::new(),
            features: FxHashMap::default(),
            feature_classes: Vec::new(),
            compilation_scale: None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &PackageConfig {
        &self.config
    }

    /// Every catalog entry, including non-cell files and update cells.
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn tile_tree(&self) -> &TileTree {
        &self.tree
    }

    /// Cells loaded by the last selection, base first.
    pub fn loaded_cells(&self) -> &[CatalogEntry] {
        &self.loaded
    }

    pub fn current_features(&self) -> &FxHashMap<FeatureId, LoadedFeature> {
        &self.features
    }

    /// Object classes of the loaded cells, ordered by name.
    pub fn feature_classes(&self) -> &[FeatureClass] {
        &self.feature_classes
    }

    /// Smallest compilation scale among the loaded cells.
    pub fn compilation_scale(&self) -> Option<u32> {
        self.compilation_scale
    }

    /// Load the cells covering `region`.
    ///
    /// Returns `false`, leaving the loaded cells untouched, when the covering
    /// set is the same as the current one.
    pub fn select_region(&mut self, region: &BoundingBox) -> Result<bool> {
        let covering: Vec<CatalogEntry> = self
            .tree
            .select_covering_set(region)
            .into_iter()
            .cloned()
            .collect();
        let ids: Vec<u32> = covering.iter().map(|e| e.id).collect();
        if !covering_set_changed(&self.selection, &ids) {
            tracing::debug!(cells = ids.len(), "covering set unchanged");
            return Ok(false);
        }
        tracing::debug!(?ids, "covering set changed");
        self.load(&covering)?;
        self.selection = ids;
        Ok(true)
    }

    /// Load a single cell as the base, dropping everything else.
    pub fn select(&mut self, entry: &CatalogEntry) -> Result<()> {
        self.load(std::slice::from_ref(entry))?;
        self.selection = vec![entry.id];
        Ok(())
    }

    /// Loaded features whose geometry touches `region`, ordered by id.
    pub fn features_intersecting(&self, region: &BoundingBox) -> Vec<&LoadedFeature> {
        let mut hits: Vec<&LoadedFeature> = self
            .features
            .values()
            .filter(|f| f.intersects(region))
            .collect();
        hits.sort_by_key(|f| f.feature.id());
        hits
    }

    /// Location of a cell on disk. Fails for entries whose file would
    /// resolve outside the package root.
    pub fn cell_path(&self, entry: &CatalogEntry) -> Result<PathBuf> {
        Ok(self.root.join(entry.relative_path()?))
    }

    /// Replace the loaded state with `cells`. The base cell must load;
    /// additions that fail are skipped with a warning.
    fn load(&mut self, cells: &[CatalogEntry]) -> Result<()> {
        let mut features: FxHashMap<FeatureId, LoadedFeature> = FxHashMap::default();
        let mut classes = BTreeSet::new();
        let mut scale: Option<u32> = None;
        let mut loaded = Vec::with_capacity(cells.len());

        for (i, entry) in cells.iter().enumerate() {
            let chart = match self
                .cell_path(entry)
                .and_then(|path| parse_file(path, &self.lookups))
            {
                Ok(chart) => chart,
                Err(e) if i > 0 => {
                    tracing::warn!(file = %entry.file, error = %e, "skipping cell that failed to load");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(cell_scale) = chart.compilation_scale() {
                scale = Some(scale.map_or(cell_scale, |s| s.min(cell_scale)));
            }
            classes.extend(chart.feature_classes());

            let before = features.len();
            for (id, feature) in chart.features() {
                features
                    .entry(*id)
                    .or_insert_with(|| LoadedFeature::new(entry.id, &chart, feature));
            }
            tracing::debug!(
                file = %entry.file,
                base = i == 0,
                added = features.len() - before,
                offered = chart.features().len(),
                "cell loaded"
            );
            loaded.push(entry.clone());
        }

        self.features = features;
        self.feature_classes = classes.into_iter().collect();
        self.compilation_scale = scale;
        self.loaded = loaded;
        Ok(())
    }
}

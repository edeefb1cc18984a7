//! A decoded chart cell: vector and feature arenas plus dataset metadata.

use crate::builder::BuildStats;
use crate::catalog::CatalogEntry;
use crate::codes::GeometricPrimitive;
use crate::dataset::{DatasetParameters, DatasetStructure};
use crate::feature::Feature;
use crate::geometry::{BoundingBox, Coordinate};
use crate::ids::{FeatureId, VectorId};
use crate::resolver::{self, FeatureMap, FeaturePath, ResolveStats, VectorMap};
use crate::vector::SpatialVector;
use serde::Serialize;
use std::collections::BTreeSet;

/// Object class present in a chart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FeatureClass {
    pub name: String,
    pub code: u16,
}

#[derive(Debug, Clone, Default)]
pub struct Chart {
    pub(crate) vectors: VectorMap,
    pub(crate) features: FeatureMap,
    pub(crate) catalog: Vec<CatalogEntry>,
    pub(crate) parameters: Option<DatasetParameters>,
    pub(crate) structure: Option<DatasetStructure>,
    pub(crate) stats: BuildStats,
    pub(crate) resolve_stats: ResolveStats,
}

impl Chart {
    pub fn vectors(&self) -> &VectorMap {
        &self.vectors
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    pub fn vector(&self, id: VectorId) -> Option<&SpatialVector> {
        self.vectors.get(&id)
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// Catalog entries, in file order. Only catalog files have any.
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn parameters(&self) -> Option<&DatasetParameters> {
        self.parameters.as_ref()
    }

    pub fn structure(&self) -> Option<&DatasetStructure> {
        self.structure.as_ref()
    }

    pub fn compilation_scale(&self) -> Option<u32> {
        self.parameters
            .map(|p| p.compilation_scale)
            .filter(|&scale| scale > 0)
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn resolve_stats(&self) -> &ResolveStats {
        &self.resolve_stats
    }

    /// Distinct object classes, ordered by name. Classes without a name in
    /// the lookup tables are named by their code.
    pub fn feature_classes(&self) -> Vec<FeatureClass> {
        let classes: BTreeSet<FeatureClass> = self
            .features
            .values()
            .map(|f| FeatureClass {
                name: f
                    .object_class_name
                    .clone()
                    .unwrap_or_else(|| f.object_class.to_string()),
                code: f.object_class,
            })
            .collect();
        classes.into_iter().collect()
    }

    pub fn expanded_coordinates(&self, id: VectorId) -> Vec<Coordinate> {
        resolver::expanded_coordinates(&self.vectors, id)
    }

    pub fn feature_path(&self, feature: &Feature) -> FeaturePath {
        resolver::feature_path(&self.vectors, feature)
    }

    /// Bounding box of a feature's resolved geometry.
    pub fn feature_bounding_box(&self, feature: &Feature) -> Option<BoundingBox> {
        let path = self.feature_path(feature);
        path_bounding_box(&path)
    }

    /// Features whose geometry touches `region`, ordered by id.
    pub fn features_intersecting(&self, region: &BoundingBox) -> Vec<&Feature> {
        let mut hits: Vec<&Feature> = self
            .features
            .values()
            .filter(|f| {
                let path = self.feature_path(f);
                geometry_intersects(f.primitive, &path, path_bounding_box(&path).as_ref(), region)
            })
            .collect();
        hits.sort_by_key(|f| f.id());
        hits
    }
}

pub(crate) fn path_bounding_box(path: &FeaturePath) -> Option<BoundingBox> {
    let coords: Vec<Coordinate> = path.coordinates().copied().collect();
    BoundingBox::from_coordinates(&coords)
}

/// Point features match when one of their coordinates lies in `region`;
/// all others when their bounding box intersects it.
pub(crate) fn geometry_intersects(
    primitive: GeometricPrimitive,
    path: &FeaturePath,
    bbox: Option<&BoundingBox>,
    region: &BoundingBox,
) -> bool {
    if primitive == GeometricPrimitive::Point {
        return path
            .coordinates()
            .any(|c| region.contains_point(c.lat, c.lon));
    }
    bbox.is_some_and(|b| b.intersects(region))
}

//! S-57 electronic navigational charts on top of ISO 8211.
//!
//! This crate turns the generic items of an ISO 8211 stream into chart
//! objects and organises whole exchange sets:
//!
//! - **Cells**: spatial vectors and features keyed by id, with pointers
//!   between them resolved into a graph that tolerates cycles
//! - **Geometry**: vector chains expanded into coordinate sequences and
//!   feature outlines
//! - **Packages**: a catalog indexed by coverage, loading the cells that
//!   cover a region of interest
//!
//! # Architecture
//!
//! ```text
//!   ISO 8211 bytes ──► Iso8211Reader ──► GenericItem
//!                                            │
//!                                            ▼
//!                               ChartBuilder (per record, skip on error)
//!                                            │
//!                                            ▼
//!                               resolver (vectors, FSPT, FFPT)
//!                                            │
//!                                            ▼
//!                                          Chart
//!                                            │
//!   CATALOG.031 ──► TileTree ──► covering set ──► ChartPackage
//! ```
//!
//! # Modules
//!
//! - [`parser`]: whole-file parsing into a [`Chart`]
//! - [`resolver`]: pointer resolution and coordinate expansion
//! - [`tile_tree`]: containment tree over catalog coverages
//! - [`package`]: region selection across the cells of a catalog
//! - [`lookup`]: CSV reference tables for attribute and class names
//! - [`config`]: package configuration
//! - [`error`]: error types

pub mod config;
pub mod error;

mod attribute;
mod builder;
mod catalog;
mod chart;
pub mod codes;
mod dataset;
mod feature;
pub mod geometry;
mod ids;
pub mod lookup;
pub mod package;
pub mod parser;
pub mod resolver;
pub mod tile_tree;
mod vector;

#[cfg(test)]
mod test_util;

// ── Records ─────────────────────────────────────────────────────────────────
pub use attribute::{attributes_from_groups, Attribute, AttributeMap, SCAMIN};
pub use catalog::{CatalogEntry, Implementation};
pub use dataset::{DatasetParameters, DatasetStructure};
pub use feature::{Feature, FeaturePointer, SpatialPointer};
pub use ids::{FeatureId, VectorId};
pub use vector::{SpatialVector, VectorPointer, MAX_VECTOR_POINTERS};

// ── Charts ──────────────────────────────────────────────────────────────────
pub use builder::{BuildStats, ChartBuilder, RecordClass};
pub use chart::{Chart, FeatureClass};
pub use parser::{parse, parse_bytes, parse_file};
pub use resolver::{FeaturePath, ResolveStats};

// ── Packages ────────────────────────────────────────────────────────────────
pub use config::{LookupConfig, PackageConfig};
pub use geometry::{BoundingBox, Coordinate};
pub use lookup::LookupTables;
pub use package::{ChartPackage, LoadedFeature};
pub use tile_tree::{TileNode, TileTree};

pub use error::{ChartError, Result};

//! Coordinates and geographic bounding boxes.

use geo::BoundingRect;
use geo_types::{Coord, MultiPoint, Point};
use serde::{Deserialize, Serialize};

/// A decoded position in decimal degrees, with depth for soundings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            depth: None,
        }
    }

    pub fn with_depth(lon: f64, lat: f64, depth: f64) -> Self {
        Self {
            lon,
            lat,
            depth: Some(depth),
        }
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(c: Coordinate) -> Self {
        Coord { x: c.lon, y: c.lat }
    }
}

/// Latitude/longitude box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// The whole globe.
    pub const WORLD: BoundingBox = BoundingBox {
        south: -90.0,
        north: 90.0,
        west: -180.0,
        east: 180.0,
    };

    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Center as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Area in square degrees.
    pub fn area(&self) -> f64 {
        (self.north - self.south).abs() * (self.east - self.west).abs()
    }

    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Check if this box fully contains another.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.south <= other.south
            && self.north >= other.north
            && self.west <= other.west
            && self.east >= other.east
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.south <= other.north
            && self.north >= other.south
            && self.west <= other.east
            && self.east >= other.west
    }

    /// Smallest box around a set of coordinates.
    pub fn from_coordinates(coords: &[Coordinate]) -> Option<Self> {
        let points: MultiPoint<f64> = coords
            .iter()
            .map(|&c| Point::from(Coord::from(c)))
            .collect();
        let rect = points.bounding_rect()?;
        Some(Self {
            south: rect.min().y,
            north: rect.max().y,
            west: rect.min().x,
            east: rect.max().x,
        })
    }
}

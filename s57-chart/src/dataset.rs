//! Dataset-wide singletons: `DSPM` scale factors and `DSSI` lexical levels.

use crate::error::Result;
use s57_iso8211::{SubfieldGroup, TextEncoding};
use serde::Serialize;

/// `DSPM` dataset parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetParameters {
    /// `COMF`, coordinate multiplication factor.
    pub coordinate_factor: u32,
    /// `SOMF`, 3-D (sounding) multiplication factor.
    pub sounding_factor: u32,
    /// `CSCL`, compilation scale.
    pub compilation_scale: u32,
}

impl DatasetParameters {
    pub fn from_group(group: &SubfieldGroup) -> Result<Self> {
        Ok(Self {
            coordinate_factor: group.get_as("COMF")?.unwrap_or(0),
            sounding_factor: group.get_as("SOMF")?.unwrap_or(0),
            compilation_scale: group.get_as("CSCL")?.unwrap_or(0),
        })
    }

    /// Divisor for `XCOO`/`YCOO`. Zero counts as 1.
    pub fn coordinate_scale(&self) -> f64 {
        non_zero(self.coordinate_factor)
    }

    /// Divisor for `VE3D`. Zero counts as 1.
    pub fn sounding_scale(&self) -> f64 {
        non_zero(self.sounding_factor)
    }
}

fn non_zero(factor: u32) -> f64 {
    if factor == 0 {
        1.0
    } else {
        f64::from(factor)
    }
}

/// `DSSI` lexical levels of attribute text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetStructure {
    /// `AALL`, for `ATTF`.
    pub attribute_level: u8,
    /// `NALL`, for `NATF`.
    pub national_level: u8,
}

impl Default for DatasetStructure {
    fn default() -> Self {
        Self {
            attribute_level: 1,
            national_level: 1,
        }
    }
}

impl DatasetStructure {
    pub fn from_group(group: &SubfieldGroup) -> Result<Self> {
        Ok(Self {
            attribute_level: group.get_as("AALL")?.unwrap_or(1),
            national_level: group.get_as("NALL")?.unwrap_or(1),
        })
    }

    pub fn attribute_encoding(&self) -> TextEncoding {
        encoding_for_level(self.attribute_level)
    }

    pub fn national_encoding(&self) -> TextEncoding {
        encoding_for_level(self.national_level)
    }
}

/// Lexical level 2 is UCS-2; 0 (ASCII) and 1 (Latin-1) are single byte.
fn encoding_for_level(level: u8) -> TextEncoding {
    if level == 2 {
        TextEncoding::DoubleByte
    } else {
        TextEncoding::SingleByte
    }
}

//! Record identities.
//!
//! Vectors are addressed by their record name (`RCNM`, `RCID`); features by
//! their long name (`AGEN`, `FIDN`, `FIDS`). Both pack into a `u64` read
//! little-endian from the same bytes that appear in pointer subfields, so a
//! `NAME` or `LNAM` value maps straight to the id of its target.

use crate::error::{ChartError, Result};
use s57_iso8211::{record_name_code, SubfieldGroup};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `RCNM` of an identifier field, given as a number or, in ASCII files, as
/// a two-letter name such as `VE`.
pub(crate) fn record_name(group: &SubfieldGroup, field: &str) -> Result<u8> {
    if let Some(text) = group.text("RCNM") {
        let text = text.trim();
        return record_name_code(text)
            .or_else(|| text.parse().ok())
            .ok_or_else(|| ChartError::InvalidValue {
                field: "RCNM",
                value: text.to_string(),
            });
    }
    Ok(group.require(field, "RCNM")?)
}

/// Identity of a spatial vector record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorId(pub u64);

impl VectorId {
    /// Length of a `NAME` pointer subfield.
    pub const NAME_LEN: usize = 5;

    pub fn new(rcnm: u8, rcid: u32) -> Self {
        let mut bytes = [0u8; 8];
        bytes[0] = rcnm;
        bytes[1..5].copy_from_slice(&rcid.to_le_bytes());
        Self(u64::from_le_bytes(bytes))
    }

    /// Id referenced by a 5-byte `NAME` subfield.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        let name: [u8; Self::NAME_LEN] = name.try_into().ok()?;
        Some(Self::new(
            name[0],
            u32::from_le_bytes([name[1], name[2], name[3], name[4]]),
        ))
    }

    pub fn rcnm(self) -> u8 {
        self.0 as u8
    }

    pub fn rcid(self) -> u32 {
        (self.0 >> 8) as u32
    }
}

impl fmt::Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.rcnm(), self.rcid())
    }
}

/// Identity of a feature record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u64);

impl FeatureId {
    /// Length of an `LNAM` pointer subfield.
    pub const LNAM_LEN: usize = 8;

    pub fn new(agen: u16, fidn: u32, fids: u16) -> Self {
        Self(u64::from(agen) | (u64::from(fidn) << 16) | (u64::from(fids) << 48))
    }

    /// Id referenced by an 8-byte `LNAM` subfield.
    pub fn from_lnam(lnam: &[u8]) -> Option<Self> {
        let lnam: [u8; Self::LNAM_LEN] = lnam.try_into().ok()?;
        Some(Self(u64::from_le_bytes(lnam)))
    }

    pub fn agen(self) -> u16 {
        self.0 as u16
    }

    pub fn fidn(self) -> u32 {
        (self.0 >> 16) as u32
    }

    pub fn fids(self) -> u16 {
        (self.0 >> 48) as u16
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.agen(), self.fidn(), self.fids())
    }
}

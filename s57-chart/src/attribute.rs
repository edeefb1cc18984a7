//! Feature and vector attributes (`ATTV`, `ATTF`, `NATF`).

use crate::lookup::LookupTables;
use s57_iso8211::SubfieldGroup;
use serde::Serialize;
use std::collections::BTreeMap;

/// Attribute code of `SCAMIN`, the minimum display scale.
pub const SCAMIN: u16 = 133;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub code: u16,
    pub value: String,
    /// Attribute name from the attribute catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Meaning of an enumerated value from the expected input catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
}

impl Attribute {
    pub fn new(code: u16, value: impl Into<String>, lookups: &LookupTables) -> Self {
        let value = value.into();
        Self {
            code,
            name: lookups.attribute_name(code).map(str::to_string),
            meaning: lookups.value_meaning(code, &value).map(str::to_string),
            value,
        }
    }

    /// Value parsed as a number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }
}

pub type AttributeMap = BTreeMap<u16, Attribute>;

/// Collect `ATTL`/`ATVL` pairs. Groups with a missing or mistyped label or
/// value are skipped; a repeated label keeps the last value.
pub fn attributes_from_groups(groups: &[SubfieldGroup], lookups: &LookupTables) -> AttributeMap {
    let mut out = AttributeMap::new();
    for group in groups {
        let (Ok(Some(code)), Some(value)) = (group.get_as::<u16>("ATTL"), group.text("ATVL")) else {
            tracing::trace!("skipping incomplete attribute group");
            continue;
        };
        out.insert(code, Attribute::new(code, value, lookups));
    }
    out
}

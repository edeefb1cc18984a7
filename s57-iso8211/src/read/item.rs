//! Generic items: data records keyed by tag, with a derived record key.

use crate::format::{DataRecord, FieldTypeTable, SubfieldGroup};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Tag of the ISO 8211 record identifier field.
pub const RECORD_ID_TAG: &str = "0001";

/// Record name (`RCNM`) and record number (`RCID`) of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RecordKey {
    pub rcnm: u8,
    pub rcid: u32,
}

impl RecordKey {
    pub fn new(rcnm: u8, rcid: u32) -> Self {
        Self { rcnm, rcid }
    }

    /// Key from the textual form used by ASCII-implemented records, e.g.
    /// `("CD", "12")`. Unknown names and unparsable numbers become 0.
    pub fn from_text(rcnm: &str, rcid: &str) -> Self {
        Self {
            rcnm: record_name_code(rcnm).unwrap_or(0),
            rcid: rcid.trim().parse().unwrap_or(0),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.rcnm, self.rcid)
    }
}

/// Numeric code of a two-letter record name.
pub fn record_name_code(name: &str) -> Option<u8> {
    Some(match name {
        "CD" => 0,
        "DS" => 10,
        "DP" => 20,
        "DH" => 30,
        "DA" => 40,
        "CR" => 60,
        "ID" => 70,
        "IO" => 80,
        "IS" => 90,
        "FE" => 100,
        "VI" => 110,
        "VC" => 120,
        "VE" => 130,
        "VF" => 140,
        _ => return None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemField {
    pub tag: String,
    /// Field name from the descriptive record.
    pub name: String,
    pub groups: Vec<SubfieldGroup>,
}

impl ItemField {
    /// The group of a non-repeating field. `None` for repeating fields with
    /// more than one group.
    pub fn single(&self) -> Option<&SubfieldGroup> {
        match self.groups.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenericItem {
    /// Value of the `0001` record identifier field, when present.
    pub record_id: Option<u32>,
    /// Tag of the field carrying `RCNM`/`RCID`.
    pub key_field: Option<String>,
    pub unique_id: Option<RecordKey>,
    pub fields: BTreeMap<String, ItemField>,
}

impl GenericItem {
    pub fn from_record(record: DataRecord, table: &FieldTypeTable) -> Self {
        let fields: BTreeMap<String, ItemField> = record
            .fields
            .into_iter()
            .map(|f| {
                let name = table
                    .get(&f.tag)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                (
                    f.tag.clone(),
                    ItemField {
                        tag: f.tag,
                        name,
                        groups: f.groups,
                    },
                )
            })
            .collect();

        let record_id = fields
            .get(RECORD_ID_TAG)
            .and_then(|f| f.groups.first())
            .and_then(|g| g.iter().next())
            .and_then(|(_, v)| match v.as_text() {
                Some(text) => text.trim().parse().ok(),
                None => v.as_i64().and_then(|n| u32::try_from(n).ok()),
            });

        let key = fields.iter().find_map(|(tag, field)| {
            if !(tag.ends_with("ID") || tag == "CATD") {
                return None;
            }
            let group = field.single()?;
            let rcnm = group.get("RCNM")?;
            let rcid = group.get("RCID")?;
            let key = match (rcnm.as_text(), rcid.as_text()) {
                (Some(name), Some(number)) => RecordKey::from_text(name, number),
                _ => RecordKey::new(
                    u8::try_from(rcnm.as_i64()?).ok()?,
                    u32::try_from(rcid.as_i64()?).ok()?,
                ),
            };
            Some((tag.clone(), key))
        });
        let (key_field, unique_id) = key.unzip();

        Self {
            record_id,
            key_field,
            unique_id,
            fields,
        }
    }

    pub fn field(&self, tag: &str) -> Option<&ItemField> {
        self.fields.get(tag)
    }

    /// First group of a field, the usual access for non-repeating fields.
    pub fn group(&self, tag: &str) -> Option<&SubfieldGroup> {
        self.fields.get(tag).and_then(|f| f.groups.first())
    }

    /// All groups of a field, empty when absent.
    pub fn groups(&self, tag: &str) -> &[SubfieldGroup] {
        self.fields
            .get(tag)
            .map(|f| f.groups.as_slice())
            .unwrap_or_default()
    }

    pub fn is_keyed_by(&self, tag: &str) -> bool {
        self.key_field.as_deref() == Some(tag)
    }
}

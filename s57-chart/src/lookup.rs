//! Reference tables for decoding attribute and object class codes.
//!
//! Three keyed tables, each loaded from a CSV file with a header row:
//!
//! ```text
//! attributes:      code, attribute, acronym, attributeType, classType
//! object classes:  code, objectClass, acronym, attrA, attrB, attrC, classType[, primitives]
//! expected input:  attribute, value, meaning
//! ```
//!
//! List-valued columns are `;` separated. Rows that do not fit the layout
//! are skipped. Files that are not UTF-8 are read as Windows-1252.

use crate::error::Result;
use encoding_rs::WINDOWS_1252;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read CSV rows (header excluded) from a file in either encoding.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = std::fs::read(path)?;
    let text = match std::str::from_utf8(&bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!(path = %path.display(), "lookup table is not UTF-8, reading as Windows-1252");
            WINDOWS_1252.decode_without_bom_handling(&bytes).0.into_owned()
        }
    };
    rows_from_str(&text)
}

fn rows_from_str(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDescription {
    pub code: u16,
    pub attribute: String,
    pub acronym: String,
    pub attribute_type: String,
    pub class_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    by_code: FxHashMap<u16, AttributeDescription>,
}

impl AttributeCatalog {
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let by_code = rows
            .iter()
            .filter(|row| row.len() == 5)
            .filter_map(|row| {
                Some(AttributeDescription {
                    code: row[0].trim().parse().ok()?,
                    attribute: row[1].clone(),
                    acronym: row[2].clone(),
                    attribute_type: row[3].clone(),
                    class_type: row[4].clone(),
                })
            })
            .map(|a| (a.code, a))
            .collect();
        Self { by_code }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_rows(&read_rows(path)?))
    }

    pub fn get(&self, code: u16) -> Option<&AttributeDescription> {
        self.by_code.get(&code)
    }

    pub fn by_acronym(&self, acronym: &str) -> Option<&AttributeDescription> {
        self.by_code.values().find(|a| a.acronym == acronym)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

// ============================================================================
// Object classes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectDescription {
    pub code: u16,
    pub object_class: String,
    pub acronym: String,
    pub attributes_a: Vec<String>,
    pub attributes_b: Vec<String>,
    pub attributes_c: Vec<String>,
    pub class_type: String,
    pub primitives: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectCatalog {
    by_code: FxHashMap<u16, ObjectDescription>,
}

impl ObjectCatalog {
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let mut by_code = FxHashMap::default();
        for row in rows {
            if row.len() < 7 {
                tracing::trace!(columns = row.len(), "skipping short object class row");
                continue;
            }
            let Ok(code) = row[0].trim().parse() else {
                continue;
            };
            by_code.insert(
                code,
                ObjectDescription {
                    code,
                    object_class: row[1].clone(),
                    acronym: row[2].clone(),
                    attributes_a: split_list(&row[3]),
                    attributes_b: split_list(&row[4]),
                    attributes_c: split_list(&row[5]),
                    class_type: row[6].clone(),
                    primitives: row.get(7).map(|c| split_list(c)).unwrap_or_default(),
                },
            );
        }
        Self { by_code }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_rows(&read_rows(path)?))
    }

    pub fn get(&self, code: u16) -> Option<&ObjectDescription> {
        self.by_code.get(&code)
    }

    pub fn by_acronym(&self, acronym: &str) -> Option<&ObjectDescription> {
        self.by_code.values().find(|o| o.acronym == acronym)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

// ============================================================================
// Expected input values
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedInput {
    pub attribute: u16,
    pub value: u16,
    pub meaning: String,
}

impl ExpectedInput {
    fn key(attribute: u16, value: u16) -> u32 {
        (u32::from(attribute) << 16) | u32::from(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpectedInputCatalog {
    by_key: FxHashMap<u32, ExpectedInput>,
}

impl ExpectedInputCatalog {
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let by_key = rows
            .iter()
            .filter(|row| row.len() == 3)
            .filter_map(|row| {
                Some(ExpectedInput {
                    attribute: row[0].trim().parse().ok()?,
                    value: row[1].trim().parse().ok()?,
                    meaning: row[2].clone(),
                })
            })
            .map(|e| (ExpectedInput::key(e.attribute, e.value), e))
            .collect();
        Self { by_key }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_rows(&read_rows(path)?))
    }

    pub fn get(&self, attribute: u16, value: u16) -> Option<&ExpectedInput> {
        self.by_key.get(&ExpectedInput::key(attribute, value))
    }

    /// Meaning of a raw attribute value, when the value is a listed code.
    pub fn meaning(&self, attribute: u16, raw: &str) -> Option<&str> {
        let value = raw.trim().parse().ok()?;
        self.get(attribute, value).map(|e| e.meaning.as_str())
    }

    /// All listed values of one attribute, ordered by value.
    pub fn values_for(&self, attribute: u16) -> Vec<&ExpectedInput> {
        let mut values: Vec<_> = self
            .by_key
            .values()
            .filter(|e| e.attribute == attribute)
            .collect();
        values.sort_by_key(|e| e.value);
        values
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Reference tables handed to one parse session. Any table may be absent.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub attributes: Option<Arc<AttributeCatalog>>,
    pub objects: Option<Arc<ObjectCatalog>>,
    pub expected: Option<Arc<ExpectedInputCatalog>>,
}

impl LookupTables {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn attribute_name(&self, code: u16) -> Option<&str> {
        self.attributes
            .as_deref()?
            .get(code)
            .map(|a| a.attribute.as_str())
    }

    pub fn object_class_name(&self, code: u16) -> Option<&str> {
        self.objects
            .as_deref()?
            .get(code)
            .map(|o| o.object_class.as_str())
    }

    pub fn value_meaning(&self, attribute: u16, raw: &str) -> Option<&str> {
        self.expected.as_deref()?.meaning(attribute, raw)
    }
}

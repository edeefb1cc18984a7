//! Decoded subfield values.

use crate::error::{Iso8211Error, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::sync::Arc;

/// One decoded subfield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubfieldValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Text(String),
    Bytes(Vec<u8>),
}

impl SubfieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SubfieldValue::UInt8(_) => "UInt8",
            SubfieldValue::UInt16(_) => "UInt16",
            SubfieldValue::UInt32(_) => "UInt32",
            SubfieldValue::Int8(_) => "Int8",
            SubfieldValue::Int16(_) => "Int16",
            SubfieldValue::Int32(_) => "Int32",
            SubfieldValue::Text(_) => "Text",
            SubfieldValue::Bytes(_) => "Bytes",
        }
    }

    /// Integer value of any numeric variant.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            SubfieldValue::UInt8(v) => Some(v.into()),
            SubfieldValue::UInt16(v) => Some(v.into()),
            SubfieldValue::UInt32(v) => Some(v.into()),
            SubfieldValue::Int8(v) => Some(v.into()),
            SubfieldValue::Int16(v) => Some(v.into()),
            SubfieldValue::Int32(v) => Some(v.into()),
            SubfieldValue::Text(_) | SubfieldValue::Bytes(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SubfieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SubfieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Little-endian encoding of binary variants; text is returned raw
    /// (single byte, no terminator).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            SubfieldValue::UInt8(v) => v.to_le_bytes().to_vec(),
            SubfieldValue::UInt16(v) => v.to_le_bytes().to_vec(),
            SubfieldValue::UInt32(v) => v.to_le_bytes().to_vec(),
            SubfieldValue::Int8(v) => v.to_le_bytes().to_vec(),
            SubfieldValue::Int16(v) => v.to_le_bytes().to_vec(),
            SubfieldValue::Int32(v) => v.to_le_bytes().to_vec(),
            SubfieldValue::Text(s) => s.as_bytes().to_vec(),
            SubfieldValue::Bytes(b) => b.clone(),
        }
    }
}

impl std::fmt::Display for SubfieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubfieldValue::Text(s) => f.write_str(s),
            SubfieldValue::Bytes(b) => {
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            other => match other.as_i64() {
                Some(v) => write!(f, "{v}"),
                None => Ok(()),
            },
        }
    }
}

/// Typed extraction from a [`SubfieldValue`].
///
/// Integer targets accept any numeric variant whose value fits, and text
/// holding a decimal number, as written by ASCII-implemented files.
pub trait FromSubfield: Sized {
    const EXPECTED: &'static str;

    fn from_subfield(value: &SubfieldValue) -> Option<Self>;
}

macro_rules! impl_from_subfield_int {
    ($($ty:ty),*) => {
        $(
            impl FromSubfield for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_subfield(value: &SubfieldValue) -> Option<Self> {
                    let wide = match value.as_text() {
                        Some(text) => text.trim().parse::<i64>().ok()?,
                        None => value.as_i64()?,
                    };
                    <$ty>::try_from(wide).ok()
                }
            }
        )*
    };
}

impl_from_subfield_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl FromSubfield for String {
    const EXPECTED: &'static str = "Text";

    fn from_subfield(value: &SubfieldValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromSubfield for Vec<u8> {
    const EXPECTED: &'static str = "Bytes";

    fn from_subfield(value: &SubfieldValue) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}

// ============================================================================
// Groups
// ============================================================================

/// One decoded group of subfields, in format-control order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubfieldGroup {
    values: Vec<(Arc<str>, SubfieldValue)>,
}

impl SubfieldGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: Arc<str>, value: SubfieldValue) {
        self.values.push((tag, value));
    }

    /// Builder-style push for tests and fixtures.
    pub fn with(mut self, tag: &str, value: SubfieldValue) -> Self {
        self.push(Arc::from(tag), value);
        self
    }

    pub fn get(&self, tag: &str) -> Option<&SubfieldValue> {
        self.values
            .iter()
            .find(|(t, _)| &**t == tag)
            .map(|(_, v)| v)
    }

    /// Typed lookup. `Ok(None)` when absent, `TypeMismatch` when present
    /// with an incompatible variant.
    pub fn get_as<T: FromSubfield>(&self, tag: &str) -> Result<Option<T>> {
        match self.get(tag) {
            None => Ok(None),
            Some(value) => T::from_subfield(value)
                .map(Some)
                .ok_or_else(|| Iso8211Error::TypeMismatch {
                    subfield: tag.to_string(),
                    expected: T::EXPECTED,
                    found: value.kind_name(),
                }),
        }
    }

    /// Typed lookup of a subfield the caller cannot do without.
    pub fn require<T: FromSubfield>(&self, field: &str, tag: &str) -> Result<T> {
        self.get_as(tag)?
            .ok_or_else(|| Iso8211Error::MissingSubfield {
                field: field.to_string(),
                subfield: tag.to_string(),
            })
    }

    pub fn text(&self, tag: &str) -> Option<&str> {
        self.get(tag).and_then(SubfieldValue::as_text)
    }

    pub fn bytes(&self, tag: &str) -> Option<&[u8]> {
        self.get(tag).and_then(SubfieldValue::as_bytes)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubfieldValue)> {
        self.values.iter().map(|(t, v)| (&**t, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for SubfieldGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (tag, value) in &self.values {
            map.serialize_entry(&**tag, value)?;
        }
        map.end()
    }
}

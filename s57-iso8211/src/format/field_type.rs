//! Field-type descriptors declared by the descriptive (leader) record.
//!
//! Each descriptor carries a field-control block, a human readable name, an
//! array descriptor listing subfield tags (`*` prefix means the whole group
//! repeats) and format controls such as `(A(2),I(10),2b24)`. The subfield
//! layout is compiled once from the last two.

use super::leader::{RecordHeader, FIELD_TERMINATOR, UNIT_TERMINATOR};
use crate::error::{Iso8211Error, Result};
use crate::read::ByteSource;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// Tag of the file control field, whose array descriptor lists field-tree pairs.
pub const FILE_CONTROL_TAG: &str = "0000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataStructureCode {
    /// `'0'`: single data item, no internal structure.
    Elementary,
    /// `'1'`: linear structure.
    Linear,
    /// `'2'`: multi-dimensional structure.
    MultiDimensional,
}

impl DataStructureCode {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            b'0' => Ok(Self::Elementary),
            b'1' => Ok(Self::Linear),
            b'2' => Ok(Self::MultiDimensional),
            other => Err(Iso8211Error::InvalidStructureCode(char::from(other))),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Elementary => b'0',
            Self::Linear => b'1',
            Self::MultiDimensional => b'2',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataTypeCode {
    /// `'0'`
    Text,
    /// `'1'`
    Integer,
    /// `'5'`
    Binary,
    /// `'6'`
    Mixed,
}

impl DataTypeCode {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            b'0' => Ok(Self::Text),
            b'1' => Ok(Self::Integer),
            b'5' => Ok(Self::Binary),
            b'6' => Ok(Self::Mixed),
            other => Err(Iso8211Error::InvalidTypeCode(char::from(other))),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Text => b'0',
            Self::Integer => b'1',
            Self::Binary => b'5',
            Self::Mixed => b'6',
        }
    }
}

// ============================================================================
// Subfield layout
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubfieldKind {
    UInt8,
    UInt16,
    UInt32,
    Int8,
    Int16,
    Int32,
    /// Text of a fixed number of characters.
    FixedText(usize),
    /// Text closed by a unit or field terminator.
    DelimitedText,
    /// Raw bytes of a fixed length.
    Bytes(usize),
}

impl SubfieldKind {
    /// Width in bytes for binary kinds.
    pub fn binary_width(self) -> Option<usize> {
        match self {
            Self::UInt8 | Self::Int8 => Some(1),
            Self::UInt16 | Self::Int16 => Some(2),
            Self::UInt32 | Self::Int32 => Some(4),
            Self::Bytes(n) => Some(n),
            Self::FixedText(_) | Self::DelimitedText => None,
        }
    }

    fn from_token(word: &str, width: Option<usize>) -> Option<Self> {
        match (word, width) {
            ("A" | "I" | "R", Some(w)) => Some(Self::FixedText(w)),
            ("A" | "I" | "R", None) => Some(Self::DelimitedText),
            ("B", Some(bits)) => Some(Self::Bytes(bits / 8)),
            ("b11", _) => Some(Self::UInt8),
            ("b12", _) => Some(Self::UInt16),
            ("b14", _) => Some(Self::UInt32),
            ("b21", _) => Some(Self::Int8),
            ("b22", _) => Some(Self::Int16),
            ("b24", _) => Some(Self::Int32),
            _ => None,
        }
    }

    /// Format control token that produces this kind.
    pub fn format_token(self) -> String {
        match self {
            Self::UInt8 => "b11".into(),
            Self::UInt16 => "b12".into(),
            Self::UInt32 => "b14".into(),
            Self::Int8 => "b21".into(),
            Self::Int16 => "b22".into(),
            Self::Int32 => "b24".into(),
            Self::FixedText(w) => format!("A({w})"),
            Self::DelimitedText => "A".into(),
            Self::Bytes(n) => format!("B({})", n * 8),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubfieldType {
    pub tag: Arc<str>,
    pub kind: SubfieldKind,
}

struct FormatToken<'a> {
    count: usize,
    word: &'a str,
    width: Option<usize>,
}

/// Split format controls into `count? word ('(' width ')')?` tokens.
fn tokenize(format: &str) -> Vec<FormatToken<'_>> {
    let bytes = format.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if !is_word(bytes[i]) {
            i += 1;
            continue;
        }

        let count_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let mut count_end = i;
        let word_start = if i < bytes.len() && is_word(bytes[i]) {
            i
        } else {
            // Bare digits: treat them as the word itself.
            count_end = count_start;
            count_start
        };
        while i < bytes.len() && is_word(bytes[i]) {
            i += 1;
        }
        let word = &format[word_start..i];

        let mut width = None;
        if i < bytes.len() && bytes[i] == b'(' {
            let mut j = i;
            while j < bytes.len() && bytes[j] == b'(' {
                j += 1;
            }
            let digits_start = j;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > digits_start {
                width = format[digits_start..j].parse().ok();
                while j < bytes.len() && bytes[j] == b')' {
                    j += 1;
                }
                i = j;
            }
        }

        let count = format[count_start..count_end].parse().unwrap_or(1);
        tokens.push(FormatToken { count, word, width });
    }
    tokens
}

/// Compile format controls against the tags of an array descriptor.
///
/// Each token occupies `count` consecutive tags. Unknown tokens keep their
/// tag slots but produce no subfield.
pub fn parse_format_controls(format: &str, tags: &[&str]) -> Result<Vec<SubfieldType>> {
    let mut subfields = Vec::with_capacity(tags.len());
    let mut slot = 0;

    for token in tokenize(format) {
        let kind = SubfieldKind::from_token(token.word, token.width);
        if kind.is_none() {
            tracing::trace!(token = token.word, "skipping unknown format token");
        }
        for _ in 0..token.count {
            let tag = tags.get(slot).ok_or_else(|| {
                Iso8211Error::malformed(format!(
                    "format controls {format:?} describe more than {} subfields",
                    tags.len()
                ))
            })?;
            slot += 1;
            if let Some(kind) = kind {
                subfields.push(SubfieldType {
                    tag: Arc::from(*tag),
                    kind,
                });
            }
        }
    }
    Ok(subfields)
}

// ============================================================================
// Descriptor
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FieldTypeDescriptor {
    pub tag: String,
    pub name: String,
    pub structure: DataStructureCode,
    pub data_type: DataTypeCode,
    pub auxiliary_controls: String,
    pub printable_field_terminator: char,
    pub printable_unit_terminator: char,
    pub escape_sequence: String,
    pub array_descriptor: String,
    pub format_controls: String,
    pub repeating: bool,
    subfields: Vec<SubfieldType>,
}

impl FieldTypeDescriptor {
    /// Parse the raw bytes of one descriptive field.
    ///
    /// `field_control_length` comes from the leader; the auxiliary controls
    /// take whatever the fixed seven bytes around them leave over.
    pub fn parse(tag: &str, bytes: &[u8], field_control_length: usize) -> Result<Self> {
        if field_control_length < 7 || bytes.len() < field_control_length {
            return Err(Iso8211Error::malformed(format!(
                "field {tag}: {} bytes cannot hold a {field_control_length}-byte control block",
                bytes.len()
            )));
        }
        let structure = DataStructureCode::from_byte(bytes[0])?;
        let data_type = DataTypeCode::from_byte(bytes[1])?;
        let aux_end = field_control_length - 5;
        let latin = |b: &[u8]| b.iter().map(|&c| char::from(c)).collect::<String>();

        let rest: Vec<u8> = bytes[field_control_length..]
            .iter()
            .copied()
            .filter(|&b| b != FIELD_TERMINATOR)
            .collect();
        let mut parts = rest.split(|&b| b == UNIT_TERMINATOR);
        let name = latin(parts.next().unwrap_or_default());
        let array_descriptor = latin(parts.next().unwrap_or_default());
        let format_controls = latin(parts.next().unwrap_or_default());

        Self::new(
            tag,
            name,
            structure,
            data_type,
            latin(&bytes[2..aux_end]),
            char::from(bytes[aux_end]),
            char::from(bytes[aux_end + 1]),
            latin(&bytes[aux_end + 2..field_control_length]),
            array_descriptor,
            format_controls,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tag: impl Into<String>,
        name: impl Into<String>,
        structure: DataStructureCode,
        data_type: DataTypeCode,
        auxiliary_controls: impl Into<String>,
        printable_field_terminator: char,
        printable_unit_terminator: char,
        escape_sequence: impl Into<String>,
        array_descriptor: impl Into<String>,
        format_controls: impl Into<String>,
    ) -> Result<Self> {
        let array_descriptor = array_descriptor.into();
        let format_controls = format_controls.into();
        let repeating = array_descriptor.starts_with('*');

        let subfields = if format_controls.len() > 2 {
            let list = array_descriptor.trim_start_matches('*');
            let tags: Vec<&str> = if list.is_empty() {
                vec![""]
            } else {
                list.split('!').collect()
            };
            parse_format_controls(&format_controls, &tags)?
        } else {
            Vec::new()
        };

        Ok(Self {
            tag: tag.into(),
            name: name.into(),
            structure,
            data_type,
            auxiliary_controls: auxiliary_controls.into(),
            printable_field_terminator,
            printable_unit_terminator,
            escape_sequence: escape_sequence.into(),
            array_descriptor,
            format_controls,
            repeating,
            subfields,
        })
    }

    pub fn subfields(&self) -> &[SubfieldType] {
        &self.subfields
    }
}

/// One parent/child pair from the file control field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldControl {
    pub parent: String,
    pub child: String,
}

fn parse_field_controls(array_descriptor: &str) -> Vec<FieldControl> {
    let chars: Vec<char> = array_descriptor.chars().collect();
    chars
        .chunks_exact(8)
        .map(|pair| FieldControl {
            parent: pair[..4].iter().collect(),
            child: pair[4..].iter().collect(),
        })
        .collect()
}

// ============================================================================
// Table
// ============================================================================

/// Field-type descriptors of one file, keyed by tag.
#[derive(Debug, Clone, Default)]
pub struct FieldTypeTable {
    descriptors: FxHashMap<String, FieldTypeDescriptor>,
    field_controls: Vec<FieldControl>,
}

impl FieldTypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the descriptive record at the current position of `src`.
    pub fn decode<S: ByteSource>(src: &mut S) -> Result<Self> {
        let header = RecordHeader::read(src)?;
        if !header.leader.is_descriptive() {
            return Err(Iso8211Error::malformed(format!(
                "expected descriptive leader, found identifier {:?}",
                char::from(header.leader.leader_id)
            )));
        }

        let mut table = Self::new();
        for entry in &header.entries {
            let bytes = src.read_bytes(entry.length)?;
            let descriptor =
                FieldTypeDescriptor::parse(&entry.tag, &bytes, header.leader.field_control_length)?;
            tracing::trace!(
                tag = %entry.tag,
                name = %descriptor.name,
                subfields = descriptor.subfields().len(),
                repeating = descriptor.repeating,
                "field type"
            );
            table.insert(descriptor);
        }
        tracing::debug!(fields = table.len(), "decoded field type table");
        Ok(table)
    }

    pub fn insert(&mut self, descriptor: FieldTypeDescriptor) {
        if descriptor.tag == FILE_CONTROL_TAG {
            self.field_controls = parse_field_controls(&descriptor.array_descriptor);
        }
        self.descriptors.insert(descriptor.tag.clone(), descriptor);
    }

    pub fn get(&self, tag: &str) -> Option<&FieldTypeDescriptor> {
        self.descriptors.get(tag)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in tag order.
    pub fn sorted(&self) -> Vec<&FieldTypeDescriptor> {
        let mut all: Vec<_> = self.descriptors.values().collect();
        all.sort_by(|a, b| a.tag.cmp(&b.tag));
        all
    }

    pub fn field_controls(&self) -> &[FieldControl] {
        &self.field_controls
    }
}

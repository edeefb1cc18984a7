//! Data record decoding.
//!
//! A data record reuses the leader/directory layout of the descriptive
//! record; its field area is decoded field by field against the
//! [`FieldTypeTable`]. Each field gets a budget of `length - 1` bytes (the
//! directory length counts the trailing field terminator), and repeating
//! fields decode groups until fewer than two budget bytes remain.

use super::field_type::{FieldTypeDescriptor, FieldTypeTable, SubfieldKind};
use super::leader::{DirectoryEntry, Leader, RecordHeader, FIELD_TERMINATOR, UNIT_TERMINATOR};
use super::text::{TextEncoding, TextEncodings};
use super::value::{SubfieldGroup, SubfieldValue};
use crate::error::{Iso8211Error, Result};
use crate::read::ByteSource;
use serde::Serialize;

/// One decoded field of a data record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub tag: String,
    pub length: usize,
    pub position: usize,
    /// Exactly one group unless the field repeats.
    pub groups: Vec<SubfieldGroup>,
}

impl Field {
    pub fn first(&self) -> Option<&SubfieldGroup> {
        self.groups.first()
    }
}

#[derive(Debug, Clone)]
pub struct DataRecord {
    pub leader: Leader,
    pub fields: Vec<Field>,
}

impl DataRecord {
    pub fn field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}

/// Decode the data record at the current position of `src`.
pub fn decode_record<S: ByteSource>(
    src: &mut S,
    table: &FieldTypeTable,
    encodings: &TextEncodings,
) -> Result<DataRecord> {
    let header = RecordHeader::read(src)?;
    let mut fields = Vec::with_capacity(header.entries.len());

    for entry in &header.entries {
        let descriptor = table
            .get(&entry.tag)
            .ok_or_else(|| Iso8211Error::UnknownFieldTag(entry.tag.clone()))?;
        let encoding = encodings.get(&entry.tag);
        fields.push(decode_field(src, descriptor, entry, encoding)?);
    }

    // Some producers close the record with an extra terminator.
    src.skip_optional(FIELD_TERMINATOR)?;

    Ok(DataRecord {
        leader: header.leader,
        fields,
    })
}

fn decode_field<S: ByteSource>(
    src: &mut S,
    descriptor: &FieldTypeDescriptor,
    entry: &DirectoryEntry,
    encoding: TextEncoding,
) -> Result<Field> {
    let mut budget = entry.length.saturating_sub(1);
    let mut groups = Vec::new();
    let mut terminated = false;

    if descriptor.subfields().is_empty() {
        src.read_bytes(budget)?;
    } else {
        loop {
            let decoded = decode_group(src, descriptor, encoding)?;
            budget = budget.saturating_sub(decoded.consumed);
            if !decoded.group.is_empty() {
                groups.push(decoded.group);
            }
            if decoded.hit_field_terminator {
                terminated = true;
                break;
            }
            if !descriptor.repeating || decoded.consumed == 0 || budget < 2 {
                break;
            }
        }
    }

    if !terminated && src.skip_optional(FIELD_TERMINATOR)? && encoding == TextEncoding::DoubleByte
    {
        src.skip_optional(0x00)?;
    }

    Ok(Field {
        tag: entry.tag.clone(),
        length: entry.length,
        position: entry.position,
        groups,
    })
}

struct DecodedGroup {
    group: SubfieldGroup,
    consumed: usize,
    hit_field_terminator: bool,
}

fn decode_group<S: ByteSource>(
    src: &mut S,
    descriptor: &FieldTypeDescriptor,
    encoding: TextEncoding,
) -> Result<DecodedGroup> {
    let mut group = SubfieldGroup::new();
    let mut consumed = 0;

    for subfield in descriptor.subfields() {
        let value = match subfield.kind {
            SubfieldKind::UInt8 => SubfieldValue::UInt8(src.next_byte()?),
            SubfieldKind::UInt16 => SubfieldValue::UInt16(u16::from_le_bytes(src.read_array()?)),
            SubfieldKind::UInt32 => SubfieldValue::UInt32(u32::from_le_bytes(src.read_array()?)),
            SubfieldKind::Int8 => SubfieldValue::Int8(i8::from_le_bytes(src.read_array()?)),
            SubfieldKind::Int16 => SubfieldValue::Int16(i16::from_le_bytes(src.read_array()?)),
            SubfieldKind::Int32 => SubfieldValue::Int32(i32::from_le_bytes(src.read_array()?)),
            SubfieldKind::Bytes(n) => SubfieldValue::Bytes(src.read_bytes(n)?),
            SubfieldKind::FixedText(width) => {
                let len = width.checked_mul(encoding.unit_width()).ok_or_else(|| {
                    Iso8211Error::MalformedLeader(format!(
                        "field {}: fixed text width {width} is too large",
                        descriptor.tag
                    ))
                })?;
                let bytes = src.read_bytes(len)?;
                consumed += bytes.len();
                group.push(
                    subfield.tag.clone(),
                    SubfieldValue::Text(encoding.decode(&descriptor.tag, &bytes)?),
                );
                continue;
            }
            SubfieldKind::DelimitedText => {
                let (bytes, terminator) = read_delimited(src, encoding)?;
                consumed += bytes.len() + encoding.unit_width();
                group.push(
                    subfield.tag.clone(),
                    SubfieldValue::Text(encoding.decode(&descriptor.tag, &bytes)?),
                );
                if terminator == FIELD_TERMINATOR {
                    return Ok(DecodedGroup {
                        group,
                        consumed,
                        hit_field_terminator: true,
                    });
                }
                continue;
            }
        };
        consumed += subfield.kind.binary_width().unwrap_or(0);
        group.push(subfield.tag.clone(), value);
    }

    Ok(DecodedGroup {
        group,
        consumed,
        hit_field_terminator: false,
    })
}

/// Read text up to a unit or field terminator. Returns the text bytes and
/// the terminator that closed them.
fn read_delimited<S: ByteSource>(src: &mut S, encoding: TextEncoding) -> Result<(Vec<u8>, u8)> {
    let is_terminator = |b: u8| b == UNIT_TERMINATOR || b == FIELD_TERMINATOR;
    let mut bytes = Vec::new();

    match encoding {
        TextEncoding::SingleByte => loop {
            let b = src.next_byte()?;
            if is_terminator(b) {
                return Ok((bytes, b));
            }
            bytes.push(b);
        },
        TextEncoding::DoubleByte => loop {
            let lo = src.next_byte()?;
            let hi = src.next_byte()?;
            if hi == 0x00 && is_terminator(lo) {
                return Ok((bytes, lo));
            }
            bytes.push(lo);
            bytes.push(hi);
        },
    }
}

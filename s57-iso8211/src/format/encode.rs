//! ISO 8211 record writer.
//!
//! Produces standard leader/directory/field-area bytes for descriptive and
//! data records. Used to build fixtures and to re-emit decoded values.
//!
//! ```text
//! leader (24B) | directory: (tag, length, position)* FT | field area
//! ```

use super::field_type::{DataStructureCode, DataTypeCode, FILE_CONTROL_TAG};
use super::leader::{FIELD_TERMINATOR, LEADER_LEN, UNIT_TERMINATOR};
use super::text::TextEncoding;
use super::value::SubfieldValue;

const TAG_WIDTH: usize = 4;

/// Declaration of one field type for the descriptive record.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub tag: String,
    pub name: String,
    pub structure: DataStructureCode,
    pub data_type: DataTypeCode,
    pub array_descriptor: String,
    pub format_controls: String,
}

impl FieldDefinition {
    pub fn new(tag: &str, name: &str, array_descriptor: &str, format_controls: &str) -> Self {
        let structure = if array_descriptor.is_empty() {
            DataStructureCode::Elementary
        } else if array_descriptor.starts_with('*') {
            DataStructureCode::MultiDimensional
        } else {
            DataStructureCode::Linear
        };
        Self {
            tag: tag.to_string(),
            name: name.to_string(),
            structure,
            data_type: DataTypeCode::Mixed,
            array_descriptor: array_descriptor.to_string(),
            format_controls: format_controls.to_string(),
        }
    }

    /// The `0000` file control field listing parent/child tag pairs.
    pub fn file_control(title: &str, pairs: &[(&str, &str)]) -> Self {
        let array: String = pairs.iter().map(|(p, c)| format!("{p}{c}")).collect();
        Self {
            tag: FILE_CONTROL_TAG.to_string(),
            name: title.to_string(),
            structure: DataStructureCode::Elementary,
            data_type: DataTypeCode::Text,
            array_descriptor: array,
            format_controls: String::new(),
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.structure.as_byte(), self.data_type.as_byte()];
        out.extend_from_slice(b"00;&   ");
        out.extend_from_slice(self.name.as_bytes());
        out.push(UNIT_TERMINATOR);
        out.extend_from_slice(self.array_descriptor.as_bytes());
        out.push(UNIT_TERMINATOR);
        out.extend_from_slice(self.format_controls.as_bytes());
        out.push(FIELD_TERMINATOR);
        out
    }
}

/// Builds the subfield bytes of one data field.
#[derive(Debug, Clone, Default)]
pub struct FieldWriter {
    buf: Vec<u8>,
    encoding: TextEncoding,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer whose delimited text and terminators use `encoding`.
    pub fn with_encoding(encoding: TextEncoding) -> Self {
        Self {
            buf: Vec::new(),
            encoding,
        }
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(v);
        self
    }

    /// Any binary value, little-endian.
    pub fn value(&mut self, v: &SubfieldValue) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    /// Fixed-width text, space padded or truncated to `width` characters.
    pub fn fixed_text(&mut self, text: &str, width: usize) -> &mut Self {
        let padded: String = text.chars().chain(std::iter::repeat(' ')).take(width).collect();
        let bytes = self.encoding.encode(&padded);
        self.buf.extend_from_slice(&bytes);
        self
    }

    /// Delimited text closed by a unit terminator.
    pub fn text(&mut self, text: &str) -> &mut Self {
        let bytes = self.encoding.encode(text);
        self.buf.extend_from_slice(&bytes);
        self.terminator(UNIT_TERMINATOR);
        self
    }

    fn terminator(&mut self, byte: u8) {
        self.buf.push(byte);
        if self.encoding == TextEncoding::DoubleByte {
            self.buf.push(0x00);
        }
    }

    /// Field bytes including the closing field terminator.
    pub fn finish(&self) -> Vec<u8> {
        let mut out = self.buf.clone();
        out.push(FIELD_TERMINATOR);
        if self.encoding == TextEncoding::DoubleByte {
            out.push(0x00);
        }
        out
    }
}

// ============================================================================
// Records
// ============================================================================

struct RecordWriter {
    fields: Vec<(String, Vec<u8>)>,
}

impl RecordWriter {
    fn build(&self, descriptive: bool) -> Vec<u8> {
        let area_len: usize = self.fields.iter().map(|(_, b)| b.len()).sum();
        let max_len = self.fields.iter().map(|(_, b)| b.len()).max().unwrap_or(0);
        let len_width = digits(max_len).max(3);
        let pos_width = digits(area_len).max(4);
        let tag_width = TAG_WIDTH;

        let mut directory = Vec::new();
        let mut position = 0;
        for (tag, bytes) in &self.fields {
            directory.extend_from_slice(format!("{tag:<tag_width$}").as_bytes());
            directory.extend_from_slice(format!("{:0len_width$}", bytes.len()).as_bytes());
            directory.extend_from_slice(format!("{position:0pos_width$}").as_bytes());
            position += bytes.len();
        }
        directory.push(FIELD_TERMINATOR);

        let base = LEADER_LEN + directory.len();
        let total = base + area_len;
        let leader = if descriptive {
            format!("{total:05}3LE1 09{base:05} ! {len_width}{pos_width}0{tag_width}")
        } else {
            format!("{total:05} D     {base:05}   {len_width}{pos_width}0{tag_width}")
        };

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(leader.as_bytes());
        out.extend_from_slice(&directory);
        for (_, bytes) in &self.fields {
            out.extend_from_slice(bytes);
        }
        out
    }
}

fn digits(n: usize) -> usize {
    n.max(1).ilog10() as usize + 1
}

/// Writes the descriptive record that opens every file.
pub struct DescriptiveRecordBuilder {
    defs: Vec<FieldDefinition>,
}

impl DescriptiveRecordBuilder {
    pub fn new() -> Self {
        Self { defs: Vec::new() }
    }

    pub fn field(&mut self, def: FieldDefinition) -> &mut Self {
        self.defs.push(def);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        RecordWriter {
            fields: self
                .defs
                .iter()
                .map(|d| (d.tag.clone(), d.to_bytes()))
                .collect(),
        }
        .build(true)
    }
}

impl Default for DescriptiveRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes one data record.
#[derive(Default)]
pub struct DataRecordBuilder {
    fields: Vec<(String, Vec<u8>)>,
}

impl DataRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&mut self, tag: &str, writer: &FieldWriter) -> &mut Self {
        self.fields.push((tag.to_string(), writer.finish()));
        self
    }

    /// Field made of `payload` followed by a field terminator.
    pub fn raw_field(&mut self, tag: &str, payload: &[u8]) -> &mut Self {
        self.raw_field_with_terminator(tag, payload, &[FIELD_TERMINATOR])
    }

    /// Field with an explicit (possibly empty) terminator sequence.
    pub fn raw_field_with_terminator(
        &mut self,
        tag: &str,
        payload: &[u8],
        terminator: &[u8],
    ) -> &mut Self {
        let mut bytes = payload.to_vec();
        bytes.extend_from_slice(terminator);
        self.fields.push((tag.to_string(), bytes));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        RecordWriter {
            fields: self.fields.clone(),
        }
        .build(false)
    }
}

//! Record leader and directory.
//!
//! Every ISO 8211 record starts with the same 24-byte leader followed by a
//! directory of `(tag, length, position)` entries:
//!
//! ```text
//! [0..5)   record length           (digits)
//! [5]      interchange level
//! [6]      leader identifier       ('L' descriptive, 'D'/'R' data)
//! [7]      inline code extension
//! [8]      version number
//! [9]      application indicator
//! [10..12) field control length    (digits, blank in data records)
//! [12..17) base address of field area (digits)
//! [17..20) extended character set
//! [20]     size of field length    (digit)
//! [21]     size of field position  (digit)
//! [22]     reserved
//! [23]     size of field tag       (digit)
//! ```
//!
//! The directory holds `(base_address - 1 - 24) / entry_size` entries and is
//! closed by a field terminator, which some producers omit.

use crate::error::{Iso8211Error, Result};
use crate::read::ByteSource;
use serde::Serialize;

/// Unit terminator, ends a delimited subfield.
pub const UNIT_TERMINATOR: u8 = 0x1F;
/// Field terminator, ends a field (and the directory).
pub const FIELD_TERMINATOR: u8 = 0x1E;
/// Fixed size of every record leader.
pub const LEADER_LEN: usize = 24;

const DEFAULT_FIELD_CONTROL_LENGTH: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leader {
    pub record_length: usize,
    pub interchange_level: u8,
    pub leader_id: u8,
    pub inline_code_extension: u8,
    pub version: u8,
    pub application_indicator: u8,
    pub field_control_length: usize,
    pub base_address: usize,
    pub extended_charset: [u8; 3],
    pub size_of_field_length: usize,
    pub size_of_field_position: usize,
    pub size_of_field_tag: usize,
}

impl Leader {
    pub fn parse(bytes: &[u8; LEADER_LEN]) -> Result<Self> {
        let leader = Self {
            record_length: parse_number("record length", &bytes[0..5])?,
            interchange_level: bytes[5],
            leader_id: bytes[6],
            inline_code_extension: bytes[7],
            version: bytes[8],
            application_indicator: bytes[9],
            field_control_length: parse_optional_number("field control length", &bytes[10..12])?
                .unwrap_or(DEFAULT_FIELD_CONTROL_LENGTH),
            base_address: parse_number("base address", &bytes[12..17])?,
            extended_charset: [bytes[17], bytes[18], bytes[19]],
            size_of_field_length: parse_number("size of field length", &bytes[20..21])?,
            size_of_field_position: parse_number("size of field position", &bytes[21..22])?,
            size_of_field_tag: parse_number("size of field tag", &bytes[23..24])?,
        };

        if leader.entry_size() == 0 {
            return Err(Iso8211Error::malformed("directory entry size is zero"));
        }
        if leader.base_address < LEADER_LEN + 1 {
            return Err(Iso8211Error::malformed(format!(
                "base address {} inside leader",
                leader.base_address
            )));
        }
        Ok(leader)
    }

    pub fn entry_size(&self) -> usize {
        self.size_of_field_tag + self.size_of_field_length + self.size_of_field_position
    }

    pub fn entry_count(&self) -> usize {
        (self.base_address - 1 - LEADER_LEN) / self.entry_size()
    }

    pub fn is_descriptive(&self) -> bool {
        self.leader_id == b'L'
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub tag: String,
    pub length: usize,
    pub position: usize,
}

/// Leader plus directory of one record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordHeader {
    pub leader: Leader,
    pub entries: Vec<DirectoryEntry>,
}

impl RecordHeader {
    pub fn read<S: ByteSource>(src: &mut S) -> Result<Self> {
        let leader = Leader::parse(&src.read_array::<LEADER_LEN>()?)?;

        let count = leader.entry_count();
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let tag = src.read_bytes(leader.size_of_field_tag)?;
            let length = src.read_bytes(leader.size_of_field_length)?;
            let position = src.read_bytes(leader.size_of_field_position)?;
            entries.push(DirectoryEntry {
                tag: String::from_utf8_lossy(&tag).into_owned(),
                length: parse_number("directory field length", &length)?,
                position: parse_number("directory field position", &position)?,
            });
        }
        src.skip_optional(FIELD_TERMINATOR)?;

        tracing::trace!(
            leader_id = %char::from(leader.leader_id),
            record_length = leader.record_length,
            fields = entries.len(),
            "read record header"
        );
        Ok(Self { leader, entries })
    }
}

fn parse_optional_number(what: &str, bytes: &[u8]) -> Result<Option<usize>> {
    if bytes.iter().all(|&b| b == b' ') {
        return Ok(None);
    }
    parse_number(what, bytes).map(Some)
}

fn parse_number(what: &str, bytes: &[u8]) -> Result<usize> {
    let digits = std::str::from_utf8(bytes)
        .map(str::trim)
        .unwrap_or_default();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Iso8211Error::malformed(format!(
            "{what} is not numeric: {:?}",
            String::from_utf8_lossy(bytes)
        )));
    }
    digits
        .parse()
        .map_err(|e| Iso8211Error::malformed(format!("{what}: {e}")))
}

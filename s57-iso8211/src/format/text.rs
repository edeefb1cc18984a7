//! Text encodings for character subfields.
//!
//! ISO 8211 itself is encoding-agnostic; applications declare per field
//! whether text is single-byte (Latin-1 family) or double-byte (UCS-2
//! little-endian). In double-byte fields the unit and field terminators are
//! followed by a `0x00` synchronisation byte.

use crate::error::{Iso8211Error, Result};
use encoding_rs::{UTF_16LE, WINDOWS_1252};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    #[default]
    SingleByte,
    DoubleByte,
}

impl TextEncoding {
    /// Bytes per character unit.
    pub fn unit_width(self) -> usize {
        match self {
            TextEncoding::SingleByte => 1,
            TextEncoding::DoubleByte => 2,
        }
    }

    pub fn decode(self, tag: &str, bytes: &[u8]) -> Result<String> {
        let decoded = match self {
            TextEncoding::SingleByte => {
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::DoubleByte => {
                UTF_16LE.decode_without_bom_handling_and_without_replacement(bytes)
            }
        };
        decoded
            .map(|cow| cow.into_owned())
            .ok_or_else(|| Iso8211Error::Encoding {
                tag: tag.to_string(),
                reason: format!("{} bytes are not valid {:?} text", bytes.len(), self),
            })
    }

    /// Encode text for writing. Characters outside the single-byte
    /// repertoire are replaced by `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::SingleByte => {
                let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
                if had_errors {
                    text.chars()
                        .map(|c| {
                            let mut buf = [0u8; 4];
                            let (b, _, err) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
                            if err {
                                b'?'
                            } else {
                                b[0]
                            }
                        })
                        .collect()
                } else {
                    bytes.into_owned()
                }
            }
            TextEncoding::DoubleByte => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

/// Per-tag text encoding state for one decoding session.
///
/// Fields without an explicit entry are single-byte.
#[derive(Debug, Clone, Default)]
pub struct TextEncodings {
    by_tag: FxHashMap<String, TextEncoding>,
}

impl TextEncodings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: &str) -> TextEncoding {
        self.by_tag.get(tag).copied().unwrap_or_default()
    }

    pub fn set(&mut self, tag: impl Into<String>, encoding: TextEncoding) {
        self.by_tag.insert(tag.into(), encoding);
    }
}

//! Error types for ISO 8211 decoding.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Iso8211Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header or directory size fields that are not numeric or inconsistent.
    #[error("malformed leader: {0}")]
    MalformedLeader(String),

    #[error("invalid data structure code {0:?}")]
    InvalidStructureCode(char),

    #[error("invalid data type code {0:?}")]
    InvalidTypeCode(char),

    /// A data record references a tag the descriptive record never declared.
    #[error("unknown field tag {0:?}")]
    UnknownFieldTag(String),

    #[error("encoding error in field {tag}: {reason}")]
    Encoding { tag: String, reason: String },

    /// The byte source ran dry. Callers decide whether this is a clean end
    /// of file or a truncated record.
    #[error("unexpected end of data")]
    UnexpectedEndOfData,

    #[error("field {field} has no subfield {subfield}")]
    MissingSubfield { field: String, subfield: String },

    #[error("subfield {subfield}: expected {expected}, found {found}")]
    TypeMismatch {
        subfield: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl Iso8211Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Iso8211Error::MalformedLeader(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Iso8211Error>;

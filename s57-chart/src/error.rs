//! Error types for the S-57 chart layer.

use s57_iso8211::Iso8211Error;
use thiserror::Error;

/// Chart construction errors.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Decoding the underlying ISO 8211 stream failed.
    #[error("decode error: {0}")]
    Decode(#[from] Iso8211Error),

    /// A record lacks a structural field its kind requires.
    #[error("record {record} is missing required field {field}")]
    MissingRequiredField { record: String, field: &'static str },

    /// A record keyed as catalog lacks the `CATD` field.
    #[error("record {0} is not a catalog entry")]
    NotACatalogEntry(String),

    /// A subfield holds a value outside its domain.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// Reference table could not be loaded.
    #[error("lookup table error: {0}")]
    Lookup(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ChartError {
    fn from(e: csv::Error) -> Self {
        ChartError::Lookup(e.to_string())
    }
}

/// Result type for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;

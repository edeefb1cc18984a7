//! ISO/IEC 8211 record decoding for S-57 chart files.
//!
//! ISO 8211 files are self-describing: the first (descriptive) record
//! declares every field type and its subfield layout, and each following
//! data record is decoded against that table. This crate knows nothing about
//! S-57 semantics; it turns bytes into [`GenericItem`]s keyed by field tag.
//!
//! ```text
//! ByteSource ─► FieldTypeTable (descriptive record)
//!     │                 │
//!     └──► decode_record ┴─► DataRecord ─► GenericItem
//! ```

pub mod error;
pub mod format;
pub mod read;

// ── Format types ─────────────────────────────────────────────────────────────
pub use format::{
    DataRecord, DataStructureCode, DataTypeCode, DirectoryEntry, Field, FieldControl,
    FieldTypeDescriptor, FieldTypeTable, FromSubfield, Leader, SubfieldGroup, SubfieldKind,
    SubfieldType, SubfieldValue, TextEncoding, TextEncodings,
};

// ── Read-side types ──────────────────────────────────────────────────────────
pub use read::{
    record_name_code, ByteSource, GenericItem, ItemField, Iso8211Reader, ReaderSource, RecordKey,
    SliceSource,
};

// ── Writing ──────────────────────────────────────────────────────────────────
pub use format::{DataRecordBuilder, DescriptiveRecordBuilder, FieldDefinition, FieldWriter};

pub use error::{Iso8211Error, Result};

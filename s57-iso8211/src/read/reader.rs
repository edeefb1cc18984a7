//! Streaming reader over one ISO 8211 file.

use super::byte_source::{ByteSource, ReaderSource};
use super::item::GenericItem;
use crate::error::Result;
use crate::format::{decode_record, DataRecord, FieldTypeTable, TextEncoding, TextEncodings};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decodes the descriptive record on construction, then yields data records
/// strictly in stream order.
pub struct Iso8211Reader<S> {
    src: S,
    table: FieldTypeTable,
    encodings: TextEncodings,
    records_read: u64,
}

impl<S: ByteSource> Iso8211Reader<S> {
    pub fn new(mut src: S) -> Result<Self> {
        let table = FieldTypeTable::decode(&mut src)?;
        Ok(Self {
            src,
            table,
            encodings: TextEncodings::new(),
            records_read: 0,
        })
    }

    pub fn field_types(&self) -> &FieldTypeTable {
        &self.table
    }

    /// Select the text encoding for subsequent occurrences of `tag`.
    pub fn set_encoding(&mut self, tag: &str, encoding: TextEncoding) {
        self.encodings.set(tag, encoding);
    }

    pub fn encodings(&self) -> &TextEncodings {
        &self.encodings
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Next data record, or `None` once the source is exhausted between
    /// records. Running out of bytes inside a record is an error.
    pub fn next_record(&mut self) -> Result<Option<DataRecord>> {
        if !self.src.has_remaining()? {
            return Ok(None);
        }
        let record = decode_record(&mut self.src, &self.table, &self.encodings)?;
        self.records_read += 1;
        Ok(Some(record))
    }

    pub fn next_item(&mut self) -> Result<Option<GenericItem>> {
        Ok(self
            .next_record()?
            .map(|record| GenericItem::from_record(record, &self.table)))
    }
}

impl Iso8211Reader<ReaderSource<BufReader<File>>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(ReaderSource::new(BufReader::new(file)))
    }
}

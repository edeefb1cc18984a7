//! Parse a whole ISO 8211 file into a [`Chart`].

use crate::builder::ChartBuilder;
use crate::chart::Chart;
use crate::error::Result;
use crate::lookup::LookupTables;
use s57_iso8211::{ByteSource, Iso8211Reader, ReaderSource, SliceSource};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decode every record of `source` and build the chart.
///
/// Text in `ATTF`/`NATF` is read as single byte until a `DSSI` field is
/// seen; from the next record on, its lexical levels apply. Decoding errors
/// end the parse; errors in a single record's content only skip it.
pub fn parse<S: ByteSource>(source: S, lookups: &LookupTables) -> Result<Chart> {
    let mut reader = Iso8211Reader::new(source)?;
    tracing::debug!(field_types = reader.field_types().len(), "descriptive record decoded");

    let mut builder = ChartBuilder::new(lookups);
    let mut encodings_set = false;
    while let Some(item) = reader.next_item()? {
        builder.add_item(&item);
        if !encodings_set {
            if let Some(structure) = builder.structure() {
                reader.set_encoding("ATTF", structure.attribute_encoding());
                reader.set_encoding("NATF", structure.national_encoding());
                encodings_set = true;
            }
        }
    }

    let chart = builder.finish();
    tracing::debug!(
        records = reader.records_read(),
        vectors = chart.vectors().len(),
        features = chart.features().len(),
        catalog_entries = chart.catalog().len(),
        skipped = chart.stats().records_skipped,
        "chart built"
    );
    Ok(chart)
}

pub fn parse_bytes(bytes: &[u8], lookups: &LookupTables) -> Result<Chart> {
    parse(SliceSource::new(bytes), lookups)
}

pub fn parse_file(path: impl AsRef<Path>, lookups: &LookupTables) -> Result<Chart> {
    let path = path.as_ref();
    let span = tracing::debug_span!("parse_file", path = %path.display());
    let _guard = span.enter();
    let file = File::open(path)?;
    parse(ReaderSource::new(BufReader::new(file)), lookups)
}

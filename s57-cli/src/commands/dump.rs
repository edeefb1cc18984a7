use crate::error::CliResult;
use crate::output;
use s57_iso8211::Iso8211Reader;
use std::path::Path;

/// Print the field-type table, then one JSON line per record.
pub fn run(file: &Path, limit: Option<usize>) -> CliResult<()> {
    let mut reader = Iso8211Reader::open(file)?;

    let mut types = output::table(&["Tag", "Name", "Structure", "Type", "Array", "Format"]);
    for descriptor in reader.field_types().sorted() {
        types.add_row(vec![
            descriptor.tag.clone(),
            descriptor.name.clone(),
            format!("{:?}", descriptor.structure),
            format!("{:?}", descriptor.data_type),
            descriptor.array_descriptor.clone(),
            descriptor.format_controls.clone(),
        ]);
    }
    println!("{types}");

    let limit = limit.unwrap_or(usize::MAX);
    let mut printed = 0;
    while printed < limit {
        let Some(item) = reader.next_item()? else {
            break;
        };
        println!("{}", serde_json::to_string(&item)?);
        printed += 1;
    }
    tracing::info!(records = printed, "dump complete");
    Ok(())
}

use crate::error::CliResult;
use comfy_table::{ContentArrangement, Table};
use s57_chart::BoundingBox;
use serde::Serialize;

/// A table with the CLI's standard layout.
pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a `label: value` line with aligned values.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{:<16}{value}", format!("{label}:"));
}

pub fn format_bbox(bbox: Option<&BoundingBox>) -> String {
    match bbox {
        Some(b) => format!("{:.4} {:.4} {:.4} {:.4}", b.south, b.north, b.west, b.east),
        None => "(none)".to_string(),
    }
}

pub fn format_optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "(none)".to_string(), |v| v.to_string())
}

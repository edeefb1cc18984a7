use crate::cli::OutputFormat;
use crate::config::LoadedConfig;
use crate::error::CliResult;
use crate::output;
use s57_chart::ChartPackage;
use std::path::Path;

pub fn run(dir: &Path, format: OutputFormat, config: &LoadedConfig) -> CliResult<()> {
    let package = ChartPackage::open(dir, config.package.clone(), config.lookups()?)?;

    if format == OutputFormat::Json {
        return output::print_json(&package.catalog());
    }

    let suffix = &config.package.base_suffix;
    let mut entries = output::table(&["ID", "File", "Impl", "Coverage (S N W E)", "Base cell"]);
    for entry in package.catalog() {
        let base = entry.bbox.is_some() && entry.has_suffix(suffix);
        entries.add_row(vec![
            entry.id.to_string(),
            entry.file.clone(),
            entry.implementation.to_string(),
            output::format_bbox(entry.bbox.as_ref()),
            if base { "yes" } else { "" }.to_string(),
        ]);
    }
    println!("{entries}");
    output::field("Entries", package.catalog().len());
    output::field("Indexed", package.tile_tree().len());
    Ok(())
}

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::output;
use s57_chart::{
    parse_file, BuildStats, DatasetParameters, DatasetStructure, FeatureClass, LookupTables,
    ResolveStats,
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct InfoReport<'a> {
    file: String,
    vectors: usize,
    features: usize,
    catalog_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a DatasetParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    structure: Option<&'a DatasetStructure>,
    feature_classes: Vec<FeatureClass>,
    stats: &'a BuildStats,
    pointers: &'a ResolveStats,
}

pub fn run(file: &Path, format: OutputFormat, lookups: &LookupTables) -> CliResult<()> {
    let chart = parse_file(file, lookups)?;
    let report = InfoReport {
        file: file.display().to_string(),
        vectors: chart.vectors().len(),
        features: chart.features().len(),
        catalog_entries: chart.catalog().len(),
        parameters: chart.parameters(),
        structure: chart.structure(),
        feature_classes: chart.feature_classes(),
        stats: chart.stats(),
        pointers: chart.resolve_stats(),
    };

    if format == OutputFormat::Json {
        return output::print_json(&report);
    }

    output::field("File", &report.file);
    output::field("Vectors", report.vectors);
    output::field("Features", report.features);
    if report.catalog_entries > 0 {
        output::field("Catalog", report.catalog_entries);
    }
    output::field(
        "Scale",
        output::format_optional(chart.compilation_scale().map(|s| format!("1:{s}"))),
    );
    if let Some(p) = report.parameters {
        output::field("COMF/SOMF", format!("{}/{}", p.coordinate_factor, p.sounding_factor));
    }
    output::field("Skipped", report.stats.records_skipped);
    output::field(
        "Unresolved",
        format!("{} pointer(s)", report.pointers.unresolved),
    );

    if !report.feature_classes.is_empty() {
        let mut classes = output::table(&["Code", "Object class"]);
        for class in &report.feature_classes {
            classes.add_row(vec![class.code.to_string(), class.name.clone()]);
        }
        println!("{classes}");
    }
    Ok(())
}

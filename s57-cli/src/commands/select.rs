use crate::cli::OutputFormat;
use crate::config::LoadedConfig;
use crate::error::{CliError, CliResult};
use crate::output;
use s57_chart::{BoundingBox, CatalogEntry, ChartPackage, FeatureId};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SelectedFeature {
    id: FeatureId,
    cell: u32,
    object_class: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    object_class_name: Option<String>,
    primitive: s57_chart::codes::GeometricPrimitive,
    #[serde(skip_serializing_if = "Option::is_none")]
    bbox: Option<BoundingBox>,
}

#[derive(Serialize)]
struct SelectReport<'a> {
    region: BoundingBox,
    cells: &'a [CatalogEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    compilation_scale: Option<u32>,
    loaded_features: usize,
    features: Vec<SelectedFeature>,
}

pub fn run(
    dir: &Path,
    region: BoundingBox,
    format: OutputFormat,
    config: &LoadedConfig,
) -> CliResult<()> {
    if region.south > region.north || region.west > region.east {
        return Err(CliError::Usage(format!(
            "empty region: south {} north {} west {} east {}",
            region.south, region.north, region.west, region.east
        )));
    }

    let mut package = ChartPackage::open(dir, config.package.clone(), config.lookups()?)?;
    package.select_region(&region)?;

    let features = package
        .features_intersecting(&region)
        .into_iter()
        .map(|f| SelectedFeature {
            id: f.feature.id(),
            cell: f.cell,
            object_class: f.feature.object_class,
            object_class_name: f.feature.object_class_name.clone(),
            primitive: f.feature.primitive,
            bbox: f.bbox,
        })
        .collect();
    let report = SelectReport {
        region,
        cells: package.loaded_cells(),
        compilation_scale: package.compilation_scale(),
        loaded_features: package.current_features().len(),
        features,
    };

    if format == OutputFormat::Json {
        return output::print_json(&report);
    }

    let mut cells = output::table(&["ID", "Cell", "Coverage (S N W E)"]);
    for (i, cell) in report.cells.iter().enumerate() {
        let name = if i == 0 {
            format!("{} (base)", cell.file_name())
        } else {
            cell.file_name().to_string()
        };
        cells.add_row(vec![cell.id.to_string(), name, output::format_bbox(cell.bbox.as_ref())]);
    }
    println!("{cells}");
    output::field(
        "Scale",
        output::format_optional(report.compilation_scale.map(|s| format!("1:{s}"))),
    );
    output::field("Loaded", report.loaded_features);
    output::field("In region", report.features.len());

    if !report.features.is_empty() {
        let mut features = output::table(&["Feature", "Class", "Primitive", "Cell"]);
        for f in &report.features {
            let class = match &f.object_class_name {
                Some(name) => format!("{name} ({})", f.object_class),
                None => f.object_class.to_string(),
            };
            features.add_row(vec![
                f.id.to_string(),
                class,
                format!("{:?}", f.primitive),
                f.cell.to_string(),
            ]);
        }
        println!("{features}");
    }
    Ok(())
}

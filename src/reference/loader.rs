use log::info;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use super::{CodeMapping, ReferenceData, RegionReference};
use crate::common::{format_elapsed, PipelineError};
use crate::normalize::normalize_opt;

const CODE_COLUMNS: [&str; 3] = ["state_code", "state_name", "country_name"];

#[derive(Debug, Deserialize)]
struct CodeRow {
    #[serde(default)]
    state_code: Option<String>,
    #[serde(default)]
    state_name: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
}

/// Province-area entry; `name` and `admin` are the area table's own field names
#[derive(Debug, Deserialize)]
struct AreaRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    admin: Option<String>,
    #[serde(default)]
    area_km2: Option<f64>,
}

/// Load the state-code CSV (`state_code,state_name,country_name`, extra columns ignored)
pub fn load_code_table(path: &Path) -> Result<Vec<CodeMapping>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::reference(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::reference(path, e))?
        .clone();
    for column in CODE_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(PipelineError::reference(
                path,
                format!("missing column '{}'", column),
            ));
        }
    }

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<CodeRow>().enumerate() {
        let row = result
            .map_err(|e| PipelineError::reference(path, format!("row {}: {}", line + 2, e)))?;
        rows.push(CodeMapping {
            state_code: normalize_opt(row.state_code.as_deref()),
            state_name: normalize_opt(row.state_name.as_deref()),
            country_name: normalize_opt(row.country_name.as_deref()),
        });
    }

    Ok(rows)
}

/// Load the province-area JSON array (`name`, `admin`, `area_km2`)
pub fn load_area_table(path: &Path) -> Result<Vec<RegionReference>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::reference(path, e))?;
    let rows: Vec<AreaRow> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PipelineError::reference(path, e))?;

    Ok(rows
        .into_iter()
        .map(|row| RegionReference {
            state_name: normalize_opt(row.name.as_deref()),
            country_name: normalize_opt(row.admin.as_deref()),
            area_km2: row.area_km2,
        })
        .collect())
}

/// Load and index both reference tables. Failure here is fatal for the run.
pub fn load_reference_data(codes_path: &Path, areas_path: &Path) -> Result<ReferenceData, PipelineError> {
    info!("Loading reference data");
    info!("  State codes: {}", codes_path.display());
    info!("  Region areas: {}", areas_path.display());
    let start = Instant::now();

    let codes = load_code_table(codes_path)?;
    let regions = load_area_table(areas_path)?;
    let data = ReferenceData::new(codes, regions);

    info!(
        "Loaded {} state codes and {} regions ({} names shared across countries) in {}",
        data.code_mappings().len(),
        data.regions().len(),
        data.duplicate_state_names().len(),
        format_elapsed(start.elapsed())
    );

    Ok(data)
}

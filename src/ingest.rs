//! Reading per-year paper files produced by the bibliographic search step.

use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::common::{PaperRecord, PipelineError, StateField};
use crate::normalize::normalize_opt;

/// A paper as written by the search step. Every field may be absent or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPaperRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub paper_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub paper_author: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub citied_by: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cover_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub affiliation_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub affiliation_city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub affiliation_state: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub affiliation_country: Option<String>,
}

/// Accept strings, numbers and booleans as text; anything else is absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Citation counts arrive as numbers, numeric strings or "NA"
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

impl From<RawPaperRecord> for PaperRecord {
    fn from(raw: RawPaperRecord) -> Self {
        PaperRecord {
            title: raw.paper_title.unwrap_or_default(),
            author: raw.paper_author.unwrap_or_default(),
            citation_count: raw.citied_by,
            cover_date: raw.cover_date,
            affiliation_name: normalize_opt(raw.affiliation_name.as_deref()),
            affiliation_city: normalize_opt(raw.affiliation_city.as_deref()),
            affiliation_state: StateField::from_raw(raw.affiliation_state.as_deref()),
            affiliation_country: normalize_opt(raw.affiliation_country.as_deref()),
        }
    }
}

/// Parse a JSON array of raw papers into normalized records
pub fn parse_paper_records(json: &str) -> serde_json::Result<Vec<PaperRecord>> {
    let raw: Vec<RawPaperRecord> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(PaperRecord::from).collect())
}

/// Load one year's paper file. Any failure is scoped to that year.
pub fn load_paper_records(path: &Path, year: i32) -> Result<Vec<PaperRecord>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::year_input(year, path, e))?;
    let raw: Vec<RawPaperRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PipelineError::year_input(year, path, e))?;

    debug!("Read {} records from {}", raw.len(), path.display());

    Ok(raw.into_iter().map(PaperRecord::from).collect())
}

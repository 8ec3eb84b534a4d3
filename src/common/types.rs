use serde::Serialize;
use std::path::PathBuf;

use crate::normalize::normalize;

/// Literal value the affiliation lookup writes when it has no state
pub const STATE_SENTINEL: &str = "NA";

/// The `affiliation_state` field, with the "NA" sentinel lifted into a real variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateField {
    /// Sentinel (any case), null or absent
    Missing,
    /// Normalized state code or free-text state name
    Given(String),
}

impl StateField {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => StateField::Missing,
            Some(value) if value.eq_ignore_ascii_case(STATE_SENTINEL) => StateField::Missing,
            Some(value) => StateField::Given(normalize(value)),
        }
    }

    pub fn as_given(&self) -> Option<&str> {
        match self {
            StateField::Given(value) => Some(value),
            StateField::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, StateField::Missing)
    }

    /// Text written to output tables; the sentinel is restored for missing states
    pub fn as_output(&self) -> &str {
        match self {
            StateField::Given(value) => value,
            StateField::Missing => STATE_SENTINEL,
        }
    }
}

/// One paper with its first affiliation, normalized at ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct PaperRecord {
    pub title: String,
    pub author: String,
    pub citation_count: Option<f64>, // None when the source value is not numeric
    pub cover_date: Option<String>,  // YYYY-MM-DD
    pub affiliation_name: String,
    pub affiliation_city: String,
    pub affiliation_state: StateField,
    pub affiliation_country: String,
}

/// Statistics from processing one year
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct YearStats {
    pub year: i32,
    pub input: PathBuf,
    pub total_ingested: usize,
    pub resolved_by_code: usize,
    pub resolved_by_name: usize,
    pub resolved_by_city: usize,
    pub unresolved: usize,
    pub disambiguated: usize,
    pub region_rows: usize,
}

impl YearStats {
    pub fn resolved(&self) -> usize {
        self.resolved_by_code + self.resolved_by_name + self.resolved_by_city
    }
}

/// Outcome of one year within a pipeline run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum YearOutcome {
    Ok(YearStats),
    Failed { year: i32, message: String },
}

impl YearOutcome {
    pub fn year(&self) -> i32 {
        match self {
            YearOutcome::Ok(stats) => stats.year,
            YearOutcome::Failed { year, .. } => *year,
        }
    }
}

/// Statistics from a multi-year pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub keyword: String,
    pub duplicate_state_names: usize,
    pub years: Vec<YearOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.years
            .iter()
            .filter(|y| matches!(y, YearOutcome::Ok(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.years.len() - self.succeeded()
    }
}

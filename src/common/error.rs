use std::path::PathBuf;
use thiserror::Error;

/// Failures the pipeline distinguishes by scope.
///
/// Records that match no region are not errors; they travel through the
/// pipeline with empty region fields.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reference tables are missing or malformed. Aborts the whole run.
    #[error("reference data {path} unusable: {reason}")]
    Reference { path: PathBuf, reason: String },

    /// One year's record file is missing or malformed. Only that year is skipped.
    #[error("year {year}: input {path} unusable: {reason}")]
    YearInput {
        year: i32,
        path: PathBuf,
        reason: String,
    },
}

impl PipelineError {
    pub fn reference(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Reference {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn year_input(year: i32, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::YearInput {
            year,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error should stop every remaining year
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }
}

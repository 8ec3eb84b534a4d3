use std::path::{Path, PathBuf};

/// Output files produced for one year of a pipeline run
#[derive(Debug, Clone)]
pub struct YearOutputPaths {
    /// Every resolved record, unresolved rows included
    pub state_paper: PathBuf,
    /// Citation sums per institution and region
    pub institution_citation: PathBuf,
    /// One density row per region
    pub state_crdi: PathBuf,
}

impl YearOutputPaths {
    /// Lay out a year's outputs under `output_dir`:
    /// `paper/{prefix}_{year}_state_paper.csv`,
    /// `institutions/{prefix}_{year}_institution_citation.csv`,
    /// `state_crdi/{prefix}_{year}_state_crdi.csv`
    pub fn for_year<P: AsRef<Path>>(output_dir: P, prefix: &str, year: i32) -> Self {
        let base = output_dir.as_ref();

        let make_path = |subdir: &str, suffix: &str| -> PathBuf {
            base.join(subdir).join(format!("{}_{}_{}.csv", prefix, year, suffix))
        };

        Self {
            state_paper: make_path("paper", "state_paper"),
            institution_citation: make_path("institutions", "institution_citation"),
            state_crdi: make_path("state_crdi", "state_crdi"),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.state_paper, &self.institution_citation, &self.state_crdi]
    }
}

/// Per-year input file: `{input_dir}/{prefix}_{year}_paper.json`
pub fn year_input_path<P: AsRef<Path>>(input_dir: P, prefix: &str, year: i32) -> PathBuf {
    input_dir
        .as_ref()
        .join(format!("{}_{}_paper.json", prefix, year))
}

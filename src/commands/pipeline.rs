use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::cli::PipelineArgs;
use crate::commands::process_year;
use crate::common::output::year_input_path;
use crate::common::{
    create_count_progress_bar, format_elapsed, keyword_prefix, setup_logging, RunSummary,
    YearOutcome, YearOutputPaths,
};
use crate::reference::{load_reference_data, ReferenceData};

/// Settings for a multi-year run, independent of how they were collected
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub keyword: String,
    pub years: Vec<i32>,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub threads: usize,
}

impl PipelineConfig {
    pub fn from_args(args: &PipelineArgs) -> Result<Self> {
        if args.start_year > args.end_year {
            bail!(
                "Start year {} is after end year {}",
                args.start_year,
                args.end_year
            );
        }

        Ok(Self {
            keyword: args.keyword.clone(),
            years: (args.start_year..=args.end_year).collect(),
            input_dir: PathBuf::from(&args.input_dir),
            output_dir: PathBuf::from(&args.output_dir),
            threads: args.threads,
        })
    }

    pub fn prefix(&self) -> String {
        keyword_prefix(&self.keyword)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_run_summary.json", self.prefix()))
    }
}

/// Remove whatever a failed year managed to write
fn discard_year_outputs(outputs: &YearOutputPaths) {
    for path in outputs.all() {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                warn!("Could not remove partial output {}: {}", path.display(), e);
            }
        }
    }
}

fn run_year(refs: Arc<ReferenceData>, config: &PipelineConfig, year: i32) -> YearOutcome {
    let prefix = config.prefix();
    let input = year_input_path(&config.input_dir, &prefix, year);
    let outputs = YearOutputPaths::for_year(&config.output_dir, &prefix, year);

    match process_year(&refs, &input, &outputs, year) {
        Ok(stats) => YearOutcome::Ok(stats),
        Err(e) => {
            error!("Skipping year {}: {:#}", year, e);
            discard_year_outputs(&outputs);
            YearOutcome::Failed {
                year,
                message: format!("{:#}", e),
            }
        }
    }
}

/// Process every configured year against shared reference data.
///
/// Years run in parallel and independently; a failed year is logged and
/// reported in the summary while the others carry on.
pub fn run_years(refs: Arc<ReferenceData>, config: &PipelineConfig) -> Result<RunSummary> {
    let num_threads = if config.threads == 0 {
        let cores = num_cpus::get();
        info!("Auto-detected {} CPU cores. Using {} threads.", cores, cores);
        cores
    } else {
        info!("Using specified {} threads.", config.threads);
        config.threads
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to build thread pool")?;

    let progress = create_count_progress_bar(config.years.len() as u64);

    let mut years: Vec<YearOutcome> = pool.install(|| {
        config
            .years
            .par_iter()
            .map(|&year| {
                let outcome = run_year(Arc::clone(&refs), config, year);
                progress.inc(1);
                outcome
            })
            .collect()
    });
    years.sort_by_key(YearOutcome::year);

    progress.finish_with_message("done");

    Ok(RunSummary {
        keyword: config.keyword.clone(),
        duplicate_state_names: refs.duplicate_state_names().len(),
        years,
    })
}

fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize run summary")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write run summary to {}", path.display()))?;
    Ok(())
}

/// Run the full pipeline over a year range
pub fn run_pipeline(args: PipelineArgs) -> Result<RunSummary> {
    let start_time = Instant::now();

    setup_logging(&args.log_level)?;

    let config = PipelineConfig::from_args(&args)?;

    info!("Starting regional research density pipeline");
    info!("Keyword: {} (file prefix '{}')", config.keyword, config.prefix());
    info!(
        "Years: {}..={}",
        args.start_year, args.end_year
    );
    info!("Input directory: {}", config.input_dir.display());
    info!("Output directory: {}", config.output_dir.display());

    let refs = Arc::new(
        load_reference_data(
            Path::new(&args.reference.codes),
            Path::new(&args.reference.areas),
        )
        .context("Reference data is required for every year")?,
    );

    let summary = run_years(refs, &config)?;

    let summary_path = config.summary_path();
    write_summary(&summary, &summary_path)?;

    info!("");
    info!("==================== PIPELINE COMPLETE ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    for outcome in &summary.years {
        match outcome {
            YearOutcome::Ok(stats) => info!(
                "  {}: {} papers, {} resolved, {} unresolved, {} regions",
                stats.year,
                stats.total_ingested,
                stats.resolved(),
                stats.unresolved,
                stats.region_rows
            ),
            YearOutcome::Failed { year, message } => info!("  {}: FAILED ({})", year, message),
        }
    }
    info!("Years completed: {}", summary.succeeded());
    if summary.failed() > 0 {
        info!("Years failed: {}", summary.failed());
    }
    info!("Run summary: {}", summary_path.display());
    info!("===========================================================");

    if summary.succeeded() == 0 {
        bail!("No year could be processed");
    }

    Ok(summary)
}

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mapademic")]
#[command(about = "Resolve paper affiliations to regions and compute per-region research density")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve one year of papers and write its region, institution and density tables
    Resolve(ResolveArgs),

    /// Run every year in a range: resolve -> disambiguate -> density, one year per task
    Pipeline(PipelineArgs),

    /// List state names the area table carries under more than one country
    Duplicates(DuplicatesArgs),
}

/// Locations of the static reference tables
#[derive(Args, Clone, Debug)]
pub struct ReferenceArgs {
    /// State-code CSV with columns state_code, state_name, country_name
    #[arg(long, default_value = "data/raw_data/code_country.csv")]
    pub codes: String,

    /// Province-area JSON with fields name, admin, area_km2
    #[arg(long, default_value = "data/raw_data/provinces_area.json")]
    pub areas: String,
}

#[derive(Parser, Clone)]
pub struct ResolveArgs {
    /// Paper JSON file for one year
    #[arg(short, long, required = true)]
    pub input: String,

    /// Year label written into the density table
    #[arg(short, long, required = true)]
    pub year: i32,

    /// Output CSV of every resolved paper
    #[arg(long, default_value = "state_paper.csv")]
    pub output_papers: String,

    /// Output CSV of citation sums per institution
    #[arg(long, default_value = "institution_citation.csv")]
    pub output_institutions: String,

    /// Output CSV of per-region density
    #[arg(short, long, default_value = "state_crdi.csv")]
    pub output: String,

    #[command(flatten)]
    pub reference: ReferenceArgs,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone)]
pub struct PipelineArgs {
    /// Search keyword the paper files were fetched for (spaces are dropped for file names)
    #[arg(short, long, required = true)]
    pub keyword: String,

    /// First year to process
    #[arg(long, default_value = "2020")]
    pub start_year: i32,

    /// Last year to process (inclusive)
    #[arg(long, default_value = "2024")]
    pub end_year: i32,

    /// Directory holding {keyword}_{year}_paper.json files
    #[arg(long, default_value = "data/raw_data")]
    pub input_dir: String,

    /// Directory receiving paper/, institutions/ and state_crdi/ tables
    #[arg(short, long, default_value = "data/output_data")]
    pub output_dir: String,

    #[command(flatten)]
    pub reference: ReferenceArgs,

    /// Number of years processed in parallel (0 = one per CPU core)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone)]
pub struct DuplicatesArgs {
    #[command(flatten)]
    pub reference: ReferenceArgs,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "WARN")]
    pub log_level: String,
}

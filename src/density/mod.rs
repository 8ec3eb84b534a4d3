//! Per-region research density for one year of resolved records.

pub mod writer;

pub use writer::*;

use anyhow::Result;
use lazy_static::lazy_static;
use polars::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::resolve::ResolvedRecord;

lazy_static! {
    /// Month out of a `YYYY-MM-DD` cover date
    static ref MONTH_PATTERN: Regex = Regex::new(r"-(\d{2})-").unwrap();
}

/// Aggregate row columns, in output order
pub const AGGREGATE_COLUMNS: [&str; 10] = [
    "state_name",
    "country_name",
    "year",
    "total_paper_num",
    "total_cited_num",
    "area_km2",
    "paper_num_density",
    "citation_density",
    "academic_index",
    "crdi_index",
];

/// One region's figures for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionYearAggregate {
    pub state_name: String,
    pub country_name: String,
    pub year: i32,
    pub total_paper_num: u32,
    pub total_cited_num: f64,
    pub area_km2: f64,
    pub paper_num_density: f64,
    pub citation_density: f64,
    pub academic_index: f64,
    pub crdi_index: f64,
}

pub fn parse_month(cover_date: &str) -> Option<u32> {
    MONTH_PATTERN
        .captures(cover_date)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|month| (1..=12).contains(month))
}

/// Flatten resolved records into the record-level table.
///
/// Unresolved records stay in, with null `state_name` and `area_km2`.
pub fn records_frame(records: &[ResolvedRecord]) -> Result<DataFrame> {
    let n = records.len();
    let mut state_names: Vec<Option<&str>> = Vec::with_capacity(n);
    let mut affiliation_states: Vec<&str> = Vec::with_capacity(n);
    let mut affiliation_countries: Vec<&str> = Vec::with_capacity(n);
    let mut affiliation_names: Vec<&str> = Vec::with_capacity(n);
    let mut citations: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut cover_dates: Vec<Option<&str>> = Vec::with_capacity(n);
    let mut months: Vec<Option<u32>> = Vec::with_capacity(n);
    let mut areas: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut resolutions: Vec<&str> = Vec::with_capacity(n);

    for record in records {
        let paper = &record.paper;
        state_names.push(record.state_name.as_deref());
        affiliation_states.push(paper.affiliation_state.as_output());
        affiliation_countries.push(&paper.affiliation_country);
        affiliation_names.push(&paper.affiliation_name);
        citations.push(paper.citation_count);
        cover_dates.push(paper.cover_date.as_deref());
        months.push(paper.cover_date.as_deref().and_then(parse_month));
        areas.push(record.area_km2);
        resolutions.push(record.resolution.as_str());
    }

    let df = DataFrame::new(vec![
        Column::new("state_name".into(), state_names),
        Column::new("affiliation_state".into(), affiliation_states),
        Column::new("affiliation_country".into(), affiliation_countries),
        Column::new("affiliation_name".into(), affiliation_names),
        Column::new("citied_by".into(), citations),
        Column::new("cover_date".into(), cover_dates),
        Column::new("month".into(), months),
        Column::new("area_km2".into(), areas),
        Column::new("resolution".into(), resolutions),
    ])?;

    Ok(df)
}

/// Aggregate a record-level table into one density row per (state, country).
///
/// Records without a state or an area are left out; ties on `crdi_index`
/// keep the order in which regions first appear.
pub fn compute_region_density(records: &DataFrame, year: i32) -> Result<DataFrame> {
    let log_area = (col("area_km2") + lit(1.0)).log(std::f64::consts::E);
    let paper_num = col("total_paper_num").cast(DataType::Float64);

    let density = records
        .clone()
        .lazy()
        .filter(col("state_name").is_not_null().and(col("area_km2").is_not_null()))
        .group_by_stable([col("state_name"), col("affiliation_country")])
        .agg([
            len().cast(DataType::UInt32).alias("total_paper_num"),
            col("citied_by").sum().cast(DataType::Float64).alias("total_cited_num"),
            col("area_km2").first().alias("area_km2"),
        ])
        .rename(["affiliation_country"], ["country_name"], true)
        .with_columns([
            lit(year).alias("year"),
            (paper_num.clone() / log_area.clone()).alias("paper_num_density"),
            (col("total_cited_num") / log_area).alias("citation_density"),
            (col("total_cited_num") / (paper_num + lit(1.0))).alias("academic_index"),
        ])
        .with_columns([((col("paper_num_density") + col("citation_density") + col("academic_index"))
            / lit(3.0))
        .alias("crdi_index")])
        .filter(col("state_name").neq(lit("")).and(col("country_name").neq(lit(""))))
        .unique_stable(
            Some(vec!["state_name".into(), "country_name".into()]),
            UniqueKeepStrategy::First,
        )
        .sort(
            ["crdi_index"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .select(AGGREGATE_COLUMNS.iter().map(|c| col(*c)).collect::<Vec<_>>())
        .collect()?;

    Ok(density)
}

/// Build the record table and compute the year's density rows in one step
pub fn calculate_density(records: &[ResolvedRecord], year: i32) -> Result<DataFrame> {
    let frame = records_frame(records)?;
    compute_region_density(&frame, year)
}

/// Citation sums per institution and region, largest first.
/// Records without a region are not ranked.
pub fn institution_ranking(records: &DataFrame) -> Result<DataFrame> {
    let ranking = records
        .clone()
        .lazy()
        .filter(col("state_name").is_not_null())
        .group_by_stable([
            col("affiliation_name"),
            col("state_name"),
            col("affiliation_country"),
        ])
        .agg([col("citied_by").sum().cast(DataType::Float64)])
        .sort(
            ["citied_by"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?;

    Ok(ranking)
}

/// Read a density table back into typed rows
pub fn aggregates_from_frame(df: &DataFrame) -> Result<Vec<RegionYearAggregate>> {
    let state_name = df.column("state_name")?.str()?;
    let country_name = df.column("country_name")?.str()?;
    let year = df.column("year")?.i32()?;
    let total_paper_num = df.column("total_paper_num")?.u32()?;
    let total_cited_num = df.column("total_cited_num")?.f64()?;
    let area_km2 = df.column("area_km2")?.f64()?;
    let paper_num_density = df.column("paper_num_density")?.f64()?;
    let citation_density = df.column("citation_density")?.f64()?;
    let academic_index = df.column("academic_index")?.f64()?;
    let crdi_index = df.column("crdi_index")?.f64()?;

    let rows = (0..df.height())
        .map(|i| RegionYearAggregate {
            state_name: state_name.get(i).unwrap_or("").to_string(),
            country_name: country_name.get(i).unwrap_or("").to_string(),
            year: year.get(i).unwrap_or(0),
            total_paper_num: total_paper_num.get(i).unwrap_or(0),
            total_cited_num: total_cited_num.get(i).unwrap_or(0.0),
            area_km2: area_km2.get(i).unwrap_or(f64::NAN),
            paper_num_density: paper_num_density.get(i).unwrap_or(f64::NAN),
            citation_density: citation_density.get(i).unwrap_or(f64::NAN),
            academic_index: academic_index.get(i).unwrap_or(f64::NAN),
            crdi_index: crdi_index.get(i).unwrap_or(f64::NAN),
        })
        .collect();

    Ok(rows)
}

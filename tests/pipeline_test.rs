use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::tempdir;

use mapademic::commands::pipeline::{run_years, PipelineConfig};
use mapademic::commands::process_year;
use mapademic::common::{YearOutcome, YearOutputPaths};
use mapademic::density::{aggregates_from_frame, calculate_density};
use mapademic::ingest::load_paper_records;
use mapademic::reference::load_reference_data;
use mapademic::resolve::{disambiguate, AffiliationResolver, Resolution};

/// Write code and area reference tables into `dir`
fn write_reference(dir: &Path) -> (PathBuf, PathBuf) {
    let codes = dir.join("code_country.csv");
    fs::write(
        &codes,
        "state_code,state_name,country_name\n\
         MD,Maryland,United States\n\
         CA,California,United States\n\
         SP,São Paulo,Brazil\n",
    )
    .unwrap();

    let areas = dir.join("provinces_area.json");
    fs::write(
        &areas,
        r#"[
            {"name": "Maryland", "admin": "Liberia", "area_km2": 2366.63},
            {"name": "Maryland", "admin": "United States", "area_km2": 25461.84},
            {"name": "California", "admin": "United States", "area_km2": 410000.0},
            {"name": "Ontario", "admin": "Canada", "area_km2": 1076395.0},
            {"name": "Beijing", "admin": "China", "area_km2": 16251.93},
            {"name": "", "admin": "Unknown", "area_km2": 10.0}
        ]"#,
    )
    .unwrap();

    (codes, areas)
}

/// One code match, one name match, one capital-city match, one miss
const FOUR_PAPERS: &str = r#"[
    {"paper_title": "A", "citied_by": "10", "cover_date": "2023-01-05",
     "affiliation_name": "Johns Hopkins University", "affiliation_city": "Baltimore",
     "affiliation_state": "MD", "affiliation_country": "United States"},
    {"paper_title": "B", "citied_by": "3", "cover_date": "2023-02-05",
     "affiliation_name": "University of Toronto", "affiliation_city": "Toronto",
     "affiliation_state": "Ontario", "affiliation_country": "Canada"},
    {"paper_title": "C", "citied_by": 7, "cover_date": "2023-03-05",
     "affiliation_name": "Peking University", "affiliation_city": "Beijing",
     "affiliation_state": "NA", "affiliation_country": "China"},
    {"paper_title": "D", "citied_by": "100", "cover_date": "2023-04-05",
     "affiliation_name": "University of Zabol", "affiliation_city": "Zabol",
     "affiliation_state": "NA", "affiliation_country": "Iran"}
]"#;

#[test]
fn test_four_record_fixture_end_to_end() {
    let dir = tempdir().unwrap();
    let (codes, areas) = write_reference(dir.path());
    let refs = load_reference_data(&codes, &areas).unwrap();

    let input = dir.path().join("papers.json");
    fs::write(&input, FOUR_PAPERS).unwrap();

    let papers = load_paper_records(&input, 2023).unwrap();
    assert_eq!(papers.len(), 4);

    let mut records = AffiliationResolver::new(&refs).resolve_all(papers);
    disambiguate(&mut records, &refs);

    let resolutions: Vec<Resolution> = records.iter().map(|r| r.resolution).collect();
    assert_eq!(
        resolutions,
        vec![Resolution::Code, Resolution::Name, Resolution::City, Resolution::Unresolved]
    );
    assert_eq!(records.len(), 4);

    let rows = aggregates_from_frame(&calculate_density(&records, 2023).unwrap()).unwrap();
    assert_eq!(rows.len(), 3);

    let total_cited: f64 = rows.iter().map(|r| r.total_cited_num).sum();
    assert_eq!(total_cited, 20.0);
    let total_papers: u32 = rows.iter().map(|r| r.total_paper_num).sum();
    assert_eq!(total_papers, 3);

    let maryland = rows.iter().find(|r| r.state_name == "maryland").unwrap();
    assert_eq!(maryland.country_name, "unitedstates");
    assert!((maryland.area_km2 - 25461.84).abs() < 1e-6);
}

#[test]
fn test_process_year_outputs() {
    let dir = tempdir().unwrap();
    let (codes, areas) = write_reference(dir.path());
    let refs = load_reference_data(&codes, &areas).unwrap();

    let input = dir.path().join("papers.json");
    fs::write(&input, FOUR_PAPERS).unwrap();
    let outputs = YearOutputPaths::for_year(dir.path().join("out"), "fixture", 2023);

    let stats = process_year(&refs, &input, &outputs, 2023).unwrap();
    assert_eq!(stats.total_ingested, 4);
    assert_eq!(stats.resolved(), 3);
    assert_eq!(stats.unresolved, 1);
    assert_eq!(stats.region_rows, 3);

    let crdi = fs::read_to_string(&outputs.state_crdi).unwrap();
    let mut lines = crdi.lines();
    assert_eq!(
        lines.next().unwrap(),
        "state_name;country_name;year;total_paper_num;total_cited_num;area_km2;\
         paper_num_density;citation_density;academic_index;crdi_index"
    );
    let regions: Vec<(String, String)> = lines
        .map(|line| {
            let fields: Vec<&str> = line.split(';').collect();
            assert_eq!(fields[2], "2023");
            (fields[0].to_string(), fields[1].to_string())
        })
        .collect();
    assert_eq!(regions.len(), 3);
    assert_eq!(regions.iter().collect::<HashSet<_>>().len(), 3);

    let institutions = fs::read_to_string(&outputs.institution_citation).unwrap();
    let header = institutions.lines().next().unwrap();
    assert_eq!(header, "affiliation_name;state_name;affiliation_country;citied_by");
    assert_eq!(institutions.lines().count(), 4);
    assert!(!institutions.contains("universityofzabol"));

    let papers = fs::read_to_string(&outputs.state_paper).unwrap();
    assert_eq!(papers.lines().count(), 5);
    assert!(papers.contains("universityofzabol"));
}

#[test]
fn test_run_years_skips_broken_year() {
    let dir = tempdir().unwrap();
    let (codes, areas) = write_reference(dir.path());
    let refs = Arc::new(load_reference_data(&codes, &areas).unwrap());

    let input_dir = dir.path().join("raw");
    fs::create_dir_all(&input_dir).unwrap();
    fs::write(input_dir.join("mlpolicy_2022_paper.json"), FOUR_PAPERS).unwrap();
    fs::write(input_dir.join("mlpolicy_2023_paper.json"), "not json").unwrap();
    fs::write(input_dir.join("mlpolicy_2024_paper.json"), FOUR_PAPERS).unwrap();

    let config = PipelineConfig {
        keyword: "ML Policy".to_string(),
        years: vec![2022, 2023, 2024],
        input_dir,
        output_dir: dir.path().join("out"),
        threads: 3,
    };

    let summary = run_years(refs, &config).unwrap();

    assert_eq!(summary.succeeded(), 2);
    match &summary.years[1] {
        YearOutcome::Failed { year, message } => {
            assert_eq!(*year, 2023);
            assert!(message.contains("mlpolicy_2023_paper.json"));
        }
        other => panic!("expected 2023 to fail, got {:?}", other),
    }

    let first = fs::read_to_string(
        YearOutputPaths::for_year(&config.output_dir, "mlpolicy", 2022).state_crdi,
    )
    .unwrap();
    let last = fs::read_to_string(
        YearOutputPaths::for_year(&config.output_dir, "mlpolicy", 2024).state_crdi,
    )
    .unwrap();
    // Same records, different year label only
    assert_eq!(first.replace(";2022;", ";2024;"), last);
    assert!(!YearOutputPaths::for_year(&config.output_dir, "mlpolicy", 2023)
        .state_crdi
        .exists());
}

#[test]
fn test_pipeline_help() {
    let status = Command::new("cargo")
        .args(["run", "--", "pipeline", "--help"])
        .status()
        .expect("Failed to run pipeline --help");

    assert!(status.success(), "Pipeline --help should succeed");
}

#[test]
fn test_resolve_help() {
    let status = Command::new("cargo")
        .args(["run", "--", "resolve", "--help"])
        .status()
        .expect("Failed to run resolve --help");

    assert!(status.success(), "Resolve --help should succeed");
}

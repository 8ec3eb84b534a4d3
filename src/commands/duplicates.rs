use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use crate::cli::DuplicatesArgs;
use crate::common::setup_logging;
use crate::reference::{load_reference_data, ReferenceData};

/// Shared state names with the countries each one appears under, both sorted
pub fn duplicate_report(refs: &ReferenceData) -> BTreeMap<String, Vec<String>> {
    let mut report: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for region in refs.regions() {
        if refs.is_duplicate(&region.state_name) {
            report
                .entry(region.state_name.clone())
                .or_default()
                .push(region.country_name.clone());
        }
    }

    for countries in report.values_mut() {
        countries.sort();
        countries.dedup();
    }

    report
}

/// Print every shared state name as `name: country, country`
pub fn run_duplicates(args: DuplicatesArgs) -> Result<BTreeMap<String, Vec<String>>> {
    setup_logging(&args.log_level)?;

    let refs = load_reference_data(
        Path::new(&args.reference.codes),
        Path::new(&args.reference.areas),
    )?;

    let report = duplicate_report(&refs);
    for (name, countries) in &report {
        println!("{}: {}", name, countries.join(", "));
    }

    Ok(report)
}

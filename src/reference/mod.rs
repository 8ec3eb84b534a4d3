//! Static geographic reference tables: state codes and region areas.

pub mod loader;

pub use loader::*;

use std::collections::{HashMap, HashSet};

use crate::normalize::normalize;

/// A row of the state-code table, keys normalized
#[derive(Debug, Clone, PartialEq)]
pub struct CodeMapping {
    pub state_code: String,
    pub state_name: String,
    pub country_name: String,
}

impl CodeMapping {
    pub fn new(state_code: &str, state_name: &str, country_name: &str) -> Self {
        Self {
            state_code: normalize(state_code),
            state_name: normalize(state_name),
            country_name: normalize(country_name),
        }
    }
}

/// A row of the province-area table, keys normalized
#[derive(Debug, Clone, PartialEq)]
pub struct RegionReference {
    pub state_name: String,
    pub country_name: String,
    pub area_km2: Option<f64>,
}

impl RegionReference {
    pub fn new(state_name: &str, country_name: &str, area_km2: Option<f64>) -> Self {
        Self {
            state_name: normalize(state_name),
            country_name: normalize(country_name),
            area_km2,
        }
    }
}

/// Both reference tables with their lookup indexes.
///
/// Built once per run and shared read-only between years. On repeated keys
/// the first row in file order wins. Rows with an empty key (or a code row
/// without a state name) are kept in the tables but never indexed, so blank
/// input can't match them.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    codes: Vec<CodeMapping>,
    regions: Vec<RegionReference>,
    code_index: HashMap<(String, String), usize>,
    name_index: HashMap<String, usize>,
    pair_index: HashMap<(String, String), usize>,
    duplicate_state_names: HashSet<String>,
}

impl ReferenceData {
    /// Index already-normalized rows
    pub fn new(codes: Vec<CodeMapping>, regions: Vec<RegionReference>) -> Self {
        let mut code_index = HashMap::with_capacity(codes.len());
        for (i, row) in codes.iter().enumerate() {
            if row.state_code.is_empty() || row.state_name.is_empty() {
                continue;
            }
            code_index
                .entry((row.state_code.clone(), row.country_name.clone()))
                .or_insert(i);
        }

        let mut name_index = HashMap::with_capacity(regions.len());
        let mut pair_index = HashMap::with_capacity(regions.len());
        let mut countries_by_name: HashMap<&str, HashSet<&str>> = HashMap::new();

        for (i, row) in regions.iter().enumerate() {
            if row.state_name.is_empty() {
                continue;
            }
            name_index.entry(row.state_name.clone()).or_insert(i);
            pair_index
                .entry((row.state_name.clone(), row.country_name.clone()))
                .or_insert(i);
            countries_by_name
                .entry(&row.state_name)
                .or_default()
                .insert(&row.country_name);
        }

        let duplicate_state_names = countries_by_name
            .into_iter()
            .filter(|(_, countries)| countries.len() > 1)
            .map(|(name, _)| name.to_string())
            .collect();

        Self {
            codes,
            regions,
            code_index,
            name_index,
            pair_index,
            duplicate_state_names,
        }
    }

    /// Code-table row for a normalized (state_code, country_name) pair
    pub fn lookup_code(&self, state_code: &str, country_name: &str) -> Option<&CodeMapping> {
        self.code_index
            .get(&(state_code.to_string(), country_name.to_string()))
            .map(|&i| &self.codes[i])
    }

    /// First area row carrying this state name, whatever its country
    pub fn region_by_name(&self, state_name: &str) -> Option<&RegionReference> {
        self.name_index.get(state_name).map(|&i| &self.regions[i])
    }

    /// Area row for an exact (state_name, country_name) pair
    pub fn region_by_pair(&self, state_name: &str, country_name: &str) -> Option<&RegionReference> {
        self.pair_index
            .get(&(state_name.to_string(), country_name.to_string()))
            .map(|&i| &self.regions[i])
    }

    /// Whether a state name occurs under more than one country
    pub fn is_duplicate(&self, state_name: &str) -> bool {
        self.duplicate_state_names.contains(state_name)
    }

    pub fn duplicate_state_names(&self) -> &HashSet<String> {
        &self.duplicate_state_names
    }

    pub fn code_mappings(&self) -> &[CodeMapping] {
        &self.codes
    }

    pub fn regions(&self) -> &[RegionReference] {
        &self.regions
    }
}

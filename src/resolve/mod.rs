//! Affiliation-to-region resolution.
//!
//! Each record runs through [`Strategy::PRECEDENCE`]; the first strategy that
//! produces a match decides the record's region. Records no strategy matches
//! are kept with empty region fields so totals still add up downstream.

pub mod disambiguate;
pub mod strategy;

pub use disambiguate::*;
pub use strategy::*;

use log::debug;

use crate::common::PaperRecord;
use crate::reference::ReferenceData;

/// Which path resolved a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Code,
    Name,
    City,
    Unresolved,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Code => "code",
            Resolution::Name => "name",
            Resolution::City => "city",
            Resolution::Unresolved => "unresolved",
        }
    }
}

/// Region found by a strategy. The area is provisional until duplicate names
/// have been re-checked against the record's country.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMatch {
    pub state_name: String,
    pub area_km2: Option<f64>,
}

/// A paper together with its resolved region
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    pub paper: PaperRecord,
    pub state_name: Option<String>,
    pub area_km2: Option<f64>,
    pub resolution: Resolution,
}

impl ResolvedRecord {
    pub fn is_resolved(&self) -> bool {
        self.resolution != Resolution::Unresolved
    }
}

pub struct AffiliationResolver<'a> {
    refs: &'a ReferenceData,
}

impl<'a> AffiliationResolver<'a> {
    pub fn new(refs: &'a ReferenceData) -> Self {
        Self { refs }
    }

    pub fn resolve(&self, paper: PaperRecord) -> ResolvedRecord {
        for strategy in Strategy::PRECEDENCE {
            if let Some(found) = strategy.attempt(&paper, self.refs) {
                return ResolvedRecord {
                    paper,
                    state_name: Some(found.state_name),
                    area_km2: found.area_km2,
                    resolution: strategy.resolution(),
                };
            }
        }

        debug!(
            "No region for affiliation '{}' (state {:?}, city '{}', country '{}')",
            paper.affiliation_name,
            paper.affiliation_state,
            paper.affiliation_city,
            paper.affiliation_country
        );

        ResolvedRecord {
            paper,
            state_name: None,
            area_km2: None,
            resolution: Resolution::Unresolved,
        }
    }

    /// Resolve every record, preserving input order and count
    pub fn resolve_all(&self, papers: Vec<PaperRecord>) -> Vec<ResolvedRecord> {
        papers.into_iter().map(|paper| self.resolve(paper)).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::paper;
    use super::*;
    use crate::reference::fixtures::sample_reference;

    #[test]
    fn test_code_path() {
        let refs = sample_reference();
        let r = AffiliationResolver::new(&refs).resolve(paper(Some("SP"), "Campinas", "Brazil"));
        assert_eq!(r.resolution, Resolution::Code);
        assert_eq!(r.state_name.as_deref(), Some("saopaulo"));
        assert_eq!(r.area_km2, Some(248_219.0));
    }

    #[test]
    fn test_name_fallback_path() {
        let refs = sample_reference();
        let r = AffiliationResolver::new(&refs).resolve(paper(Some("Ontario"), "Toronto", "Canada"));
        assert_eq!(r.resolution, Resolution::Name);
        assert_eq!(r.state_name.as_deref(), Some("ontario"));
        assert_eq!(r.area_km2, Some(1_076_395.0));
    }

    #[test]
    fn test_na_capital_city_path() {
        let refs = sample_reference();
        let r = AffiliationResolver::new(&refs).resolve(paper(Some("NA"), "beijing", "china"));
        assert_eq!(r.resolution, Resolution::City);
        assert_eq!(r.state_name.as_deref(), Some("beijing"));
        assert!((r.area_km2.unwrap() - 16251.93).abs() < 1e-6);
    }

    #[test]
    fn test_lowercase_sentinel_uses_city_path() {
        let refs = sample_reference();
        for sentinel in ["na", "Na"] {
            let r = AffiliationResolver::new(&refs).resolve(paper(Some(sentinel), "Beijing", "China"));
            assert_eq!(r.resolution, Resolution::City, "sentinel {:?}", sentinel);
            assert_eq!(r.state_name.as_deref(), Some("beijing"));
        }
    }

    #[test]
    fn test_blank_state_stays_unresolved() {
        let refs = sample_reference();
        let r = AffiliationResolver::new(&refs).resolve(paper(Some(""), "Beijing", "China"));
        assert_eq!(r.resolution, Resolution::Unresolved);
        assert_eq!(r.state_name, None);
    }

    #[test]
    fn test_na_unknown_city_unresolved() {
        let refs = sample_reference();
        let r = AffiliationResolver::new(&refs).resolve(paper(Some("NA"), "zabol", "iran"));
        assert_eq!(r.resolution, Resolution::Unresolved);
        assert_eq!(r.state_name, None);
        assert_eq!(r.area_km2, None);
    }

    #[test]
    fn test_given_state_never_falls_back_to_city() {
        let refs = sample_reference();
        let r = AffiliationResolver::new(&refs).resolve(paper(Some("QQ"), "Beijing", "China"));
        assert_eq!(r.resolution, Resolution::Unresolved);
    }

    #[test]
    fn test_code_hit_without_area_keeps_state() {
        let refs = sample_reference();
        // Bayern has a code row but no area row
        let r = AffiliationResolver::new(&refs).resolve(paper(Some("BY"), "Munich", "Germany"));
        assert_eq!(r.resolution, Resolution::Code);
        assert_eq!(r.state_name.as_deref(), Some("bayern"));
        assert_eq!(r.area_km2, None);
    }

    #[test]
    fn test_resolve_all_keeps_every_record() {
        let refs = sample_reference();
        let papers = vec![
            paper(Some("MD"), "Baltimore", "United States"),
            paper(Some("NA"), "Nowhere", "Atlantis"),
            paper(None, "", ""),
        ];
        let resolved = AffiliationResolver::new(&refs).resolve_all(papers);
        assert_eq!(resolved.len(), 3);
        assert!(resolved[0].is_resolved());
        assert!(!resolved[1].is_resolved());
        assert!(!resolved[2].is_resolved());
    }
}

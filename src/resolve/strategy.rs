use super::{RegionMatch, Resolution};
use crate::common::PaperRecord;
use crate::reference::ReferenceData;

/// Ways of locating a record's region, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `affiliation_state` is a code: (code, country) in the code table, then
    /// the area by state name alone
    StateCode,
    /// `affiliation_state` already holds a region name: area table by name
    StateName,
    /// No state at all: the city may itself be a top-level entry (capitals)
    CapitalCity,
}

impl Strategy {
    /// When a literal state value is both an unknown code and a known region
    /// name, the code lookup still runs first and the name path picks it up.
    pub const PRECEDENCE: [Strategy; 3] = [Strategy::StateCode, Strategy::StateName, Strategy::CapitalCity];

    pub fn resolution(self) -> Resolution {
        match self {
            Strategy::StateCode => Resolution::Code,
            Strategy::StateName => Resolution::Name,
            Strategy::CapitalCity => Resolution::City,
        }
    }

    pub fn attempt(self, paper: &PaperRecord, refs: &ReferenceData) -> Option<RegionMatch> {
        match self {
            Strategy::StateCode => {
                let code = paper.affiliation_state.as_given()?;
                let mapping = refs.lookup_code(code, &paper.affiliation_country)?;
                Some(RegionMatch {
                    state_name: mapping.state_name.clone(),
                    area_km2: refs
                        .region_by_name(&mapping.state_name)
                        .and_then(|region| region.area_km2),
                })
            }
            Strategy::StateName => {
                let name = paper.affiliation_state.as_given()?;
                refs.region_by_name(name).map(|region| RegionMatch {
                    state_name: region.state_name.clone(),
                    area_km2: region.area_km2,
                })
            }
            Strategy::CapitalCity => {
                if !paper.affiliation_state.is_missing() {
                    return None;
                }
                refs.region_by_name(&paper.affiliation_city).map(|region| RegionMatch {
                    state_name: region.state_name.clone(),
                    area_km2: region.area_km2,
                })
            }
        }
    }
}

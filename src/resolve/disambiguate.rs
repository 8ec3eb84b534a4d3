use log::debug;

use super::ResolvedRecord;
use crate::reference::ReferenceData;

/// Re-resolve the area of records whose state name exists in several countries.
///
/// The name-only join attached whichever country's area came first; here the
/// record's own country picks the right row. No (state, country) row means no
/// area. Other records are left untouched. Returns how many were re-resolved.
pub fn disambiguate(records: &mut [ResolvedRecord], refs: &ReferenceData) -> usize {
    let mut rematched = 0;

    for record in records.iter_mut() {
        let Some(state_name) = record.state_name.as_deref() else {
            continue;
        };
        if !refs.is_duplicate(state_name) {
            continue;
        }

        record.area_km2 = refs
            .region_by_pair(state_name, &record.paper.affiliation_country)
            .and_then(|region| region.area_km2);
        rematched += 1;

        if record.area_km2.is_none() {
            debug!(
                "Shared state name '{}' has no entry for country '{}'",
                state_name, record.paper.affiliation_country
            );
        }
    }

    rematched
}

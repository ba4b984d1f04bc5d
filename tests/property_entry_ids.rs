//! Property Test: Entry Identity and Addressing
//!
//! This property test verifies that:
//! - Entry ids are unique within a batch
//! - Entry ids follow `<asset>-<property>-<seconds>`
//! - Property aliases follow `/<asset>/<property>`

use proptest::prelude::*;
use std::collections::HashSet;
use wind_turbine::test_utils::generators;
use wind_turbine::{build_entries, entry_id, RandomSampler, TurbineProperty};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: No two entries in one batch share an id
    #[test]
    fn prop_entry_ids_unique(
        asset in generators::asset_name(),
        ts in generators::epoch_seconds(),
    ) {
        let entries = build_entries(&asset, ts, &RandomSampler::new());
        let ids: HashSet<_> = entries.iter().map(|e| e.entry_id.clone()).collect();
        prop_assert_eq!(ids.len(), entries.len());
    }

    /// Property: Ids and aliases are derived from asset, property and timestamp
    #[test]
    fn prop_entry_addressing(
        asset in generators::asset_name(),
        ts in generators::epoch_seconds(),
    ) {
        let entries = build_entries(&asset, ts, &RandomSampler::new());

        for (property, entry) in TurbineProperty::ALL.iter().zip(&entries) {
            prop_assert_eq!(
                &entry.entry_id,
                &format!("{}-{}-{}", asset, property.alias_suffix(), ts)
            );
            prop_assert_eq!(
                &entry.property_alias,
                &format!("/{}/{}", asset, property.alias_suffix())
            );
            prop_assert_eq!(entry.time_in_seconds, ts);
        }
    }
}

#[cfg(test)]
mod additional_tests {
    use super::*;

    #[test]
    fn test_known_location_entry() {
        let entries = build_entries("T1", 1700000000, &RandomSampler::new());

        assert_eq!(entries[1].entry_id, "T1-location-1700000000");
        assert_eq!(entries[1].property_alias, "/T1/location");
        assert_eq!(
            entry_id("T1", TurbineProperty::Location, 1700000000),
            "T1-location-1700000000"
        );
    }

    #[test]
    fn test_ids_repeat_within_same_second() {
        // Ids are deterministic, so two invocations in one second collide
        let first = build_entries("T1", 1700000000, &RandomSampler::new());
        let second = build_entries("T1", 1700000000, &RandomSampler::new());

        assert_eq!(first[0].entry_id, second[0].entry_id);
    }
}

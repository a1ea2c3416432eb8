//! Property tests for the aggregation and join invariants.

use beadmap_core::{
    Attributes, BUCKETS, Category, CoverageDistances, GeoPolygon, KeyPolicy, RegionIndex,
    TabularRecord, bucket_assign, classify, join, overlay_color, ring_radii_meters,
};
use geo::{MultiPolygon, polygon};
use proptest::prelude::*;

#[expect(
    clippy::float_arithmetic,
    reason = "fixture counties are unit squares offset along the x axis"
)]
fn county(name: &str, offset: f64) -> GeoPolygon {
    let poly = polygon![
        (x: offset, y: 0.0),
        (x: offset + 1.0, y: 0.0),
        (x: offset + 1.0, y: 1.0),
        (x: offset, y: 1.0),
    ];
    GeoPolygon::new(
        MultiPolygon(vec![poly]),
        Some(name.to_owned()),
        Attributes::new(),
    )
}

proptest! {
    #[test]
    fn every_positive_count_lands_in_exactly_one_bucket(count in 1_i64..=10_000_000) {
        let matching = BUCKETS.iter().filter(|bucket| bucket.contains(count)).count();
        prop_assert_eq!(matching, 1);
        let index = bucket_assign(count);
        prop_assert!(index.is_some_and(|i| BUCKETS.get(i).is_some_and(|b| b.contains(count))));
    }

    #[test]
    fn bucket_index_never_decreases(a in 1_i64..1_000, b in 1_i64..1_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(bucket_assign(low) <= bucket_assign(high));
    }

    #[test]
    fn non_positive_counts_are_unbucketed(count in i64::MIN..1) {
        prop_assert_eq!(bucket_assign(count), None);
    }

    #[test]
    fn classification_is_total_and_stable(name in ".{0,40}") {
        let first = classify(Some(name.as_str()));
        prop_assert_eq!(first, classify(Some(name.as_str())));
        prop_assert!(Category::ALL.contains(&first));
    }

    #[test]
    fn join_accounts_for_every_record(
        keys in proptest::collection::vec(prop_oneof![
            Just("Kent"),
            Just("Sussex"),
            Just("kent"),
            Just(" New Castle "),
            Just(""),
        ], 0..40),
        normalized in any::<bool>(),
    ) {
        let policy = if normalized { KeyPolicy::Normalized } else { KeyPolicy::Exact };
        let index = RegionIndex::build(
            &[county("Kent", 0.0), county("Sussex", 2.0), county("New Castle", 4.0)],
            policy,
        );
        let records: Vec<TabularRecord> = keys
            .iter()
            .map(|key| TabularRecord::from_pairs([("county_name", *key)]))
            .collect();
        let report = join(&records, "county_name", &index);
        prop_assert_eq!(report.omitted + report.grouped(), records.len());
    }

    #[test]
    fn overlay_colours_are_hex(name in "[A-Za-z0-9 ]{0,30}") {
        let color = overlay_color(&name);
        prop_assert!(color.is_hex());
        prop_assert_eq!(color, overlay_color(&name));
    }

    #[test]
    fn ring_radii_grow_towards_the_poles(lat in 0.0_f64..40.0, poleward in 40.5_f64..80.0) {
        let distances = CoverageDistances::default();
        let lower = ring_radii_meters(lat, distances);
        let higher = ring_radii_meters(poleward, distances);
        prop_assert!(higher.near > lower.near);
        prop_assert!(lower.far > lower.near);
    }
}

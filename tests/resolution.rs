//! Resolver behavior across the precedence chain

mod helpers;

use ads_resolver::{LookupIndex, Resolver, ResolverConfig, TargetQuery};
use helpers::{date, sample_snapshot, SnapshotBuilder};
use proptest::prelude::*;
use resolver_types::{CandidateSource, EntityLevel, ManualOverrideRow, NameHistoryRow, ResolvedId};

fn ok(id: &str) -> ResolvedId {
    ResolvedId::Ok(id.to_string())
}

#[test]
fn test_override_beats_snapshot() {
    let snapshot = sample_snapshot("2025-01-15");
    let overrides = vec![ManualOverrideRow::new(EntityLevel::Campaign, "brand", "c2")];
    let index = LookupIndex::build(&snapshot, &overrides, &[]);
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&index, &config, date("2025-01-20"));

    assert_eq!(resolver.campaign("brand", None), ok("c2"));
}

#[test]
fn test_ambiguous_override_stops_chain() {
    let snapshot = sample_snapshot("2025-01-15");
    let overrides = vec![
        ManualOverrideRow::new(EntityLevel::Campaign, "brand", "c1"),
        ManualOverrideRow::new(EntityLevel::Campaign, "brand", "c2"),
    ];
    let index = LookupIndex::build(&snapshot, &overrides, &[]);
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&index, &config, date("2025-01-20"));

    let ResolvedId::Ambiguous(candidates) = resolver.campaign("brand", None) else {
        panic!("expected ambiguous outcome");
    };
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|c| c.source == CandidateSource::Override));
}

#[test]
fn test_override_outside_window_falls_through() {
    let snapshot = sample_snapshot("2025-01-15");
    let overrides = vec![ManualOverrideRow::new(EntityLevel::Campaign, "brand", "c2")
        .valid_between(None, Some(date("2024-12-31")))];
    let index = LookupIndex::build(&snapshot, &overrides, &[]);
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&index, &config, date("2025-01-20"));

    assert_eq!(resolver.campaign("brand", None), ok("c1"));
}

#[test]
fn test_snapshot_beats_history() {
    let snapshot = sample_snapshot("2025-01-15");
    let history = vec![NameHistoryRow::open(EntityLevel::Campaign, "c9", "brand", date("2024-01-01"))];
    let index = LookupIndex::build(&snapshot, &[], &history);
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&index, &config, date("2025-01-20"));

    assert_eq!(resolver.campaign("brand", None), ok("c1"));
}

#[test]
fn test_history_resolves_old_name() {
    let snapshot = sample_snapshot("2025-01-15");
    let history = vec![
        NameHistoryRow::open(EntityLevel::Campaign, "c1", "brand 2024", date("2024-01-01"))
            .closed_at(date("2024-12-31")),
        NameHistoryRow::open(EntityLevel::Campaign, "c1", "brand", date("2025-01-01")),
    ];
    let index = LookupIndex::build(&snapshot, &[], &history);
    let config = ResolverConfig::default();

    let last_year = Resolver::new(&index, &config, date("2024-06-01"));
    assert_eq!(last_year.campaign("brand 2024", None), ok("c1"));

    let now = Resolver::new(&index, &config, date("2025-01-20"));
    assert_eq!(now.campaign("brand 2024", None), ResolvedId::Unmapped);
}

#[test]
fn test_duplicate_campaign_names_are_ambiguous() {
    let snapshot = SnapshotBuilder::new("2025-01-15")
        .campaign("c1", "brand")
        .campaign("c2", "brand")
        .build();
    let index = LookupIndex::build(&snapshot, &[], &[]);
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&index, &config, date("2025-01-20"));

    let outcome = resolver.campaign("brand", None);
    let ids: Vec<_> = outcome.candidates().iter().map(|c| c.entity_id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2"]);
}

#[test]
fn test_portfolio_disambiguates_duplicates() {
    let snapshot = SnapshotBuilder::new("2025-01-15")
        .portfolio("p1", "north")
        .portfolio("p2", "south")
        .campaign_in("c1", "brand", "p1")
        .campaign_in("c2", "brand", "p2")
        .build();
    let index = LookupIndex::build(&snapshot, &[], &[]);
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&index, &config, date("2025-01-20"));

    assert_eq!(resolver.campaign("brand", Some("south")), ok("c2"));
    assert!(matches!(resolver.campaign("brand", Some("west")), ResolvedId::Ambiguous(_)));
}

#[test]
fn test_parent_scoping() {
    let snapshot = sample_snapshot("2025-01-15");
    let index = LookupIndex::build(&snapshot, &[], &[]);
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&index, &config, date("2025-01-20"));

    assert_eq!(resolver.ad_group("c1", "exact"), ok("g1"));
    assert_eq!(resolver.ad_group("c2", "exact"), ResolvedId::Unmapped);

    let query = TargetQuery {
        expression_norm: "acme shoes",
        match_type_norm: Some("exact"),
        is_negative: false,
    };
    assert_eq!(resolver.target("g1", &query), ok("t1"));
    assert_eq!(resolver.target("g2", &query), ResolvedId::Unmapped);

    assert_eq!(resolver.ad("g1", Some("acme-001"), None), ok("a1"));
    assert_eq!(resolver.ad("g2", Some("acme-001"), None), ResolvedId::Unmapped);
}

#[test]
fn test_override_under_wrong_parent_is_unmapped() {
    let snapshot = sample_snapshot("2025-01-15");
    let overrides = vec![ManualOverrideRow::new(EntityLevel::AdGroup, "legacy", "g2")];
    let index = LookupIndex::build(&snapshot, &overrides, &[]);
    let config = ResolverConfig::default();
    let resolver = Resolver::new(&index, &config, date("2025-01-20"));

    assert_eq!(resolver.ad_group("c2", "legacy"), ok("g2"));
    assert_eq!(resolver.ad_group("c1", "legacy"), ResolvedId::Unmapped);
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("brand".to_string()),
        Just("generic shoes".to_string()),
        Just("legacy".to_string()),
        "[a-z]{1,6}",
    ]
}

proptest! {
    /// Same inputs always give the same outcome, whether or not the index is rebuilt.
    #[test]
    fn resolution_is_deterministic(
        names in prop::collection::vec(arb_name(), 1..12),
        override_ids in prop::collection::vec(prop_oneof![Just("c1"), Just("c2"), Just("c3")], 0..3),
        day in 1u32..28,
    ) {
        let snapshot = SnapshotBuilder::new("2025-01-15")
            .campaign("c1", "brand")
            .campaign("c3", "brand")
            .campaign("c2", "generic shoes")
            .build();
        let overrides: Vec<_> = override_ids
            .iter()
            .map(|id| ManualOverrideRow::new(EntityLevel::Campaign, "legacy", *id))
            .collect();
        let config = ResolverConfig::default();
        let reference = chrono::NaiveDate::from_ymd_opt(2025, 1, day).unwrap();

        let first_index = LookupIndex::build(&snapshot, &overrides, &[]);
        let second_index = LookupIndex::build(&snapshot, &overrides, &[]);
        let first = Resolver::new(&first_index, &config, reference);
        let second = Resolver::new(&second_index, &config, reference);

        for name in &names {
            let a = first.campaign(name, None);
            prop_assert_eq!(&a, &first.campaign(name, None));
            prop_assert_eq!(&a, &second.campaign(name, None));
            if let ResolvedId::Ambiguous(candidates) = &a {
                prop_assert!(candidates.len() >= 2);
                prop_assert!(candidates.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}

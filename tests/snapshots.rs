//! Snapshot selection, name history planning and snapshot diffs

mod helpers;

use ads_resolver::{diff, history, selector};
use chrono::{Days, NaiveDate};
use helpers::{date, sample_snapshot, SnapshotBuilder};
use proptest::prelude::*;
use resolver_types::{CurrentEntityName, EntityLevel, NameHistoryRow};

#[test]
fn test_selector_prefers_latest_backward() {
    let available = [date("2025-01-01"), date("2025-01-15"), date("2025-02-05")];
    assert_eq!(selector::pick(date("2025-01-20"), &available), Some(date("2025-01-15")));
}

#[test]
fn test_selector_forward_within_tolerance() {
    assert_eq!(selector::pick(date("2025-01-15"), &[date("2025-01-20")]), Some(date("2025-01-20")));
}

#[test]
fn test_selector_forward_beyond_tolerance() {
    assert_eq!(selector::pick(date("2025-01-01"), &[date("2025-01-20")]), None);
    assert_eq!(
        selector::pick_with_tolerance(date("2025-01-01"), &[date("2025-01-20")], 19),
        Some(date("2025-01-20"))
    );
}

#[test]
fn test_history_rename_example() {
    let current = [CurrentEntityName {
        level: EntityLevel::Campaign,
        entity_id: "1".into(),
        parent_id: None,
        name_norm: "new".into(),
    }];
    let open = [NameHistoryRow::open(EntityLevel::Campaign, "1", "old", date("2026-01-01"))];

    let plan = history::plan(&current, &open, date("2026-02-01"));
    assert_eq!(plan.to_close.len(), 1);
    assert_eq!(plan.to_close[0].valid_from, date("2026-01-01"));
    assert_eq!(plan.to_close[0].valid_to, date("2026-01-31"));
    assert_eq!(plan.to_insert.len(), 1);
    assert_eq!(plan.to_insert[0].valid_from, date("2026-02-01"));
    assert_eq!(plan.to_insert[0].valid_to, None);
}

#[test]
fn test_history_replay_is_stable() {
    // Applying a plan and replanning the same snapshot yields nothing new.
    let snapshot = sample_snapshot("2026-02-01");
    let first = history::plan_snapshot(&snapshot, &[]);
    assert_eq!(first.to_insert.len(), 4);
    assert!(first.to_close.is_empty());

    let second = history::plan_snapshot(&snapshot, &first.to_insert);
    assert!(second.is_empty());
}

#[test]
fn test_diff_reports_rename() {
    let old = sample_snapshot("2025-01-01");
    let new = SnapshotBuilder::new("2025-01-08")
        .portfolio("p1", "brand portfolio")
        .campaign_in("c1", "brand defense", "p1")
        .campaign("c2", "generic shoes")
        .ad_group("g1", "c1", "exact")
        .ad_group("g2", "c2", "broad")
        .target("t1", "g1", "c1", "acme shoes", "exact")
        .target("t2", "g2", "c2", "running shoes", "broad")
        .ad("a1", "g1", "c1", "acme-001", "b000000001")
        .placement("c1", "top of search", 50)
        .build();

    let d = diff::diff(&old, &new);
    assert_eq!(d.change_count(), 1);
    assert_eq!(d.campaign_renames[0].entity_id, "c1");
}

fn base_date() -> NaiveDate {
    date("2024-01-01")
}

fn arb_dates() -> impl Strategy<Value = Vec<NaiveDate>> {
    prop::collection::vec(0u64..120, 0..8).prop_map(|offsets| {
        offsets
            .into_iter()
            .filter_map(|o| base_date().checked_add_days(Days::new(o)))
            .collect()
    })
}

proptest! {
    #[test]
    fn selector_respects_tolerance(available in arb_dates(), reference in 0u64..120, tolerance in 0u32..14) {
        let reference = base_date().checked_add_days(Days::new(reference)).unwrap();
        if let Some(choice) = selector::choose(reference, &available, tolerance) {
            prop_assert!(available.contains(&choice.snapshot_date));
            if choice.snapshot_date > reference {
                prop_assert!((choice.snapshot_date - reference).num_days() <= i64::from(tolerance));
            }
        } else {
            prop_assert!(available.iter().all(|d| *d > reference));
        }

        let mut shuffled = available.clone();
        shuffled.reverse();
        prop_assert_eq!(
            selector::pick_with_tolerance(reference, &available, tolerance),
            selector::pick_with_tolerance(reference, &shuffled, tolerance)
        );
    }

    #[test]
    fn diff_of_identical_snapshots_is_empty(
        names in prop::collection::vec("[a-z ]{1,10}", 1..6),
    ) {
        let mut builder = SnapshotBuilder::new("2025-01-01");
        for (i, name) in names.iter().enumerate() {
            let campaign_id = format!("c{i}");
            let ad_group_id = format!("g{i}");
            builder = builder
                .campaign(&campaign_id, name)
                .ad_group(&ad_group_id, &campaign_id, name)
                .target(&format!("t{i}"), &ad_group_id, &campaign_id, name, "exact");
        }
        let snapshot = builder.build();
        prop_assert!(diff::diff(&snapshot, &snapshot).is_empty());
    }
}

//! Structural diff between two bulk snapshots of one account
//!
//! Entities are matched by id. Only changes are reported, each list sorted by
//! id, so `diff(s, s)` is always empty.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use resolver_types::{DiffResult, IdDelta, PlacementChange, RenameChange, Snapshot, ValueChange};

fn index_by<'a, T>(rows: &'a [T], id: impl Fn(&'a T) -> &'a str) -> BTreeMap<&'a str, &'a T> {
    rows.iter().map(|row| (id(row), row)).collect()
}

fn id_delta<T, U>(old: &BTreeMap<&str, T>, new: &BTreeMap<&str, U>) -> IdDelta {
    IdDelta {
        added: new
            .keys()
            .filter(|id| !old.contains_key(*id))
            .map(|id| id.to_string())
            .collect(),
        removed: old
            .keys()
            .filter(|id| !new.contains_key(*id))
            .map(|id| id.to_string())
            .collect(),
    }
}

fn renames<T>(
    old: &BTreeMap<&str, &T>,
    new: &BTreeMap<&str, &T>,
    name: impl Fn(&T) -> &str,
) -> Vec<RenameChange> {
    new.iter()
        .filter_map(|(id, after)| {
            let before = old.get(id)?;
            let (from, to) = (name(*before), name(*after));
            (from != to).then(|| RenameChange {
                entity_id: id.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            })
        })
        .collect()
}

/// `None` vs `None` is unchanged; any other inequality is a change.
fn value_changes<T, V: Clone + PartialEq>(
    old: &BTreeMap<&str, &T>,
    new: &BTreeMap<&str, &T>,
    value: impl Fn(&T) -> Option<&V>,
) -> Vec<ValueChange<V>> {
    new.iter()
        .filter_map(|(id, after)| {
            let before = old.get(id)?;
            let (from, to) = (value(*before), value(*after));
            (from != to).then(|| ValueChange {
                entity_id: id.to_string(),
                from: from.cloned(),
                to: to.cloned(),
            })
        })
        .collect()
}

fn placement_changes(old: &Snapshot, new: &Snapshot) -> Vec<PlacementChange> {
    fn by_key(snapshot: &Snapshot) -> BTreeMap<(&str, &str), Option<Decimal>> {
        snapshot
            .placements
            .iter()
            .map(|p| ((p.campaign_id.as_str(), p.placement_norm.as_str()), p.percentage))
            .collect()
    }

    let before = by_key(old);
    let after = by_key(new);
    let keys: BTreeSet<(&str, &str)> = before.keys().chain(after.keys()).copied().collect();

    keys.into_iter()
        .filter_map(|key| {
            let from = before.get(&key).copied().flatten();
            let to = after.get(&key).copied().flatten();
            (from != to).then(|| PlacementChange {
                campaign_id: key.0.to_string(),
                placement: key.1.to_string(),
                from,
                to,
            })
        })
        .collect()
}

/// Diff two snapshots of the same account
pub fn diff(old: &Snapshot, new: &Snapshot) -> DiffResult {
    if old.account_id != new.account_id {
        tracing::warn!(
            old_account = %old.account_id,
            new_account = %new.account_id,
            "Diffing snapshots of different accounts"
        );
    }

    let old_campaigns = index_by(&old.campaigns, |c| c.campaign_id.as_str());
    let new_campaigns = index_by(&new.campaigns, |c| c.campaign_id.as_str());
    let old_ad_groups = index_by(&old.ad_groups, |g| g.ad_group_id.as_str());
    let new_ad_groups = index_by(&new.ad_groups, |g| g.ad_group_id.as_str());
    let old_targets = index_by(&old.targets, |t| t.target_id.as_str());
    let new_targets = index_by(&new.targets, |t| t.target_id.as_str());
    let old_ads = index_by(&old.ads, |a| a.ad_id.as_str());
    let new_ads = index_by(&new.ads, |a| a.ad_id.as_str());

    let result = DiffResult {
        campaign_renames: renames(&old_campaigns, &new_campaigns, |c| c.name_norm.as_str()),
        ad_group_renames: renames(&old_ad_groups, &new_ad_groups, |g| g.name_norm.as_str()),
        budget_changes: value_changes(&old_campaigns, &new_campaigns, |c| c.daily_budget.as_ref()),
        strategy_changes: value_changes(&old_campaigns, &new_campaigns, |c| {
            c.bidding_strategy.as_ref()
        }),
        placement_changes: placement_changes(old, new),
        target_bid_changes: value_changes(&old_targets, &new_targets, |t| t.bid.as_ref()),
        target_state_changes: value_changes(&old_targets, &new_targets, |t| t.state.as_ref()),
        campaigns: id_delta(&old_campaigns, &new_campaigns),
        ad_groups: id_delta(&old_ad_groups, &new_ad_groups),
        targets: id_delta(&old_targets, &new_targets),
        ads: id_delta(&old_ads, &new_ads),
    };

    tracing::debug!(
        account_id = %new.account_id,
        from = %old.snapshot_date,
        to = %new.snapshot_date,
        changes = result.change_count(),
        "Snapshot diff computed"
    );

    result
}

//! Slowly-changing name history
//!
//! Runs once per ingested snapshot to keep the valid-time history tables
//! current. History rows are append/close only: an interval is opened when an
//! entity first appears or is renamed, and closed when it is renamed or
//! disappears.
//!
//! - `plan` handles entities present in the snapshot (insert / rename / no-op).
//! - `plan_retirements` handles open intervals whose entity is absent from the
//!   whole current batch. It is separate because only the caller knows when
//!   the batch is complete.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};

use resolver_types::{
    CurrentEntityName, EntityId, EntityLevel, HistoryClose, HistoryPlan, NameHistoryRow, Snapshot,
};

type EntityKey<'a> = (EntityLevel, &'a str);

fn close(row: &NameHistoryRow, valid_to: NaiveDate) -> HistoryClose {
    HistoryClose {
        level: row.level,
        entity_id: row.entity_id.clone(),
        name_norm: row.name_norm.clone(),
        valid_from: row.valid_from,
        valid_to,
    }
}

/// Group open rows per entity, newest interval first.
///
/// Older duplicates (at most one open interval is allowed per entity) are
/// closed the day before the newest one starts.
fn open_rows_by_entity<'a>(
    open_rows: &'a [NameHistoryRow],
    plan: &mut HistoryPlan,
) -> HashMap<EntityKey<'a>, &'a NameHistoryRow> {
    let mut grouped: HashMap<EntityKey<'a>, Vec<&'a NameHistoryRow>> = HashMap::new();
    for row in open_rows.iter().filter(|r| r.is_open()) {
        grouped
            .entry((row.level, row.entity_id.as_str()))
            .or_default()
            .push(row);
    }

    let mut latest = HashMap::with_capacity(grouped.len());
    for (key, mut rows) in grouped {
        rows.sort_by(|a, b| {
            b.valid_from
                .cmp(&a.valid_from)
                .then_with(|| a.name_norm.cmp(&b.name_norm))
        });
        let newest = rows[0];
        for extra in &rows[1..] {
            match newest.valid_from.checked_sub_days(Days::new(1)) {
                Some(valid_to) if valid_to >= extra.valid_from => {
                    tracing::warn!(
                        level = %key.0,
                        entity_id = key.1,
                        valid_from = %extra.valid_from,
                        "Closing duplicate open history interval"
                    );
                    plan.to_close.push(close(extra, valid_to));
                }
                _ => tracing::warn!(
                    level = %key.0,
                    entity_id = key.1,
                    valid_from = %extra.valid_from,
                    "Duplicate open history interval starts on the same day; left for review"
                ),
            }
        }
        latest.insert(key, newest);
    }
    latest
}

/// Plan history changes for the entities present in a snapshot.
pub fn plan(
    current: &[CurrentEntityName],
    open_rows: &[NameHistoryRow],
    snapshot_date: NaiveDate,
) -> HistoryPlan {
    let mut plan = HistoryPlan::default();
    let open = open_rows_by_entity(open_rows, &mut plan);
    let mut seen: HashSet<EntityKey<'_>> = HashSet::new();

    for entity in current {
        if !seen.insert((entity.level, entity.entity_id.as_str())) {
            continue;
        }

        let insert = NameHistoryRow {
            level: entity.level,
            entity_id: entity.entity_id.clone(),
            parent_id: entity.parent_id.clone(),
            name_norm: entity.name_norm.clone(),
            valid_from: snapshot_date,
            valid_to: None,
        };

        let Some(existing) = open.get(&(entity.level, entity.entity_id.as_str())) else {
            plan.to_insert.push(insert);
            continue;
        };

        if existing.name_norm == entity.name_norm {
            continue;
        }

        let valid_to = match snapshot_date.checked_sub_days(Days::new(1)) {
            Some(d) if d >= existing.valid_from => d,
            _ => {
                tracing::warn!(
                    level = %entity.level,
                    entity_id = %entity.entity_id,
                    snapshot_date = %snapshot_date,
                    open_since = %existing.valid_from,
                    "Snapshot is not newer than the open history interval; skipping rename"
                );
                continue;
            }
        };

        tracing::debug!(
            level = %entity.level,
            entity_id = %entity.entity_id,
            from = %existing.name_norm,
            to = %entity.name_norm,
            "Rename detected"
        );
        plan.to_close.push(close(existing, valid_to));
        plan.to_insert.push(insert);
    }

    plan
}

/// Close open intervals of entities missing from the current batch.
///
/// Closed at `snapshot_date`. Intervals opened after `snapshot_date` are left
/// alone.
pub fn plan_retirements(
    open_rows: &[NameHistoryRow],
    seen: &HashSet<(EntityLevel, EntityId)>,
    snapshot_date: NaiveDate,
) -> Vec<HistoryClose> {
    let mut closes: Vec<HistoryClose> = open_rows
        .iter()
        .filter(|row| row.is_open())
        .filter(|row| !seen.contains(&(row.level, row.entity_id.clone())))
        .filter(|row| row.valid_from <= snapshot_date)
        .map(|row| close(row, snapshot_date))
        .collect();
    closes.sort_by(|a, b| (a.level, &a.entity_id).cmp(&(b.level, &b.entity_id)));
    closes
}

/// Renames, new entities and retirements for one complete account snapshot
pub fn plan_snapshot(snapshot: &Snapshot, open_rows: &[NameHistoryRow]) -> HistoryPlan {
    let mut plan = plan(&current_names(snapshot), open_rows, snapshot.snapshot_date);
    plan.to_close.extend(plan_retirements(
        open_rows,
        &seen_ids(snapshot),
        snapshot.snapshot_date,
    ));

    tracing::info!(
        account_id = %snapshot.account_id,
        snapshot_date = %snapshot.snapshot_date,
        inserts = plan.to_insert.len(),
        closes = plan.to_close.len(),
        "Planned name history changes"
    );
    plan
}

/// Current names of every history-tracked entity in a snapshot
pub fn current_names(snapshot: &Snapshot) -> Vec<CurrentEntityName> {
    let campaigns = snapshot.campaigns.iter().map(|c| CurrentEntityName {
        level: EntityLevel::Campaign,
        entity_id: c.campaign_id.clone(),
        parent_id: None,
        name_norm: c.name_norm.clone(),
    });
    let ad_groups = snapshot.ad_groups.iter().map(|g| CurrentEntityName {
        level: EntityLevel::AdGroup,
        entity_id: g.ad_group_id.clone(),
        parent_id: Some(g.campaign_id.clone()),
        name_norm: g.name_norm.clone(),
    });
    campaigns.chain(ad_groups).collect()
}

/// `(level, id)` of every history-tracked entity in a snapshot
pub fn seen_ids(snapshot: &Snapshot) -> HashSet<(EntityLevel, EntityId)> {
    current_names(snapshot)
        .into_iter()
        .map(|n| (n.level, n.entity_id))
        .collect()
}

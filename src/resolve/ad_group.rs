//! Ad group resolution, scoped under a resolved campaign

use resolver_types::{Candidate, EntityLevel, ResolvedId};

use super::{decide, Resolver, Scope, Step};

impl Resolver<'_> {
    /// Resolve an ad group by name under `campaign_id`.
    pub fn ad_group(&self, campaign_id: &str, name_norm: &str) -> ResolvedId {
        let scope = Scope::campaign(campaign_id);

        if let Step::Decided(outcome) = self.override_step(EntityLevel::AdGroup, name_norm, Some(scope)) {
            return outcome;
        }

        let candidates = self
            .index
            .ad_groups_named(campaign_id, name_norm)
            .iter()
            .map(|id| Candidate::snapshot(id.clone()))
            .collect();
        if let Step::Decided(outcome) = decide(candidates) {
            return outcome;
        }

        if let Step::Decided(outcome) = self.history_step(EntityLevel::AdGroup, name_norm, Some(scope)) {
            return outcome;
        }

        ResolvedId::Unmapped
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use resolver_types::{AdGroupRow, ManualOverrideRow, NameHistoryRow, Snapshot};

    use super::*;
    use crate::config::ResolverConfig;
    use crate::lookup::LookupIndex;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ad_group(id: &str, campaign_id: &str, name: &str) -> AdGroupRow {
        AdGroupRow {
            ad_group_id: id.to_string(),
            campaign_id: campaign_id.to_string(),
            name_raw: name.to_string(),
            name_norm: name.to_string(),
            state: None,
            default_bid: None,
        }
    }

    fn snapshot() -> Snapshot {
        let mut s = Snapshot::new("acct", date("2025-01-15"));
        s.ad_groups = vec![ad_group("ga", "A", "x"), ad_group("gb", "B", "y")];
        s
    }

    #[test]
    fn test_scoped_match() {
        let index = LookupIndex::build(&snapshot(), &[], &[]);
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&index, &config, date("2025-01-20"));
        assert_eq!(resolver.ad_group("A", "x"), ResolvedId::Ok("ga".into()));
    }

    #[test]
    fn test_wrong_parent_never_resolves() {
        let index = LookupIndex::build(&snapshot(), &[], &[]);
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&index, &config, date("2025-01-20"));
        assert_eq!(resolver.ad_group("B", "x"), ResolvedId::Unmapped);
    }

    #[test]
    fn test_global_override_under_other_parent_is_unmapped() {
        // "x" under campaign B, override points at the ad group living under A.
        let overrides = vec![ManualOverrideRow::new(EntityLevel::AdGroup, "x", "ga")];
        let index = LookupIndex::build(&snapshot(), &overrides, &[]);
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&index, &config, date("2025-01-20"));

        assert_eq!(resolver.ad_group("B", "x"), ResolvedId::Unmapped);
        assert_eq!(resolver.ad_group("A", "x"), ResolvedId::Ok("ga".into()));
    }

    #[test]
    fn test_override_scoped_to_declared_parent() {
        let overrides = vec![ManualOverrideRow::new(EntityLevel::AdGroup, "y", "g-new").under_parent("A")];
        let index = LookupIndex::build(&snapshot(), &overrides, &[]);
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&index, &config, date("2025-01-20"));

        // Declared for campaign A only; campaign B falls through to the snapshot.
        assert_eq!(resolver.ad_group("B", "y"), ResolvedId::Ok("gb".into()));
        assert_eq!(resolver.ad_group("A", "y"), ResolvedId::Ok("g-new".into()));
    }

    #[test]
    fn test_history_scoped_by_parent() {
        let history = vec![
            NameHistoryRow::open(EntityLevel::AdGroup, "g-old-a", "legacy", date("2024-01-01")).with_parent("A"),
            NameHistoryRow::open(EntityLevel::AdGroup, "g-old-b", "legacy", date("2024-01-01")).with_parent("B"),
        ];
        let index = LookupIndex::build(&snapshot(), &[], &history);
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&index, &config, date("2025-01-20"));

        assert_eq!(resolver.ad_group("A", "legacy"), ResolvedId::Ok("g-old-a".into()));
        assert_eq!(resolver.ad_group("C", "legacy"), ResolvedId::Unmapped);
    }

    #[test]
    fn test_history_without_parent_uses_snapshot_parent() {
        let history = vec![NameHistoryRow::open(EntityLevel::AdGroup, "ga", "renamed", date("2024-01-01"))];
        let index = LookupIndex::build(&snapshot(), &[], &history);
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&index, &config, date("2025-01-20"));

        assert_eq!(resolver.ad_group("A", "renamed"), ResolvedId::Ok("ga".into()));
        assert_eq!(resolver.ad_group("B", "renamed"), ResolvedId::Unmapped);
    }

    #[test]
    fn test_parentless_history_for_unknown_entity_is_unmapped() {
        let history = vec![NameHistoryRow::open(EntityLevel::AdGroup, "g-gone", "retired", date("2024-01-01"))];
        let index = LookupIndex::build(&snapshot(), &[], &history);
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&index, &config, date("2025-01-20"));

        assert_eq!(resolver.ad_group("A", "retired"), ResolvedId::Unmapped);
        assert_eq!(resolver.ad_group("B", "retired"), ResolvedId::Unmapped);
    }
}

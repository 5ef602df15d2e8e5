//! Target (keyword / product targeting) resolution
//!
//! Targets have no history table. The structural key is the expression under
//! an ad group; match type and negativity narrow the candidates further.

use resolver_types::{Candidate, EntityLevel, ResolvedId};

use super::{decide, Resolver, Scope, Step};
use crate::lookup::TargetEntry;

/// Report-side description of a targeting clause
#[derive(Debug, Clone, Copy)]
pub struct TargetQuery<'q> {
    pub expression_norm: &'q str,
    pub match_type_norm: Option<&'q str>,
    pub is_negative: bool,
}

impl TargetQuery<'_> {
    fn accepts(&self, entry: &TargetEntry) -> bool {
        if entry.is_negative != self.is_negative {
            return false;
        }
        match (self.match_type_norm, entry.match_type_norm.as_deref()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}

impl Resolver<'_> {
    /// Resolve a target under `ad_group_id`.
    pub fn target(&self, ad_group_id: &str, query: &TargetQuery<'_>) -> ResolvedId {
        let entries = self.index.targets_in_ad_group(ad_group_id, query.expression_norm);
        self.resolve_target(Scope::ad_group(ad_group_id), entries, query)
    }

    /// Resolve a target anywhere under `campaign_id`.
    pub fn target_in_campaign(&self, campaign_id: &str, query: &TargetQuery<'_>) -> ResolvedId {
        let entries = self.index.targets_in_campaign(campaign_id, query.expression_norm);
        self.resolve_target(Scope::campaign(campaign_id), entries, query)
    }

    /// Ad-group scope first, then campaign scope when that is `Unmapped`.
    ///
    /// Used for matched-target reports, whose ad-group names are unreliable.
    /// Without a resolved ad group only the campaign scope is tried.
    pub fn target_with_fallback(
        &self,
        campaign_id: &str,
        ad_group_id: Option<&str>,
        query: &TargetQuery<'_>,
    ) -> ResolvedId {
        if let Some(ad_group_id) = ad_group_id {
            let scoped = self.target(ad_group_id, query);
            if !scoped.is_unmapped() {
                return scoped;
            }
        }
        self.target_in_campaign(campaign_id, query)
    }

    fn resolve_target(&self, scope: Scope<'_>, entries: &[TargetEntry], query: &TargetQuery<'_>) -> ResolvedId {
        if let Step::Decided(outcome) =
            self.override_step(EntityLevel::Target, query.expression_norm, Some(scope))
        {
            return outcome;
        }

        let candidates = entries
            .iter()
            .filter(|e| query.accepts(e))
            .map(|e| Candidate::snapshot(e.target_id.clone()))
            .collect();
        if let Step::Decided(outcome) = decide(candidates) {
            return outcome;
        }

        ResolvedId::Unmapped
    }
}

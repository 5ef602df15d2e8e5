//! Campaign resolution with portfolio disambiguation

use std::collections::BTreeSet;

use resolver_types::{Candidate, EntityLevel, ResolvedId};

use super::{decide, Resolver, Step};

impl Resolver<'_> {
    /// Resolve a campaign by normalized name.
    ///
    /// When the row's portfolio name maps to exactly one portfolio id, same-named
    /// campaigns outside that portfolio are dropped, unless that would drop all
    /// of them.
    pub fn campaign(&self, name_norm: &str, portfolio_name_norm: Option<&str>) -> ResolvedId {
        if let Step::Decided(outcome) = self.override_step(EntityLevel::Campaign, name_norm, None) {
            return outcome;
        }

        let entries = self.index.campaigns_named(name_norm);
        let portfolio_id = portfolio_name_norm.and_then(|p| self.unique_portfolio(p));

        let narrowed: Vec<Candidate> = match portfolio_id {
            Some(pid) => entries
                .iter()
                .filter(|e| e.portfolio_id.as_deref() == Some(pid))
                .map(|e| Candidate::snapshot(e.campaign_id.clone()))
                .collect(),
            None => Vec::new(),
        };
        let candidates = if narrowed.is_empty() {
            entries
                .iter()
                .map(|e| Candidate::snapshot(e.campaign_id.clone()))
                .collect()
        } else {
            narrowed
        };

        if let Step::Decided(outcome) = decide(candidates) {
            return outcome;
        }

        if let Step::Decided(outcome) = self.history_step(EntityLevel::Campaign, name_norm, None) {
            return outcome;
        }

        ResolvedId::Unmapped
    }

    /// The single portfolio id for a name, if there is exactly one
    fn unique_portfolio(&self, portfolio_name_norm: &str) -> Option<&str> {
        let ids: BTreeSet<&str> = self
            .index
            .portfolios_named(portfolio_name_norm)
            .iter()
            .map(String::as_str)
            .collect();
        if ids.len() == 1 {
            ids.into_iter().next()
        } else {
            None
        }
    }
}

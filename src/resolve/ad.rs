//! Product ad resolution by SKU and ASIN inside an ad group
//!
//! SKU is consulted first, then ASIN. Whether a SKU match and an ASIN match
//! pointing at different ads is an ambiguity is a policy choice
//! (`ads.sku_asin_conflict`); the default trusts the SKU.

use resolver_types::{Candidate, EntityLevel, ResolvedId};

use super::{decide, Resolver, Scope, Step};
use crate::config::SkuAsinConflict;
use crate::normalize::non_blank;

impl Resolver<'_> {
    /// Resolve an ad under `ad_group_id` by SKU and/or ASIN.
    pub fn ad(&self, ad_group_id: &str, sku_norm: Option<&str>, asin_norm: Option<&str>) -> ResolvedId {
        let scope = Scope::ad_group(ad_group_id);
        let sku_norm = non_blank(sku_norm);
        let asin_norm = non_blank(asin_norm);

        for key in [sku_norm, asin_norm].into_iter().flatten() {
            if let Step::Decided(outcome) = self.override_step(EntityLevel::Ad, key, Some(scope)) {
                return outcome;
            }
        }

        let by_sku: Vec<Candidate> = sku_norm
            .map(|sku| self.index.ads_by_sku(ad_group_id, sku))
            .unwrap_or(&[])
            .iter()
            .map(|id| Candidate::snapshot(id.clone()))
            .collect();
        let by_asin: Vec<Candidate> = asin_norm
            .map(|asin| self.index.ads_by_asin(ad_group_id, asin))
            .unwrap_or(&[])
            .iter()
            .map(|id| Candidate::snapshot(id.clone()))
            .collect();

        let step = match self.config.ads.sku_asin_conflict {
            SkuAsinConflict::PreferSku => match decide(by_sku) {
                Step::FallThrough => decide(by_asin),
                decided => decided,
            },
            SkuAsinConflict::Ambiguous => decide(by_sku.into_iter().chain(by_asin).collect()),
        };

        match step {
            Step::Decided(outcome) => outcome,
            Step::FallThrough => ResolvedId::Unmapped,
        }
    }
}

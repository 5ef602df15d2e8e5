//! Lookup index built from one snapshot plus the frozen override and
//! history tables of its account.

use std::collections::HashMap;

use chrono::NaiveDate;
use smallvec::SmallVec;

use resolver_types::{
    AccountId, EntityId, EntityLevel, ManualOverrideRow, NameHistoryRow, Snapshot,
};

use super::temporal_key;

/// parent id -> normalized name -> candidates
type ScopedIndex<T> = HashMap<EntityId, HashMap<String, SmallVec<[T; 2]>>>;

/// Campaign candidate for a normalized name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignEntry {
    pub campaign_id: EntityId,
    pub portfolio_id: Option<EntityId>,
}

/// Target candidate; match type and negativity are kept for secondary filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    pub target_id: EntityId,
    pub ad_group_id: EntityId,
    pub match_type_norm: Option<String>,
    pub is_negative: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetParents {
    pub ad_group_id: EntityId,
    pub campaign_id: EntityId,
}

/// Read-only lookup maps for one `(account, snapshot_date)`
#[derive(Debug, Clone)]
pub struct LookupIndex {
    account_id: AccountId,
    snapshot_date: NaiveDate,

    /// campaign name_norm -> campaigns (with portfolio)
    campaigns_by_name: HashMap<String, SmallVec<[CampaignEntry; 2]>>,
    /// portfolio name_norm -> portfolio ids
    portfolios_by_name: HashMap<String, SmallVec<[EntityId; 2]>>,
    /// (campaign_id, ad group name_norm) -> ad group ids
    ad_groups: ScopedIndex<EntityId>,
    /// (ad_group_id, expression_norm) -> targets
    targets_by_ad_group: ScopedIndex<TargetEntry>,
    /// (campaign_id, expression_norm) -> targets, for the campaign-scoped fallback
    targets_by_campaign: ScopedIndex<TargetEntry>,
    /// (ad_group_id, sku_norm) -> ad ids
    ads_by_sku: ScopedIndex<EntityId>,
    /// (ad_group_id, asin_norm) -> ad ids
    ads_by_asin: ScopedIndex<EntityId>,

    /// "{level}::{name_norm}" -> override rows
    overrides: HashMap<String, Vec<ManualOverrideRow>>,
    /// "{level}::{name_norm}" -> history rows
    history: HashMap<String, Vec<NameHistoryRow>>,

    ad_group_parents: HashMap<EntityId, EntityId>,
    target_parents: HashMap<EntityId, TargetParents>,
    ad_parents: HashMap<EntityId, EntityId>,
}

fn push_scoped<T>(index: &mut ScopedIndex<T>, parent: &str, name: &str, value: T) {
    index
        .entry(parent.to_string())
        .or_default()
        .entry(name.to_string())
        .or_default()
        .push(value);
}

fn get_scoped<'a, T>(index: &'a ScopedIndex<T>, parent: &str, name: &str) -> &'a [T] {
    index
        .get(parent)
        .and_then(|by_name| by_name.get(name))
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

impl LookupIndex {
    /// Build every map for one snapshot.
    ///
    /// `overrides` and `history` must already be filtered to the snapshot's
    /// account.
    pub fn build(
        snapshot: &Snapshot,
        overrides: &[ManualOverrideRow],
        history: &[NameHistoryRow],
    ) -> Self {
        let mut index = Self {
            account_id: snapshot.account_id.clone(),
            snapshot_date: snapshot.snapshot_date,
            campaigns_by_name: HashMap::new(),
            portfolios_by_name: HashMap::new(),
            ad_groups: HashMap::new(),
            targets_by_ad_group: HashMap::new(),
            targets_by_campaign: HashMap::new(),
            ads_by_sku: HashMap::new(),
            ads_by_asin: HashMap::new(),
            overrides: HashMap::new(),
            history: HashMap::new(),
            ad_group_parents: HashMap::new(),
            target_parents: HashMap::new(),
            ad_parents: HashMap::new(),
        };

        for campaign in &snapshot.campaigns {
            index
                .campaigns_by_name
                .entry(campaign.name_norm.clone())
                .or_default()
                .push(CampaignEntry {
                    campaign_id: campaign.campaign_id.clone(),
                    portfolio_id: campaign.portfolio_id.clone(),
                });
        }

        for portfolio in &snapshot.portfolios {
            index
                .portfolios_by_name
                .entry(portfolio.name_norm.clone())
                .or_default()
                .push(portfolio.portfolio_id.clone());
        }

        for ad_group in &snapshot.ad_groups {
            push_scoped(
                &mut index.ad_groups,
                &ad_group.campaign_id,
                &ad_group.name_norm,
                ad_group.ad_group_id.clone(),
            );
            index
                .ad_group_parents
                .insert(ad_group.ad_group_id.clone(), ad_group.campaign_id.clone());
        }

        for target in &snapshot.targets {
            let entry = TargetEntry {
                target_id: target.target_id.clone(),
                ad_group_id: target.ad_group_id.clone(),
                match_type_norm: target.match_type_norm.clone(),
                is_negative: target.is_negative,
            };
            push_scoped(
                &mut index.targets_by_ad_group,
                &target.ad_group_id,
                &target.expression_norm,
                entry.clone(),
            );
            push_scoped(
                &mut index.targets_by_campaign,
                &target.campaign_id,
                &target.expression_norm,
                entry,
            );
            index.target_parents.insert(
                target.target_id.clone(),
                TargetParents {
                    ad_group_id: target.ad_group_id.clone(),
                    campaign_id: target.campaign_id.clone(),
                },
            );
        }

        for ad in &snapshot.ads {
            if let Some(sku) = non_empty(ad.sku_norm.as_ref()) {
                push_scoped(&mut index.ads_by_sku, &ad.ad_group_id, sku, ad.ad_id.clone());
            }
            if let Some(asin) = non_empty(ad.asin_norm.as_ref()) {
                push_scoped(&mut index.ads_by_asin, &ad.ad_group_id, asin, ad.ad_id.clone());
            }
            index
                .ad_parents
                .insert(ad.ad_id.clone(), ad.ad_group_id.clone());
        }

        for row in overrides {
            index
                .overrides
                .entry(temporal_key(row.level, &row.name_norm))
                .or_default()
                .push(row.clone());
        }

        for row in history {
            index
                .history
                .entry(temporal_key(row.level, &row.name_norm))
                .or_default()
                .push(row.clone());
        }

        tracing::debug!(
            account_id = %index.account_id,
            snapshot_date = %index.snapshot_date,
            campaigns = snapshot.campaigns.len(),
            ad_groups = snapshot.ad_groups.len(),
            targets = snapshot.targets.len(),
            ads = snapshot.ads.len(),
            overrides = overrides.len(),
            history = history.len(),
            "Lookup index built"
        );

        index
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn snapshot_date(&self) -> NaiveDate {
        self.snapshot_date
    }

    /// Campaigns carrying a normalized name
    pub fn campaigns_named(&self, name_norm: &str) -> &[CampaignEntry] {
        self.campaigns_by_name
            .get(name_norm)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Portfolio ids carrying a normalized name
    pub fn portfolios_named(&self, name_norm: &str) -> &[EntityId] {
        self.portfolios_by_name
            .get(name_norm)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ad groups with a name under a specific campaign
    pub fn ad_groups_named(&self, campaign_id: &str, name_norm: &str) -> &[EntityId] {
        get_scoped(&self.ad_groups, campaign_id, name_norm)
    }

    /// Targets with an expression under a specific ad group
    pub fn targets_in_ad_group(&self, ad_group_id: &str, expression_norm: &str) -> &[TargetEntry] {
        get_scoped(&self.targets_by_ad_group, ad_group_id, expression_norm)
    }

    /// Targets with an expression anywhere under a campaign
    pub fn targets_in_campaign(&self, campaign_id: &str, expression_norm: &str) -> &[TargetEntry] {
        get_scoped(&self.targets_by_campaign, campaign_id, expression_norm)
    }

    pub fn ads_by_sku(&self, ad_group_id: &str, sku_norm: &str) -> &[EntityId] {
        get_scoped(&self.ads_by_sku, ad_group_id, sku_norm)
    }

    pub fn ads_by_asin(&self, ad_group_id: &str, asin_norm: &str) -> &[EntityId] {
        get_scoped(&self.ads_by_asin, ad_group_id, asin_norm)
    }

    /// Override rows for a level and name, regardless of validity date
    pub fn overrides_for(&self, level: EntityLevel, name_norm: &str) -> &[ManualOverrideRow] {
        self.overrides
            .get(&temporal_key(level, name_norm))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// History rows for a level and name, regardless of validity date
    pub fn history_for(&self, level: EntityLevel, name_norm: &str) -> &[NameHistoryRow] {
        self.history
            .get(&temporal_key(level, name_norm))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ancestor of `entity_id` at `ancestor_level`, as recorded in the snapshot.
    ///
    /// Returns `None` when the entity is not in the snapshot or the pair of
    /// levels is not a parent relation.
    pub fn ancestor_of(
        &self,
        level: EntityLevel,
        entity_id: &str,
        ancestor_level: EntityLevel,
    ) -> Option<&str> {
        match (level, ancestor_level) {
            (EntityLevel::AdGroup, EntityLevel::Campaign) => {
                self.ad_group_parents.get(entity_id).map(String::as_str)
            }
            (EntityLevel::Target, EntityLevel::AdGroup) => self
                .target_parents
                .get(entity_id)
                .map(|p| p.ad_group_id.as_str()),
            (EntityLevel::Target, EntityLevel::Campaign) => self
                .target_parents
                .get(entity_id)
                .map(|p| p.campaign_id.as_str()),
            (EntityLevel::Ad, EntityLevel::AdGroup) => {
                self.ad_parents.get(entity_id).map(String::as_str)
            }
            (EntityLevel::Ad, EntityLevel::Campaign) => self
                .ad_parents
                .get(entity_id)
                .and_then(|ad_group| self.ad_group_parents.get(ad_group))
                .map(String::as_str),
            _ => None,
        }
    }

    /// Statistics for debugging
    pub fn stats(&self) -> IndexStats {
        fn scoped_len<T>(index: &ScopedIndex<T>) -> usize {
            index.values().map(HashMap::len).sum()
        }

        IndexStats {
            account_id: self.account_id.clone(),
            snapshot_date: self.snapshot_date,
            campaign_names: self.campaigns_by_name.len(),
            duplicate_campaign_names: self
                .campaigns_by_name
                .values()
                .filter(|v| v.len() > 1)
                .count(),
            portfolio_names: self.portfolios_by_name.len(),
            ad_group_keys: scoped_len(&self.ad_groups),
            target_keys: scoped_len(&self.targets_by_ad_group),
            ad_keys: scoped_len(&self.ads_by_sku) + scoped_len(&self.ads_by_asin),
            override_keys: self.overrides.len(),
            history_keys: self.history.len(),
        }
    }
}

/// Index statistics
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub account_id: AccountId,
    pub snapshot_date: NaiveDate,
    pub campaign_names: usize,
    pub duplicate_campaign_names: usize,
    pub portfolio_names: usize,
    pub ad_group_keys: usize,
    pub target_keys: usize,
    pub ad_keys: usize,
    pub override_keys: usize,
    pub history_keys: usize,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lookup Index Statistics:")?;
        writeln!(f, "  Account: {}", self.account_id)?;
        writeln!(f, "  Snapshot date: {}", self.snapshot_date)?;
        writeln!(
            f,
            "  Campaign names: {} ({} duplicated)",
            self.campaign_names, self.duplicate_campaign_names
        )?;
        writeln!(f, "  Portfolio names: {}", self.portfolio_names)?;
        writeln!(f, "  Ad group keys: {}", self.ad_group_keys)?;
        writeln!(f, "  Target keys: {}", self.target_keys)?;
        writeln!(f, "  Ad keys: {}", self.ad_keys)?;
        writeln!(f, "  Override keys: {}", self.override_keys)?;
        writeln!(f, "  History keys: {}", self.history_keys)?;
        Ok(())
    }
}

//! Report row mapping
//!
//! Turns a batch of normalized report rows into fact rows with resolved ids,
//! resolving top-down (campaign, then ad group, then target or ad) and
//! stopping at the first level that fails. Rows that do not resolve are
//! still emitted, with a null leaf id and a synthetic key, so that metrics
//! are never dropped and re-uploads stay idempotent.

pub mod keys;

use chrono::NaiveDate;
use uuid::Uuid;

use resolver_types::{
    AccountId, EntityId, EntityLevel, FactRow, IssueType, MappingIssue, ReportKind, ReportRow,
    ResolvedId,
};

use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::issues::IssueCollector;
use crate::lookup::LookupIndex;
use crate::resolve::{Resolver, TargetQuery};

pub use keys::{natural_key, CanonicalKey};

/// Identity of the upload being mapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingContext {
    pub account_id: AccountId,
    pub upload_id: Uuid,
    pub report_kind: ReportKind,
}

/// Fact rows plus coalesced issues for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingOutput {
    pub facts: Vec<FactRow>,
    pub issues: Vec<MappingIssue>,
}

impl MappingOutput {
    pub fn resolved_count(&self) -> usize {
        self.facts.iter().filter(|f| f.is_resolved()).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.facts.len() - self.resolved_count()
    }
}

/// Ids resolved so far for one row
#[derive(Debug, Default)]
struct RowIds {
    campaign: Option<EntityId>,
    ad_group: Option<EntityId>,
    target: Option<EntityId>,
    ad: Option<EntityId>,
}

impl RowIds {
    fn leaf(&self, kind: ReportKind) -> Option<&EntityId> {
        match kind.leaf_level() {
            EntityLevel::Campaign => self.campaign.as_ref(),
            EntityLevel::AdGroup => self.ad_group.as_ref(),
            EntityLevel::Target => self.target.as_ref(),
            EntityLevel::Ad => self.ad.as_ref(),
        }
    }
}

/// Reject the batch at the first row breaking the upstream parsing contract
pub fn validate_rows(kind: ReportKind, rows: &[ReportRow]) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        if let Some(field) = row.missing_field(kind) {
            return Err(ResolverError::InvalidRow { index, field });
        }
    }
    Ok(())
}

fn row_date(index: usize, row: &ReportRow) -> Result<NaiveDate> {
    row.date
        .ok_or(ResolverError::InvalidRow { index, field: "date" })
}

fn fact_row(context: &MappingContext, row: &ReportRow, date: NaiveDate, ids: RowIds) -> FactRow {
    let resolved_id = ids.leaf(context.report_kind).cloned();
    let synthetic_key = match resolved_id {
        Some(_) => None,
        None => Some(natural_key(context.report_kind, row)),
    };

    FactRow {
        account_id: context.account_id.clone(),
        upload_id: context.upload_id,
        report_kind: context.report_kind,
        date,
        campaign_name_raw: row.campaign_name_raw.clone(),
        campaign_name_norm: row.campaign_name_norm.clone(),
        portfolio_name_norm: row.portfolio_name_norm.clone(),
        ad_group_name_norm: row.ad_group_name_norm.clone(),
        expression_norm: row.expression_norm.clone(),
        match_type_norm: row.match_type_norm.clone(),
        search_term_norm: row.search_term_norm.clone(),
        sku_norm: row.sku_norm.clone(),
        asin_norm: row.asin_norm.clone(),
        placement_norm: row.placement_norm.clone(),
        cost_type_norm: row.cost_type_norm.clone(),
        campaign_id: ids.campaign,
        ad_group_id: ids.ad_group,
        target_id: ids.target,
        ad_id: ids.ad,
        resolved_id,
        synthetic_key,
        metrics: row.metrics.clone(),
    }
}

/// Park a batch for which no snapshot qualifies.
///
/// Every row becomes an unresolved fact and the batch yields one
/// `missing_bulk_snapshot` issue counting all of its rows.
pub fn park_batch(
    context: &MappingContext,
    reference_date: NaiveDate,
    rows: &[ReportRow],
) -> Result<MappingOutput> {
    validate_rows(context.report_kind, rows)?;

    let facts = rows
        .iter()
        .enumerate()
        .map(|(index, row)| Ok(fact_row(context, row, row_date(index, row)?, RowIds::default())))
        .collect::<Result<Vec<_>>>()?;

    let mut issues = IssueCollector::new();
    if !rows.is_empty() {
        let key = CanonicalKey::new()
            .text("account_id", Some(context.account_id.as_str()))
            .text("report_kind", Some(context.report_kind.as_str()))
            .text("reference_date", Some(reference_date.to_string().as_str()))
            .to_json();
        issues.record_failure(
            EntityLevel::Campaign,
            IssueType::MissingBulkSnapshot,
            &key,
            None,
            rows.len() as u64,
        );
    }

    tracing::warn!(
        account_id = %context.account_id,
        report_kind = %context.report_kind,
        reference_date = %reference_date,
        rows = rows.len(),
        "No bulk snapshot qualifies; batch parked"
    );

    Ok(MappingOutput {
        facts,
        issues: issues.finish(),
    })
}

/// Maps report rows of one upload against one lookup index
pub struct RowMapper<'a> {
    resolver: Resolver<'a>,
    config: &'a ResolverConfig,
    context: &'a MappingContext,
}

impl<'a> RowMapper<'a> {
    pub fn new(
        index: &'a LookupIndex,
        config: &'a ResolverConfig,
        context: &'a MappingContext,
        reference_date: NaiveDate,
    ) -> Self {
        Self {
            resolver: Resolver::new(index, config, reference_date),
            config,
            context,
        }
    }

    /// Map a whole batch. Issues are coalesced across the batch, so a key
    /// that resolves on any row produces no issue.
    pub fn map_rows(&self, rows: &[ReportRow]) -> Result<MappingOutput> {
        validate_rows(self.context.report_kind, rows)?;

        let mut issues = IssueCollector::new();
        let facts = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let date = row_date(index, row)?;
                let ids = self.resolve_row(row, &mut issues);
                Ok(fact_row(self.context, row, date, ids))
            })
            .collect::<Result<Vec<_>>>()?;

        let output = MappingOutput {
            facts,
            issues: issues.finish(),
        };

        tracing::info!(
            account_id = %self.context.account_id,
            report_kind = %self.context.report_kind,
            reference_date = %self.resolver.reference_date(),
            snapshot_date = %self.resolver.index().snapshot_date(),
            rows = rows.len(),
            resolved = output.resolved_count(),
            unresolved = output.unresolved_count(),
            issues = output.issues.len(),
            "Mapped report rows"
        );

        Ok(output)
    }

    fn resolve_row(&self, row: &ReportRow, issues: &mut IssueCollector) -> RowIds {
        let mut ids = RowIds::default();

        let campaign = self
            .resolver
            .campaign(&row.campaign_name_norm, row.portfolio_name_norm.as_deref());
        issues.record(EntityLevel::Campaign, &keys::campaign_issue_key(row), &campaign);
        let ResolvedId::Ok(campaign_id) = campaign else {
            return ids;
        };
        ids.campaign = Some(campaign_id.clone());

        match self.context.report_kind {
            ReportKind::Campaign | ReportKind::Placement => {}
            ReportKind::AdGroup => {
                self.resolve_ad_group(&campaign_id, row, &mut ids, issues);
            }
            ReportKind::Targeting => {
                if let Some(ad_group_id) = self.resolve_ad_group(&campaign_id, row, &mut ids, issues) {
                    let query = target_query(row);
                    let outcome = self.resolver.target(&ad_group_id, &query);
                    let key = keys::target_issue_key(&campaign_id, Some(ad_group_id.as_str()), row);
                    issues.record(EntityLevel::Target, &key, &outcome);
                    ids.target = outcome.id().cloned();
                }
            }
            ReportKind::SearchTerm => self.resolve_matched_target(&campaign_id, row, &mut ids, issues),
            ReportKind::AdvertisedProduct => {
                if let Some(ad_group_id) = self.resolve_ad_group(&campaign_id, row, &mut ids, issues) {
                    let outcome = self.resolver.ad(
                        &ad_group_id,
                        row.sku_norm.as_deref(),
                        row.asin_norm.as_deref(),
                    );
                    issues.record(EntityLevel::Ad, &keys::ad_issue_key(&ad_group_id, row), &outcome);
                    ids.ad = outcome.id().cloned();
                }
            }
        }

        ids
    }

    fn resolve_ad_group(
        &self,
        campaign_id: &str,
        row: &ReportRow,
        ids: &mut RowIds,
        issues: &mut IssueCollector,
    ) -> Option<EntityId> {
        let name = row.ad_group_name_norm.as_deref().unwrap_or_default();
        let outcome = self.resolver.ad_group(campaign_id, name);
        issues.record(EntityLevel::AdGroup, &keys::ad_group_issue_key(campaign_id, name), &outcome);
        ids.ad_group = outcome.id().cloned();
        ids.ad_group.clone()
    }

    /// Matched-target rows: the reported ad group is a hint, not a key.
    ///
    /// An ad-group failure is only reported when the target also fails to
    /// resolve; a target found at campaign scope fills in its own ad group.
    fn resolve_matched_target(
        &self,
        campaign_id: &str,
        row: &ReportRow,
        ids: &mut RowIds,
        issues: &mut IssueCollector,
    ) {
        let query = target_query(row);
        let ad_group_name = crate::normalize::non_blank(row.ad_group_name_norm.as_deref());
        let ad_group = ad_group_name.map(|name| (name, self.resolver.ad_group(campaign_id, name)));
        let ad_group_id = ad_group.as_ref().and_then(|(_, outcome)| outcome.id().cloned());

        let outcome = match (&ad_group_id, self.config.targets.campaign_scoped_fallback) {
            (_, true) => self
                .resolver
                .target_with_fallback(campaign_id, ad_group_id.as_deref(), &query),
            (Some(ad_group_id), false) => self.resolver.target(ad_group_id, &query),
            (None, false) if ad_group_name.is_none() => self.resolver.target_in_campaign(campaign_id, &query),
            (None, false) => ResolvedId::Unmapped,
        };

        if let Some((name, ad_group_outcome)) = &ad_group {
            if ad_group_outcome.is_ok() || !outcome.is_ok() {
                let key = keys::ad_group_issue_key(campaign_id, name);
                issues.record(EntityLevel::AdGroup, &key, ad_group_outcome);
            }
        }

        // Without the fallback a failed ad group stops the chain here.
        if ad_group_name.is_some() && ad_group_id.is_none() && !self.config.targets.campaign_scoped_fallback {
            return;
        }

        let key = keys::target_issue_key(campaign_id, ad_group_id.as_deref(), row);
        issues.record(EntityLevel::Target, &key, &outcome);

        // The target's own ad group wins over the reported one.
        if let ResolvedId::Ok(target_id) = outcome {
            ids.ad_group = self
                .resolver
                .index()
                .ancestor_of(EntityLevel::Target, &target_id, EntityLevel::AdGroup)
                .map(str::to_string)
                .or(ad_group_id);
            ids.target = Some(target_id);
        } else {
            ids.ad_group = ad_group_id;
        }
    }
}

fn target_query(row: &ReportRow) -> TargetQuery<'_> {
    TargetQuery {
        expression_norm: row.expression_norm.as_deref().unwrap_or_default(),
        match_type_norm: crate::normalize::non_blank(row.match_type_norm.as_deref()),
        is_negative: row.is_negative,
    }
}

//! Resolver Types - Level 1 Foundation Types
//!
//! Plain data structures shared between the resolution core and the
//! persistence layer that feeds it and stores its output.
//!
//! ## Architecture Level: LEVEL 1 (Foundation)
//!
//! Nothing in this crate depends on another workspace crate. The resolver,
//! the bulk/report parsers and the storage layer all depend on it.
//!
//! ## Contents
//!
//! - Entity levels and candidate provenance
//! - Bulk snapshot rows (campaigns, ad groups, targets, ads, placements, portfolios)
//! - Temporal reference rows (name history, manual overrides)
//! - Resolution outcomes (`ResolvedId`) and coalesced `MappingIssue`s
//! - Typed report rows and the fact rows produced from them
//! - Snapshot diff results and history-plan instructions
//!
//! ## Rules
//!
//! 1. **NO RESOLUTION LOGIC** - constructors, accessors and interval checks only
//! 2. **SERIALIZABLE** - every type round-trips through serde
//! 3. **THREAD SAFE** - every type is Send + Sync

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vendor-assigned entity identifier (opaque numeric string)
pub type EntityId = String;

/// Advertising account identifier
pub type AccountId = String;

// ============================================================================
// ENTITY LEVELS
// ============================================================================

/// The level of the advertising hierarchy an id or name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLevel {
    Campaign,
    AdGroup,
    Target,
    Ad,
}

impl EntityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLevel::Campaign => "campaign",
            EntityLevel::AdGroup => "ad_group",
            EntityLevel::Target => "target",
            EntityLevel::Ad => "ad",
        }
    }

    /// The level directly above this one, if any
    pub fn parent(&self) -> Option<EntityLevel> {
        match self {
            EntityLevel::Campaign => None,
            EntityLevel::AdGroup => Some(EntityLevel::Campaign),
            EntityLevel::Target | EntityLevel::Ad => Some(EntityLevel::AdGroup),
        }
    }

    /// Whether a name-history table exists for this level
    pub fn has_history(&self) -> bool {
        matches!(self, EntityLevel::Campaign | EntityLevel::AdGroup)
    }

    pub fn all() -> [EntityLevel; 4] {
        [
            EntityLevel::Campaign,
            EntityLevel::AdGroup,
            EntityLevel::Target,
            EntityLevel::Ad,
        ]
    }
}

impl fmt::Display for EntityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an enum from its wire string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for EntityLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "campaign" => Ok(EntityLevel::Campaign),
            "ad_group" => Ok(EntityLevel::AdGroup),
            "target" => Ok(EntityLevel::Target),
            "ad" => Ok(EntityLevel::Ad),
            other => Err(ParseEnumError {
                kind: "entity level",
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// BULK SNAPSHOT
// ============================================================================

/// Campaign identity and tracked attributes from a bulk snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRow {
    pub campaign_id: EntityId,
    pub portfolio_id: Option<EntityId>,
    pub name_raw: String,
    pub name_norm: String,
    pub state: Option<String>,
    pub daily_budget: Option<Decimal>,
    pub bidding_strategy: Option<String>,
}

/// Ad group identity row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdGroupRow {
    pub ad_group_id: EntityId,
    pub campaign_id: EntityId,
    pub name_raw: String,
    pub name_norm: String,
    pub state: Option<String>,
    pub default_bid: Option<Decimal>,
}

/// Keyword or product-targeting clause, possibly negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRow {
    pub target_id: EntityId,
    pub ad_group_id: EntityId,
    pub campaign_id: EntityId,
    pub expression_raw: String,
    pub expression_norm: String,
    pub match_type_norm: Option<String>,
    #[serde(default)]
    pub is_negative: bool,
    pub state: Option<String>,
    pub bid: Option<Decimal>,
}

/// Product ad, identified inside its ad group by SKU and/or ASIN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdRow {
    pub ad_id: EntityId,
    pub ad_group_id: EntityId,
    pub campaign_id: EntityId,
    pub sku_norm: Option<String>,
    pub asin_norm: Option<String>,
    pub state: Option<String>,
}

/// Placement bid modifier for a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRow {
    pub campaign_id: EntityId,
    pub placement_norm: String,
    pub percentage: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRow {
    pub portfolio_id: EntityId,
    pub name_raw: String,
    pub name_norm: String,
}

/// Dated, immutable capture of one account's advertising structure.
///
/// Keyed by `(account_id, snapshot_date)`. Produced wholesale from one bulk
/// export and never partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub account_id: AccountId,
    pub snapshot_date: NaiveDate,
    #[serde(default)]
    pub campaigns: Vec<CampaignRow>,
    #[serde(default)]
    pub ad_groups: Vec<AdGroupRow>,
    #[serde(default)]
    pub targets: Vec<TargetRow>,
    #[serde(default)]
    pub ads: Vec<AdRow>,
    #[serde(default)]
    pub placements: Vec<PlacementRow>,
    #[serde(default)]
    pub portfolios: Vec<PortfolioRow>,
}

impl Snapshot {
    /// Create an empty snapshot for an account and date
    pub fn new(account_id: impl Into<AccountId>, snapshot_date: NaiveDate) -> Self {
        Self {
            account_id: account_id.into(),
            snapshot_date,
            campaigns: Vec::new(),
            ad_groups: Vec::new(),
            targets: Vec::new(),
            ads: Vec::new(),
            placements: Vec::new(),
            portfolios: Vec::new(),
        }
    }

    /// Total number of entity rows across all levels
    pub fn row_count(&self) -> usize {
        self.campaigns.len()
            + self.ad_groups.len()
            + self.targets.len()
            + self.ads.len()
            + self.placements.len()
            + self.portfolios.len()
    }
}

// ============================================================================
// TEMPORAL REFERENCE ROWS
// ============================================================================

/// Returns true when `date` falls in the inclusive interval; `None` bounds are unbounded
fn interval_covers(from: Option<NaiveDate>, to: Option<NaiveDate>, date: NaiveDate) -> bool {
    from.map_or(true, |f| f <= date) && to.map_or(true, |t| date <= t)
}

/// Valid-time interval during which an entity carried a normalized name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameHistoryRow {
    pub level: EntityLevel,
    pub entity_id: EntityId,
    /// Parent id (campaign for ad groups) when known
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    pub name_norm: String,
    /// Inclusive
    pub valid_from: NaiveDate,
    /// Inclusive; `None` while the interval is open
    pub valid_to: Option<NaiveDate>,
}

impl NameHistoryRow {
    /// Open interval starting at `valid_from`
    pub fn open(
        level: EntityLevel,
        entity_id: impl Into<EntityId>,
        name_norm: impl Into<String>,
        valid_from: NaiveDate,
    ) -> Self {
        Self {
            level,
            entity_id: entity_id.into(),
            parent_id: None,
            name_norm: name_norm.into(),
            valid_from,
            valid_to: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<EntityId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn closed_at(mut self, valid_to: NaiveDate) -> Self {
        self.valid_to = Some(valid_to);
        self
    }

    pub fn is_open(&self) -> bool {
        self.valid_to.is_none()
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        interval_covers(Some(self.valid_from), self.valid_to, date)
    }
}

/// Externally curated name -> id correction, scoped by entity level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverrideRow {
    pub level: EntityLevel,
    pub entity_id: EntityId,
    /// When set, the override only applies under this parent
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    pub name_norm: String,
    /// `None` means unbounded past
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    /// `None` means unbounded future
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
}

impl ManualOverrideRow {
    /// Override valid for all time
    pub fn new(
        level: EntityLevel,
        name_norm: impl Into<String>,
        entity_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            level,
            entity_id: entity_id.into(),
            parent_id: None,
            name_norm: name_norm.into(),
            valid_from: None,
            valid_to: None,
        }
    }

    pub fn valid_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.valid_from = from;
        self.valid_to = to;
        self
    }

    pub fn under_parent(mut self, parent_id: impl Into<EntityId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        interval_covers(self.valid_from, self.valid_to, date)
    }
}

/// Name of an entity as seen in the snapshot currently being ingested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentEntityName {
    pub level: EntityLevel,
    pub entity_id: EntityId,
    pub parent_id: Option<EntityId>,
    pub name_norm: String,
}

/// Instruction to close an open history interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryClose {
    pub level: EntityLevel,
    pub entity_id: EntityId,
    pub name_norm: String,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
}

/// Insert/close instructions produced for one ingested snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPlan {
    pub to_insert: Vec<NameHistoryRow>,
    pub to_close: Vec<HistoryClose>,
}

impl HistoryPlan {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_close.is_empty()
    }
}

// ============================================================================
// RESOLUTION OUTCOMES
// ============================================================================

/// Where a resolution candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Override,
    Snapshot,
    History,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateSource::Override => "override",
            CandidateSource::Snapshot => "snapshot",
            CandidateSource::History => "history",
        }
    }
}

/// A candidate id kept for diagnosis of ambiguous resolutions
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub entity_id: EntityId,
    pub source: CandidateSource,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub valid_to: Option<NaiveDate>,
}

impl Candidate {
    /// Candidate found in the bulk snapshot (no validity window)
    pub fn snapshot(entity_id: impl Into<EntityId>) -> Self {
        Self {
            entity_id: entity_id.into(),
            source: CandidateSource::Snapshot,
            valid_from: None,
            valid_to: None,
        }
    }

    /// Candidate found in a dated table (override or history)
    pub fn dated(
        entity_id: impl Into<EntityId>,
        source: CandidateSource,
        valid_from: Option<NaiveDate>,
        valid_to: Option<NaiveDate>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            source,
            valid_from,
            valid_to,
        }
    }
}

/// Outcome of resolving one name at one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ResolvedId {
    /// Exactly one distinct id
    Ok(EntityId),
    /// Two or more distinct ids; never silently narrowed
    Ambiguous(Vec<Candidate>),
    /// No candidate at all
    Unmapped,
}

impl ResolvedId {
    pub fn id(&self) -> Option<&EntityId> {
        match self {
            ResolvedId::Ok(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResolvedId::Ok(_))
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, ResolvedId::Unmapped)
    }

    /// Candidates carried by an ambiguous outcome (empty otherwise)
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            ResolvedId::Ambiguous(candidates) => candidates,
            _ => &[],
        }
    }

    /// The issue type this outcome maps to, `None` for `Ok`
    pub fn issue_type(&self) -> Option<IssueType> {
        match self {
            ResolvedId::Ok(_) => None,
            ResolvedId::Ambiguous(_) => Some(IssueType::Ambiguous),
            ResolvedId::Unmapped => Some(IssueType::Unmapped),
        }
    }
}

// ============================================================================
// MAPPING ISSUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Unmapped,
    Ambiguous,
    MissingBulkSnapshot,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Unmapped => "unmapped",
            IssueType::Ambiguous => "ambiguous",
            IssueType::MissingBulkSnapshot => "missing_bulk_snapshot",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coalesced record of rows that need a human.
///
/// One issue stands for every raw row sharing
/// `(entity_level, issue_type, key_json)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingIssue {
    pub entity_level: EntityLevel,
    pub issue_type: IssueType,
    pub key_json: String,
    pub candidates_json: Option<String>,
    pub row_count: u64,
}

// ============================================================================
// REPORT ROWS AND FACTS
// ============================================================================

/// Report families the mapper knows how to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Campaign,
    Placement,
    AdGroup,
    Targeting,
    /// Matched-target report; ad-group names are unreliable
    SearchTerm,
    AdvertisedProduct,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Campaign => "campaign",
            ReportKind::Placement => "placement",
            ReportKind::AdGroup => "ad_group",
            ReportKind::Targeting => "targeting",
            ReportKind::SearchTerm => "search_term",
            ReportKind::AdvertisedProduct => "advertised_product",
        }
    }

    /// Deepest level a row of this report resolves to
    pub fn leaf_level(&self) -> EntityLevel {
        match self {
            ReportKind::Campaign | ReportKind::Placement => EntityLevel::Campaign,
            ReportKind::AdGroup => EntityLevel::AdGroup,
            ReportKind::Targeting | ReportKind::SearchTerm => EntityLevel::Target,
            ReportKind::AdvertisedProduct => EntityLevel::Ad,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "campaign" => Ok(ReportKind::Campaign),
            "placement" => Ok(ReportKind::Placement),
            "ad_group" => Ok(ReportKind::AdGroup),
            "targeting" => Ok(ReportKind::Targeting),
            "search_term" => Ok(ReportKind::SearchTerm),
            "advertised_product" => Ok(ReportKind::AdvertisedProduct),
            other => Err(ParseEnumError {
                kind: "report kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Performance metrics carried through from a report row unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub impressions: u64,
    pub clicks: u64,
    pub spend: Decimal,
    pub sales: Decimal,
    pub orders: u64,
    pub units: u64,
}

/// Report row after upstream column mapping and normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub date: Option<NaiveDate>,
    pub campaign_name_raw: String,
    pub campaign_name_norm: String,
    #[serde(default)]
    pub portfolio_name_norm: Option<String>,
    #[serde(default)]
    pub ad_group_name_raw: Option<String>,
    #[serde(default)]
    pub ad_group_name_norm: Option<String>,
    #[serde(default)]
    pub expression_raw: Option<String>,
    #[serde(default)]
    pub expression_norm: Option<String>,
    #[serde(default)]
    pub match_type_norm: Option<String>,
    #[serde(default)]
    pub is_negative: bool,
    #[serde(default)]
    pub search_term_norm: Option<String>,
    #[serde(default)]
    pub sku_norm: Option<String>,
    #[serde(default)]
    pub asin_norm: Option<String>,
    #[serde(default)]
    pub placement_norm: Option<String>,
    #[serde(default)]
    pub cost_type_norm: Option<String>,
    #[serde(default)]
    pub metrics: Metrics,
}

fn blank(value: Option<&String>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

impl ReportRow {
    /// First required field that is missing for a report of `kind`.
    ///
    /// Upstream parsing guarantees these; a row failing this check is a
    /// contract violation, not an unresolvable row.
    pub fn missing_field(&self, kind: ReportKind) -> Option<&'static str> {
        if self.date.is_none() {
            return Some("date");
        }
        if self.campaign_name_norm.trim().is_empty() {
            return Some("campaign_name_norm");
        }
        match kind {
            ReportKind::Campaign | ReportKind::SearchTerm => {}
            ReportKind::Placement => {
                if blank(self.placement_norm.as_ref()) {
                    return Some("placement_norm");
                }
            }
            ReportKind::AdGroup | ReportKind::Targeting | ReportKind::AdvertisedProduct => {
                if blank(self.ad_group_name_norm.as_ref()) {
                    return Some("ad_group_name_norm");
                }
            }
        }
        match kind {
            ReportKind::Targeting | ReportKind::SearchTerm if blank(self.expression_norm.as_ref()) => {
                Some("expression_norm")
            }
            ReportKind::AdvertisedProduct
                if blank(self.sku_norm.as_ref()) && blank(self.asin_norm.as_ref()) =>
            {
                Some("sku_norm")
            }
            _ => None,
        }
    }
}

/// Deterministic fallback identity for a row whose id could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SyntheticKey {
    /// Canonical JSON of the full normalized natural key
    pub json: String,
    /// Hex blake3 digest of `json`
    pub digest: String,
}

/// Upsert identity of a fact row
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactUpsertKey {
    pub account_id: AccountId,
    pub upload_id: Uuid,
    pub date: NaiveDate,
    /// Resolved leaf id, or `synthetic:<digest>` when unresolved
    pub entity_key: String,
    /// Natural-key field finer than the leaf id: the placement of a
    /// placement row, the search term of a search-term row
    pub detail: Option<String>,
    pub cost_type: Option<String>,
}

/// Report row enriched with resolved ids, ready for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRow {
    pub account_id: AccountId,
    pub upload_id: Uuid,
    pub report_kind: ReportKind,
    pub date: NaiveDate,

    pub campaign_name_raw: String,
    pub campaign_name_norm: String,
    pub portfolio_name_norm: Option<String>,
    pub ad_group_name_norm: Option<String>,
    pub expression_norm: Option<String>,
    pub match_type_norm: Option<String>,
    pub search_term_norm: Option<String>,
    pub sku_norm: Option<String>,
    pub asin_norm: Option<String>,
    pub placement_norm: Option<String>,
    pub cost_type_norm: Option<String>,

    pub campaign_id: Option<EntityId>,
    pub ad_group_id: Option<EntityId>,
    pub target_id: Option<EntityId>,
    pub ad_id: Option<EntityId>,

    /// Id at the report's leaf level; `None` when the row is parked
    pub resolved_id: Option<EntityId>,
    /// Present exactly when `resolved_id` is `None`
    pub synthetic_key: Option<SyntheticKey>,

    pub metrics: Metrics,
}

impl FactRow {
    pub fn is_resolved(&self) -> bool {
        self.resolved_id.is_some()
    }

    /// Key the persistence layer upserts on
    pub fn upsert_key(&self) -> FactUpsertKey {
        let entity_key = match (&self.resolved_id, &self.synthetic_key) {
            (Some(id), _) => id.clone(),
            (None, Some(key)) => format!("synthetic:{}", key.digest),
            (None, None) => String::from("synthetic:"),
        };
        let detail = match self.report_kind {
            ReportKind::Placement => self.placement_norm.clone(),
            ReportKind::SearchTerm => self.search_term_norm.clone(),
            _ => None,
        };
        FactUpsertKey {
            account_id: self.account_id.clone(),
            upload_id: self.upload_id,
            date: self.date,
            entity_key,
            detail,
            cost_type: self.cost_type_norm.clone(),
        }
    }
}

// ============================================================================
// SNAPSHOT DIFF
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameChange {
    pub entity_id: EntityId,
    pub from: String,
    pub to: String,
}

/// Attribute change where either side may be absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChange<T> {
    pub entity_id: EntityId,
    pub from: Option<T>,
    pub to: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementChange {
    pub campaign_id: EntityId,
    pub placement: String,
    pub from: Option<Decimal>,
    pub to: Option<Decimal>,
}

/// Symmetric id-set difference for one entity type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdDelta {
    pub added: Vec<EntityId>,
    pub removed: Vec<EntityId>,
}

impl IdDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Change-only comparison of two snapshots of one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub campaign_renames: Vec<RenameChange>,
    pub ad_group_renames: Vec<RenameChange>,
    pub budget_changes: Vec<ValueChange<Decimal>>,
    pub strategy_changes: Vec<ValueChange<String>>,
    pub placement_changes: Vec<PlacementChange>,
    pub target_bid_changes: Vec<ValueChange<Decimal>>,
    pub target_state_changes: Vec<ValueChange<String>>,
    pub campaigns: IdDelta,
    pub ad_groups: IdDelta,
    pub targets: IdDelta,
    pub ads: IdDelta,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }

    /// Number of individual change entries across every field
    pub fn change_count(&self) -> usize {
        let deltas = [&self.campaigns, &self.ad_groups, &self.targets, &self.ads]
            .iter()
            .map(|d| d.added.len() + d.removed.len())
            .sum::<usize>();
        self.campaign_renames.len()
            + self.ad_group_renames.len()
            + self.budget_changes.len()
            + self.strategy_changes.len()
            + self.placement_changes.len()
            + self.target_bid_changes.len()
            + self.target_state_changes.len()
            + deltas
    }
}

//! Canonical keys for issues and synthetic fact identities
//!
//! Keys are JSON objects with sorted field names, every field present and
//! nulls explicit, so the same row always produces the same bytes. The
//! synthetic key digest is a hex blake3 hash of that JSON.

use std::collections::BTreeMap;

use serde_json::Value;

use resolver_types::{ReportKind, ReportRow, SyntheticKey};

use crate::normalize::non_blank;

/// Builder for a canonical JSON object
#[derive(Debug, Clone, Default)]
pub struct CanonicalKey {
    fields: BTreeMap<&'static str, Value>,
}

impl CanonicalKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field; `None` and blank values become `null`
    pub fn text(mut self, field: &'static str, value: Option<&str>) -> Self {
        let value = non_blank(value).map_or(Value::Null, |v| Value::String(v.to_string()));
        self.fields.insert(field, value);
        self
    }

    pub fn flag(mut self, field: &'static str, value: bool) -> Self {
        self.fields.insert(field, Value::Bool(value));
        self
    }

    pub fn to_json(&self) -> String {
        let object: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Value::Object(object).to_string()
    }

    pub fn into_synthetic(self) -> SyntheticKey {
        let json = self.to_json();
        let digest = digest(&json);
        SyntheticKey { json, digest }
    }
}

/// Hex blake3 digest of a canonical key
pub fn digest(json: &str) -> String {
    blake3::hash(json.as_bytes()).to_hex().to_string()
}

/// Synthetic identity of a row: every normalized field except the date,
/// which the fact upsert key already carries.
pub fn natural_key(kind: ReportKind, row: &ReportRow) -> SyntheticKey {
    CanonicalKey::new()
        .text("report_kind", Some(kind.as_str()))
        .text("campaign", Some(row.campaign_name_norm.as_str()))
        .text("portfolio", row.portfolio_name_norm.as_deref())
        .text("ad_group", row.ad_group_name_norm.as_deref())
        .text("expression", row.expression_norm.as_deref())
        .text("match_type", row.match_type_norm.as_deref())
        .flag("is_negative", row.is_negative)
        .text("search_term", row.search_term_norm.as_deref())
        .text("sku", row.sku_norm.as_deref())
        .text("asin", row.asin_norm.as_deref())
        .text("placement", row.placement_norm.as_deref())
        .text("cost_type", row.cost_type_norm.as_deref())
        .into_synthetic()
}

pub(crate) fn campaign_issue_key(row: &ReportRow) -> String {
    CanonicalKey::new()
        .text("campaign", Some(row.campaign_name_norm.as_str()))
        .text("portfolio", row.portfolio_name_norm.as_deref())
        .to_json()
}

pub(crate) fn ad_group_issue_key(campaign_id: &str, ad_group_name_norm: &str) -> String {
    CanonicalKey::new()
        .text("campaign_id", Some(campaign_id))
        .text("ad_group", Some(ad_group_name_norm))
        .to_json()
}

pub(crate) fn target_issue_key(campaign_id: &str, ad_group_id: Option<&str>, row: &ReportRow) -> String {
    CanonicalKey::new()
        .text("campaign_id", Some(campaign_id))
        .text("ad_group_id", ad_group_id)
        .text("expression", row.expression_norm.as_deref())
        .text("match_type", row.match_type_norm.as_deref())
        .flag("is_negative", row.is_negative)
        .to_json()
}

pub(crate) fn ad_issue_key(ad_group_id: &str, row: &ReportRow) -> String {
    CanonicalKey::new()
        .text("ad_group_id", Some(ad_group_id))
        .text("sku", row.sku_norm.as_deref())
        .text("asin", row.asin_norm.as_deref())
        .to_json()
}

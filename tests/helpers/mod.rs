//! Shared fixtures for the integration tests
//!
//! Each test binary pulls in the subset it needs.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;

use resolver_types::{
    AdGroupRow, AdRow, CampaignRow, PlacementRow, PortfolioRow, ReportRow, Snapshot, TargetRow,
};

pub const ACCOUNT: &str = "acct-1";

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

/// Builder for small snapshots; names are used as both raw and normalized
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new(snapshot_date: &str) -> Self {
        Self {
            snapshot: Snapshot::new(ACCOUNT, date(snapshot_date)),
        }
    }

    pub fn portfolio(mut self, id: &str, name: &str) -> Self {
        self.snapshot.portfolios.push(PortfolioRow {
            portfolio_id: id.into(),
            name_raw: name.into(),
            name_norm: name.into(),
        });
        self
    }

    pub fn campaign(mut self, id: &str, name: &str) -> Self {
        self.snapshot.campaigns.push(CampaignRow {
            campaign_id: id.into(),
            portfolio_id: None,
            name_raw: name.into(),
            name_norm: name.into(),
            state: Some("enabled".into()),
            daily_budget: Some(Decimal::from(25)),
            bidding_strategy: Some("dynamic bids - down only".into()),
        });
        self
    }

    pub fn campaign_in(mut self, id: &str, name: &str, portfolio_id: &str) -> Self {
        self = self.campaign(id, name);
        if let Some(c) = self.snapshot.campaigns.last_mut() {
            c.portfolio_id = Some(portfolio_id.into());
        }
        self
    }

    pub fn ad_group(mut self, id: &str, campaign_id: &str, name: &str) -> Self {
        self.snapshot.ad_groups.push(AdGroupRow {
            ad_group_id: id.into(),
            campaign_id: campaign_id.into(),
            name_raw: name.into(),
            name_norm: name.into(),
            state: Some("enabled".into()),
            default_bid: Some(Decimal::new(75, 2)),
        });
        self
    }

    pub fn target(mut self, id: &str, ad_group_id: &str, campaign_id: &str, expression: &str, match_type: &str) -> Self {
        self.snapshot.targets.push(TargetRow {
            target_id: id.into(),
            ad_group_id: ad_group_id.into(),
            campaign_id: campaign_id.into(),
            expression_raw: expression.into(),
            expression_norm: expression.into(),
            match_type_norm: Some(match_type.into()),
            is_negative: false,
            state: Some("enabled".into()),
            bid: Some(Decimal::new(110, 2)),
        });
        self
    }

    pub fn ad(mut self, id: &str, ad_group_id: &str, campaign_id: &str, sku: &str, asin: &str) -> Self {
        self.snapshot.ads.push(AdRow {
            ad_id: id.into(),
            ad_group_id: ad_group_id.into(),
            campaign_id: campaign_id.into(),
            sku_norm: Some(sku.into()),
            asin_norm: Some(asin.into()),
            state: Some("enabled".into()),
        });
        self
    }

    pub fn placement(mut self, campaign_id: &str, placement: &str, percentage: i64) -> Self {
        self.snapshot.placements.push(PlacementRow {
            campaign_id: campaign_id.into(),
            placement_norm: placement.into(),
            percentage: Some(Decimal::from(percentage)),
        });
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

/// A small account: two campaigns sharing no names, one keyword tree, one product tree
pub fn sample_snapshot(snapshot_date: &str) -> Snapshot {
    SnapshotBuilder::new(snapshot_date)
        .portfolio("p1", "brand portfolio")
        .campaign_in("c1", "brand", "p1")
        .campaign("c2", "generic shoes")
        .ad_group("g1", "c1", "exact")
        .ad_group("g2", "c2", "broad")
        .target("t1", "g1", "c1", "acme shoes", "exact")
        .target("t2", "g2", "c2", "running shoes", "broad")
        .ad("a1", "g1", "c1", "acme-001", "b000000001")
        .placement("c1", "top of search", 50)
        .build()
}

pub fn campaign_row(on: &str, campaign: &str) -> ReportRow {
    ReportRow {
        date: Some(date(on)),
        campaign_name_raw: campaign.into(),
        campaign_name_norm: campaign.into(),
        ..ReportRow::default()
    }
}

pub fn ad_group_row(on: &str, campaign: &str, ad_group: &str) -> ReportRow {
    ReportRow {
        ad_group_name_raw: Some(ad_group.into()),
        ad_group_name_norm: Some(ad_group.into()),
        ..campaign_row(on, campaign)
    }
}

pub fn target_row(on: &str, campaign: &str, ad_group: &str, expression: &str, match_type: &str) -> ReportRow {
    ReportRow {
        expression_raw: Some(expression.into()),
        expression_norm: Some(expression.into()),
        match_type_norm: Some(match_type.into()),
        ..ad_group_row(on, campaign, ad_group)
    }
}

pub fn product_row(on: &str, campaign: &str, ad_group: &str, sku: &str) -> ReportRow {
    ReportRow {
        sku_norm: Some(sku.into()),
        ..ad_group_row(on, campaign, ad_group)
    }
}

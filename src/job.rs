//! Mapping job orchestration
//!
//! One job maps one upload: pick the bulk snapshot nearest the report's
//! reference date, load it with the frozen override and history tables,
//! build a lookup index and map every row. Persistence stays behind
//! [`ReferenceStore`]; the job itself performs no I/O.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use resolver_types::{AccountId, ManualOverrideRow, NameHistoryRow, ReportKind, ReportRow, Snapshot};

use crate::config::ResolverConfig;
use crate::error::Result;
use crate::lookup::LookupIndex;
use crate::mapping::{park_batch, MappingContext, MappingOutput, RowMapper};
use crate::selector::{self, SnapshotChoice};

/// Read access to reference data for one account.
///
/// Implemented by the persistence layer. Override and history tables are
/// read once per job and must not change while it runs.
pub trait ReferenceStore {
    /// Dates of every stored bulk snapshot for the account
    fn snapshot_dates(&self, account_id: &str) -> anyhow::Result<Vec<NaiveDate>>;

    fn load_snapshot(&self, account_id: &str, snapshot_date: NaiveDate) -> anyhow::Result<Snapshot>;

    fn overrides(&self, account_id: &str) -> anyhow::Result<Vec<ManualOverrideRow>>;

    fn name_history(&self, account_id: &str) -> anyhow::Result<Vec<NameHistoryRow>>;
}

/// Reference store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceStore {
    snapshots: BTreeMap<(AccountId, NaiveDate), Snapshot>,
    overrides: BTreeMap<AccountId, Vec<ManualOverrideRow>>,
    history: BTreeMap<AccountId, Vec<NameHistoryRow>>,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.insert_snapshot(snapshot);
        self
    }

    pub fn with_overrides(mut self, account_id: &str, rows: Vec<ManualOverrideRow>) -> Self {
        self.overrides.entry(account_id.to_string()).or_default().extend(rows);
        self
    }

    pub fn with_history(mut self, account_id: &str, rows: Vec<NameHistoryRow>) -> Self {
        self.history.entry(account_id.to_string()).or_default().extend(rows);
        self
    }

    /// Store a snapshot, replacing any earlier one for the same account and date
    pub fn insert_snapshot(&mut self, snapshot: Snapshot) {
        let key = (snapshot.account_id.clone(), snapshot.snapshot_date);
        self.snapshots.insert(key, snapshot);
    }
}

impl ReferenceStore for InMemoryReferenceStore {
    fn snapshot_dates(&self, account_id: &str) -> anyhow::Result<Vec<NaiveDate>> {
        Ok(self
            .snapshots
            .keys()
            .filter(|(account, _)| account == account_id)
            .map(|(_, date)| *date)
            .collect())
    }

    fn load_snapshot(&self, account_id: &str, snapshot_date: NaiveDate) -> anyhow::Result<Snapshot> {
        match self.snapshots.get(&(account_id.to_string(), snapshot_date)) {
            Some(snapshot) => Ok(snapshot.clone()),
            None => anyhow::bail!("No snapshot for account {} on {}", account_id, snapshot_date),
        }
    }

    fn overrides(&self, account_id: &str) -> anyhow::Result<Vec<ManualOverrideRow>> {
        Ok(self.overrides.get(account_id).cloned().unwrap_or_default())
    }

    fn name_history(&self, account_id: &str) -> anyhow::Result<Vec<NameHistoryRow>> {
        Ok(self.history.get(account_id).cloned().unwrap_or_default())
    }
}

/// One upload to map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingJob {
    pub account_id: AccountId,
    pub upload_id: Uuid,
    pub report_kind: ReportKind,
    /// Report-level reference date; every validity check uses it
    pub reference_date: NaiveDate,
}

/// What a job produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    /// `None` when no snapshot qualified and the batch was parked
    pub snapshot: Option<SnapshotChoice>,
    pub output: MappingOutput,
}

impl MappingJob {
    fn context(&self) -> MappingContext {
        MappingContext {
            account_id: self.account_id.clone(),
            upload_id: self.upload_id,
            report_kind: self.report_kind,
        }
    }

    pub fn run(
        &self,
        store: &dyn ReferenceStore,
        config: &ResolverConfig,
        rows: &[ReportRow],
    ) -> Result<JobOutcome> {
        config.validate()?;
        let context = self.context();

        let dates = store.snapshot_dates(&self.account_id)?;
        let Some(choice) = selector::choose(
            self.reference_date,
            &dates,
            config.selection.forward_tolerance_days,
        ) else {
            let output = park_batch(&context, self.reference_date, rows)?;
            return Ok(JobOutcome {
                snapshot: None,
                output,
            });
        };

        tracing::info!(
            account_id = %self.account_id,
            upload_id = %self.upload_id,
            reference_date = %self.reference_date,
            snapshot_date = %choice.snapshot_date,
            direction = ?choice.direction,
            gap_days = choice.gap_days,
            "Selected bulk snapshot"
        );

        let snapshot = store.load_snapshot(&self.account_id, choice.snapshot_date)?;
        let overrides = store.overrides(&self.account_id)?;
        let history = store.name_history(&self.account_id)?;

        let index = LookupIndex::build(&snapshot, &overrides, &history);
        let mapper = RowMapper::new(&index, config, &context, self.reference_date);
        let output = mapper.map_rows(rows)?;

        Ok(JobOutcome {
            snapshot: Some(choice),
            output,
        })
    }
}

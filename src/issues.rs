//! Issue coalescing
//!
//! Failed resolutions are buffered per `(level, issue_type, key_json)` and
//! only turned into `MappingIssue`s once the whole batch has been mapped. A
//! single successful resolution of a key anywhere in the batch suppresses
//! every issue recorded for that key.

use std::collections::{BTreeMap, HashSet};

use resolver_types::{EntityLevel, IssueType, MappingIssue, ResolvedId};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct IssueKey {
    level: EntityLevel,
    issue_type: IssueType,
    key_json: String,
}

#[derive(Debug, Clone)]
struct PendingIssue {
    candidates_json: Option<String>,
    row_count: u64,
}

/// Batch-scoped issue buffer
#[derive(Debug, Default)]
pub struct IssueCollector {
    pending: BTreeMap<IssueKey, PendingIssue>,
    resolved: HashSet<(EntityLevel, String)>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolver outcome for one row
    pub fn record(&mut self, level: EntityLevel, key_json: &str, outcome: &ResolvedId) {
        match outcome {
            ResolvedId::Ok(_) => self.record_success(level, key_json),
            ResolvedId::Ambiguous(candidates) => {
                let candidates_json = serde_json::to_string(candidates).ok();
                self.record_failure(level, IssueType::Ambiguous, key_json, candidates_json, 1);
            }
            ResolvedId::Unmapped => {
                self.record_failure(level, IssueType::Unmapped, key_json, None, 1)
            }
        }
    }

    /// Mark a key as resolved for the whole batch
    pub fn record_success(&mut self, level: EntityLevel, key_json: &str) {
        self.resolved.insert((level, key_json.to_string()));
    }

    /// Count `rows` failures for a key; the first candidate list seen is kept
    pub fn record_failure(
        &mut self,
        level: EntityLevel,
        issue_type: IssueType,
        key_json: &str,
        candidates_json: Option<String>,
        rows: u64,
    ) {
        let key = IssueKey {
            level,
            issue_type,
            key_json: key_json.to_string(),
        };
        let pending = self.pending.entry(key).or_insert(PendingIssue {
            candidates_json: None,
            row_count: 0,
        });
        if pending.candidates_json.is_none() {
            pending.candidates_json = candidates_json;
        }
        pending.row_count += rows;
    }

    /// Number of buffered (not yet filtered) issue keys
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Emit issues for keys that never resolved, in a stable order
    pub fn finish(self) -> Vec<MappingIssue> {
        let resolved = self.resolved;
        self.pending
            .into_iter()
            .filter(|(key, _)| !resolved.contains(&(key.level, key.key_json.clone())))
            .map(|(key, pending)| MappingIssue {
                entity_level: key.level,
                issue_type: key.issue_type,
                key_json: key.key_json,
                candidates_json: pending.candidates_json,
                row_count: pending.row_count,
            })
            .collect()
    }
}

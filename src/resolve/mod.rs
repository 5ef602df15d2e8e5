//! Entity resolvers
//!
//! Every level runs the same precedence chain against a `LookupIndex`:
//!
//! ```text
//! 1. Override  "{level}::{name}" rows valid on the reference date
//!              any match stops the chain (Ok / Ambiguous / Unmapped on parent mismatch)
//! 2. Snapshot  structural key in the index, optional secondary filter
//! 3. History   campaign and ad group only, rows valid on the reference date
//! 4. Unmapped
//! ```
//!
//! Each step either decides the outcome or falls through. One distinct id is
//! `Ok`; two or more is `Ambiguous` with the full candidate list. Nothing is
//! ever picked arbitrarily.
//!
//! Below the campaign level every lookup is parent-scoped: a name found under
//! the wrong parent never resolves.

mod ad;
mod ad_group;
mod campaign;
mod target;

pub use target::TargetQuery;

use std::collections::BTreeSet;

use chrono::NaiveDate;

use resolver_types::{Candidate, CandidateSource, EntityLevel, ResolvedId};

use crate::config::ResolverConfig;
use crate::lookup::LookupIndex;

/// Result of one precedence step
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Decided(ResolvedId),
    FallThrough,
}

/// The parent a lookup must sit under
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'s> {
    pub level: EntityLevel,
    pub id: &'s str,
}

impl<'s> Scope<'s> {
    pub fn campaign(id: &'s str) -> Self {
        Self {
            level: EntityLevel::Campaign,
            id,
        }
    }

    pub fn ad_group(id: &'s str) -> Self {
        Self {
            level: EntityLevel::AdGroup,
            id,
        }
    }
}

/// Collapse a candidate list into a step outcome
pub(crate) fn decide(mut candidates: Vec<Candidate>) -> Step {
    if candidates.is_empty() {
        return Step::FallThrough;
    }

    let distinct: BTreeSet<&str> = candidates.iter().map(|c| c.entity_id.as_str()).collect();
    if distinct.len() == 1 {
        let id = candidates[0].entity_id.clone();
        return Step::Decided(ResolvedId::Ok(id));
    }

    candidates.sort();
    candidates.dedup();
    Step::Decided(ResolvedId::Ambiguous(candidates))
}

/// Resolves report names against one lookup index as of one reference date.
///
/// Cheap to construct; holds only borrows. Safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a LookupIndex,
    config: &'a ResolverConfig,
    reference_date: NaiveDate,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a LookupIndex, config: &'a ResolverConfig, reference_date: NaiveDate) -> Self {
        Self {
            index,
            config,
            reference_date,
        }
    }

    pub fn index(&self) -> &'a LookupIndex {
        self.index
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Whether an explicitly declared parent on an override/history row is
    /// compatible with the scope being resolved.
    fn declared_parent_matches(&self, level: EntityLevel, declared: Option<&str>, scope: Scope<'_>) -> bool {
        let Some(declared) = declared else {
            return true;
        };
        match level.parent() {
            Some(direct) if direct == scope.level => declared == scope.id,
            // Declared parent is an ad group but the scope is its campaign.
            Some(direct) => self
                .index
                .ancestor_of(direct, declared, scope.level)
                .map_or(true, |ancestor| ancestor == scope.id),
            None => true,
        }
    }

    /// Whether the snapshot places `entity_id` under the scope's parent.
    /// Entities unknown to the snapshot are given the benefit of the doubt.
    fn known_parent_matches(&self, level: EntityLevel, entity_id: &str, scope: Scope<'_>) -> bool {
        self.index
            .ancestor_of(level, entity_id, scope.level)
            .map_or(true, |parent| parent == scope.id)
    }

    /// Step 1: manual overrides.
    pub(crate) fn override_step(&self, level: EntityLevel, name_norm: &str, scope: Option<Scope<'_>>) -> Step {
        let candidates: Vec<Candidate> = self
            .index
            .overrides_for(level, name_norm)
            .iter()
            .filter(|row| row.covers(self.reference_date))
            .filter(|row| {
                scope.map_or(true, |s| {
                    self.declared_parent_matches(level, row.parent_id.as_deref(), s)
                })
            })
            .map(|row| {
                Candidate::dated(
                    row.entity_id.clone(),
                    CandidateSource::Override,
                    row.valid_from,
                    row.valid_to,
                )
            })
            .collect();

        match decide(candidates) {
            Step::Decided(ResolvedId::Ok(id)) => match scope {
                Some(s) if !self.known_parent_matches(level, &id, s) => {
                    tracing::debug!(
                        level = %level,
                        name = name_norm,
                        entity_id = %id,
                        expected_parent = s.id,
                        "Override points outside the expected parent"
                    );
                    Step::Decided(ResolvedId::Unmapped)
                }
                _ => Step::Decided(ResolvedId::Ok(id)),
            },
            other => other,
        }
    }

    /// Step 3: name history.
    ///
    /// In a scoped lookup a row must place its entity under the scope's
    /// parent, either through its own `parent_id` or through the snapshot.
    /// A parentless row for an entity the snapshot does not know never matches.
    pub(crate) fn history_step(&self, level: EntityLevel, name_norm: &str, scope: Option<Scope<'_>>) -> Step {
        if !level.has_history() {
            return Step::FallThrough;
        }

        let candidates: Vec<Candidate> = self
            .index
            .history_for(level, name_norm)
            .iter()
            .filter(|row| row.covers(self.reference_date))
            .filter(|row| {
                scope.map_or(true, |s| match row.parent_id.as_deref() {
                    Some(parent) => self.declared_parent_matches(level, Some(parent), s),
                    None => self.index.ancestor_of(level, &row.entity_id, s.level) == Some(s.id),
                })
            })
            .map(|row| {
                Candidate::dated(
                    row.entity_id.clone(),
                    CandidateSource::History,
                    Some(row.valid_from),
                    row.valid_to,
                )
            })
            .collect();

        decide(candidates)
    }
}

//! In-memory lookup structures for one `(account, snapshot)` pair
//!
//! ```text
//! Snapshot ──┐
//! Overrides ─┼──► LookupIndex::build ──► name / scoped-name / id maps
//! History ───┘                             (queried by resolve::Resolver)
//! ```
//!
//! Index construction only. Duplicate names are preserved as multiple
//! candidates; deciding what a duplicate means belongs to the resolvers.

pub mod index;

pub use index::{CampaignEntry, IndexStats, LookupIndex, TargetEntry, TargetParents};

use resolver_types::EntityLevel;

/// Key used by the override and history maps: `"{level}::{name_norm}"`
pub fn temporal_key(level: EntityLevel, name_norm: &str) -> String {
    format!("{}::{}", level.as_str(), name_norm)
}

//! ads-resolver - temporal resolution of ad report names to entity ids
//!
//! Performance reports identify campaigns, ad groups, targets and ads by
//! mutable display names. This crate maps those names onto the stable ids of
//! the bulk snapshot nearest the report date, honoring manual overrides and
//! valid-time name history, and never guessing: anything it cannot resolve
//! uniquely becomes a coalesced issue plus a fact row with a synthetic key.
//!
//! ## Flow
//!
//! ```text
//! ReportRow[] ─► selector::choose ─► ReferenceStore::load_snapshot
//!                                         │
//!                    overrides + history ─┴─► LookupIndex::build
//!                                                 │
//!                                   RowMapper::map_rows (Resolver per level)
//!                                                 │
//!                                   MappingOutput { facts, issues }
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ads_resolver::{InMemoryReferenceStore, MappingJob, ResolverConfig};
//! use resolver_types::ReportKind;
//!
//! # fn main() -> ads_resolver::Result<()> {
//! let store = InMemoryReferenceStore::new();
//! let job = MappingJob {
//!     account_id: "acct".into(),
//!     upload_id: uuid::Uuid::new_v4(),
//!     report_kind: ReportKind::Campaign,
//!     reference_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
//! };
//! let outcome = job.run(&store, &ResolverConfig::default(), &[])?;
//! assert!(outcome.output.facts.is_empty());
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Configuration and tracing setup
pub mod config;
pub mod logging;

// Name normalization and snapshot selection
pub mod normalize;
pub mod selector;

// Index construction and the per-level resolvers
pub mod lookup;
pub mod resolve;

// Batch mapping and issue coalescing
pub mod issues;
pub mod mapping;

// Snapshot maintenance: name history and structural diffs
pub mod diff;
pub mod history;

// Job orchestration over a reference store
pub mod job;

// Public re-exports
pub use config::{ResolverConfig, SkuAsinConflict};
pub use error::{ConfigError, ResolverError, Result};
pub use issues::IssueCollector;
pub use job::{InMemoryReferenceStore, JobOutcome, MappingJob, ReferenceStore};
pub use lookup::{IndexStats, LookupIndex};
pub use mapping::{MappingContext, MappingOutput, RowMapper};
pub use resolve::{Resolver, TargetQuery};
pub use selector::{Direction, SnapshotChoice};

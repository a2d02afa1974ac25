//! Rosterlink Core - Player identity resolution across data sources
//!
//! Links free-text player names from one source (a betting feed) to the
//! authoritative records of another (a fantasy roster):
//!
//! - **Normalize**: canonical comparison form and display form of a name
//! - **Blocking**: cheap candidate filtering before scoring
//! - **Similarity**: composite of surname, token-overlap and fuzzy signals
//! - **Resolve**: ordered exact and fuzzy stages with greedy, non-repeating assignment
//! - **Export**: idempotent JSON store keyed by record identity, with dry-run
//! - **Pipeline**: resolve and export in one call
//! - **Config**: thresholds, weights, stage list, field names
//!
//! # Stages
//!
//! ```text
//! exact:display_name → exact:name → fuzzy
//! ```
//!
//! Each stage only sees what the previous stages left behind.

pub mod blocking;
pub mod config;
pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod resolve;
pub mod similarity;

pub use blocking::{candidate_block, Blocker};
pub use config::{
    ExportConfig, MatchingConfig, RecordFields, RosterConfig, ScoreWeights, StageSpec,
};
pub use error::{ConfigError, Result, RosterError, StoreError};
pub use export::{
    ExportStore, ExportSummary, IdentityKey, IdentityPolicy, LinkRecord, StoredEntry,
};
pub use normalize::{display_name, normalize_name, NormalizedName};
pub use pipeline::{Pipeline, PipelineInput, RunReport};
pub use record::RawRecord;
pub use resolve::{
    Candidate, DecisionOutcome, ExactMatch, Link, MatchDecision, NameIndex, Pool, PoolEntry,
    RecordLookup, Resolution, ResolutionSummary, Resolver, StageKind, StageReport,
};
pub use similarity::{MatchScore, Scorer};

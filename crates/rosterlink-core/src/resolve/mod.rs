//! Multi-stage name resolution
//!
//! Queries flow through an ordered list of stages. Each stage sees the
//! queries the previous stages left unresolved and the pool they left
//! unclaimed, and reports what it linked, consumed and passed on:
//!
//! ```text
//! queries ──► exact:display_name ──► exact:name ──► fuzzy ──► unresolved
//! pool    ──►        │ consumed          │ consumed    │ claimed ──► remaining
//! ```
//!
//! Stages never go back: a query linked by one stage is not seen again, and a
//! pool entry consumed by one stage is not offered to the next.

mod exact;
mod fuzzy;
mod index;
mod pool;

pub use fuzzy::RecordLookup;
pub use index::NameIndex;
pub use pool::{Pool, PoolEntry};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RosterConfig, StageSpec};
use crate::normalize::NormalizedName;
use crate::record::RawRecord;
use crate::similarity::{MatchScore, Scorer};

/// Candidates scored and sorted per fuzzy query
pub const SHORTLIST_LEN: usize = 5;

/// Candidates kept on each decision for auditing
pub const AUDIT_LEN: usize = 3;

/// A query resolved to one authoritative record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Query name as given
    pub query: String,
    /// Label of the stage that produced the link
    pub stage: String,
    /// Position of the record in the authoritative list
    pub record_index: usize,
    pub record: RawRecord,
    /// Composite score for fuzzy links, `None` for exact ones
    pub score: Option<f64>,
}

/// Exact-stage hit: one query, every record sharing its normalized name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactMatch {
    pub query: String,
    pub normalized: NormalizedName,
    pub record_indices: Vec<usize>,
}

/// One scored pool candidate for a fuzzy query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub source: String,
    pub pool_name: String,
    #[serde(flatten)]
    pub score: MatchScore,
}

/// Why a fuzzy decision was or was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Top candidate accepted and linked
    Linked,
    /// Top candidate scored under the threshold
    BelowThreshold,
    /// Top candidate was claimed by an earlier query in this stage
    AlreadyClaimed,
    /// Top candidate resolves to no record
    NoRecord,
    /// Nothing to compare against
    NoCandidates,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Linked => "linked",
            DecisionOutcome::BelowThreshold => "below_threshold",
            DecisionOutcome::AlreadyClaimed => "already_claimed",
            DecisionOutcome::NoRecord => "no_record",
            DecisionOutcome::NoCandidates => "no_candidates",
        }
    }
}

/// Fuzzy-stage verdict for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub query: String,
    /// Top-ranked pool name, if any candidate was scored
    pub best_match: Option<String>,
    pub best_score: Option<f64>,
    pub accepted: bool,
    pub outcome: DecisionOutcome,
    /// Record linked on acceptance
    pub record_index: Option<usize>,
    /// Top candidates, best first
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Exact,
    Fuzzy,
}

/// What one stage did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub label: String,
    pub kind: StageKind,
    /// Queries handed to the stage
    pub queries_in: usize,
    /// Pool entries handed to the stage
    pub pool_in: usize,
    pub exact_matches: Vec<ExactMatch>,
    /// Queries whose name is in the pool but on no record for the stage field
    pub known_without_record: Vec<String>,
    pub decisions: Vec<MatchDecision>,
    pub links: Vec<Link>,
    /// Pool entries removed by this stage
    pub consumed: Vec<PoolEntry>,
    /// Queries passed to the next stage
    pub unresolved: Vec<String>,
    /// Pool passed to the next stage
    pub remaining: Pool,
}

impl StageReport {
    fn new(stage: &StageSpec, queries_in: usize, pool_in: usize) -> Self {
        Self {
            label: stage.label(),
            kind: match stage {
                StageSpec::Exact { .. } => StageKind::Exact,
                StageSpec::Fuzzy => StageKind::Fuzzy,
            },
            queries_in,
            pool_in,
            exact_matches: Vec::new(),
            known_without_record: Vec::new(),
            decisions: Vec::new(),
            links: Vec::new(),
            consumed: Vec::new(),
            unresolved: Vec::new(),
            remaining: Pool::default(),
        }
    }

    pub fn linked_queries(&self) -> usize {
        match self.kind {
            StageKind::Exact => self.exact_matches.len(),
            StageKind::Fuzzy => self.decisions.iter().filter(|d| d.accepted).count(),
        }
    }
}

/// Result of a full resolution run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub stages: Vec<StageReport>,
    /// Every link, in stage order then query order
    pub links: Vec<Link>,
    /// Queries no stage resolved
    pub unresolved: Vec<String>,
    /// Pool entries no stage consumed
    pub remaining: Pool,
}

/// Headline counts of a resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub queries: usize,
    pub exact: usize,
    pub fuzzy: usize,
    pub unresolved: usize,
    pub links: usize,
    pub pool_remaining: usize,
}

impl Resolution {
    /// All fuzzy decisions across stages
    pub fn decisions(&self) -> impl Iterator<Item = &MatchDecision> {
        self.stages.iter().flat_map(|s| s.decisions.iter())
    }

    /// Queries resolved by exact stages
    pub fn exact_count(&self) -> usize {
        self.count_linked(StageKind::Exact)
    }

    /// Queries resolved by fuzzy stages
    pub fn fuzzy_count(&self) -> usize {
        self.count_linked(StageKind::Fuzzy)
    }

    fn count_linked(&self, kind: StageKind) -> usize {
        self.stages
            .iter()
            .filter(|s| s.kind == kind)
            .map(StageReport::linked_queries)
            .sum()
    }

    pub fn summary(&self) -> ResolutionSummary {
        ResolutionSummary {
            queries: self.stages.first().map(|s| s.queries_in).unwrap_or(0),
            exact: self.exact_count(),
            fuzzy: self.fuzzy_count(),
            unresolved: self.unresolved.len(),
            links: self.links.len(),
            pool_remaining: self.remaining.len(),
        }
    }
}

/// Runs the configured stages over one batch
#[derive(Debug, Clone)]
pub struct Resolver {
    stages: Vec<StageSpec>,
    scorer: Scorer,
    threshold: f64,
    name_fields: Vec<String>,
    lookup_fields: Vec<String>,
}

impl Resolver {
    /// Validates the configuration; nothing runs on a rejected config
    pub fn new(config: &RosterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            stages: config.stages.clone(),
            scorer: Scorer::from_config(&config.matching),
            threshold: config.matching.threshold,
            name_fields: config.records.name_fields.clone(),
            lookup_fields: config.indexed_fields(),
        })
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    /// Resolve `queries` against `pool` and `records`.
    ///
    /// Inputs are read-only snapshots; the residuals of every stage are in
    /// the returned report.
    pub fn resolve<S: AsRef<str>>(
        &self,
        queries: &[S],
        pool: &Pool,
        records: &[RawRecord],
    ) -> Resolution {
        let mut pending: Vec<String> = queries.iter().map(|q| q.as_ref().to_string()).collect();
        let mut current = pool.clone();
        let mut stages = Vec::with_capacity(self.stages.len());
        let mut links = Vec::new();
        // Record positions already linked; a record links at most one query
        let mut linked: BTreeSet<usize> = BTreeSet::new();

        // Built lazily: only fuzzy stages map pool names back to records
        let mut lookup: Option<RecordLookup> = None;

        for stage in &self.stages {
            let mut report = StageReport::new(stage, pending.len(), current.len());

            match stage {
                StageSpec::Exact { field } => {
                    exact::run(
                        &mut report,
                        field,
                        &pending,
                        &current,
                        records,
                        &self.lookup_fields,
                        &mut linked,
                    );
                }
                StageSpec::Fuzzy => {
                    let fields = self.lookup_fields.as_slice();
                    let lookup = lookup.get_or_insert_with(|| RecordLookup::new(records, fields));
                    let params = fuzzy::FuzzyParams {
                        scorer: &self.scorer,
                        threshold: self.threshold,
                    };
                    fuzzy::run(
                        &mut report,
                        &params,
                        &pending,
                        &current,
                        records,
                        lookup,
                        &mut linked,
                    );
                }
            }

            tracing::debug!(
                stage = %report.label,
                queries_in = report.queries_in,
                pool_in = report.pool_in,
                linked = report.linked_queries(),
                known_without_record = report.known_without_record.len(),
                consumed = report.consumed.len(),
                unresolved = report.unresolved.len(),
                "stage complete"
            );

            pending = report.unresolved.clone();
            current = report.remaining.clone();
            links.extend(report.links.iter().cloned());
            stages.push(report);
        }

        Resolution {
            stages,
            links,
            unresolved: pending,
            remaining: current,
        }
    }

    /// Name fields used to label records
    pub fn name_fields(&self) -> &[String] {
        &self.name_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<RawRecord> {
        vec![
            json!({"id": 1, "display_name": "Hee-chan Hwang", "name": "Hwang Hee-Chan"}),
            json!({"id": 2, "display_name": "Eli Kroupi", "name": "Eli Junior Kroupi"}),
            json!({"id": 3, "display_name": "Ben Doak", "name": "Ben Gannon-Doak"}),
            json!({"id": 4, "display_name": "Ui-Jo Hwang", "name": "Ui-Jo Hwang"}),
        ]
        .into_iter()
        .filter_map(RawRecord::from_value)
        .collect()
    }

    fn resolver() -> Resolver {
        Resolver::new(&RosterConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = RosterConfig::default();
        config.matching.threshold = 120.0;
        assert!(Resolver::new(&config).is_err());
    }

    #[test]
    fn test_stage_labels_follow_config() {
        let records = records();
        let pool = Pool::from_records(&records, &["display_name", "name"]);
        let resolution = resolver().resolve(&["John Doe"], &pool, &records);
        let labels: Vec<&str> = resolution.stages.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["exact:display_name", "exact:name", "fuzzy"]);
    }

    #[test]
    fn test_residuals_chain_between_stages() {
        let records = records();
        let pool = Pool::from_records(&records, &["display_name", "name"]);
        let resolution =
            resolver().resolve(&["Ben Doak", "Hwang Hee-Chan", "John Doe"], &pool, &records);

        let first = &resolution.stages[0];
        assert_eq!(first.unresolved, vec!["Hwang Hee-Chan", "John Doe"]);

        let second = &resolution.stages[1];
        assert_eq!(second.queries_in, 2);
        assert_eq!(second.pool_in, first.remaining.len());
        assert_eq!(second.unresolved, vec!["John Doe"]);

        assert_eq!(resolution.unresolved, vec!["John Doe"]);
        assert_eq!(resolution.exact_count(), 2);
        assert_eq!(resolution.fuzzy_count(), 0);
    }

    #[test]
    fn test_summary_counts() {
        let records = records();
        let pool = Pool::from_records(&records, &["display_name", "name"]);
        let resolution =
            resolver().resolve(&["Ben Doak", "Hwang Hee-Chan", "John Doe"], &pool, &records);
        let summary = resolution.summary();
        assert_eq!(summary.queries, 3);
        assert_eq!(summary.exact + summary.fuzzy + summary.unresolved, 3);
        assert_eq!(summary.links, resolution.links.len());
    }

    #[test]
    fn test_empty_inputs_complete() {
        let resolution = resolver().resolve::<&str>(&[], &Pool::default(), &[]);
        assert!(resolution.links.is_empty());
        assert!(resolution.unresolved.is_empty());
        assert_eq!(resolution.decisions().count(), 0);
    }

    #[test]
    fn test_record_links_one_query_across_stages() {
        let records: Vec<RawRecord> =
            vec![json!({"id": 3, "display_name": "Ben Doak", "name": "Ben Gannon-Doak"})]
                .into_iter()
                .filter_map(RawRecord::from_value)
                .collect();
        let pool = Pool::from_records(&records, &["display_name", "name"]);
        let resolution = resolver().resolve(&["Ben Doak", "Ben Gannon-Doak"], &pool, &records);

        assert_eq!(resolution.links.len(), 1);
        assert_eq!(resolution.links[0].query, "Ben Doak");
        assert_eq!(resolution.exact_count(), 1);
        assert_eq!(resolution.unresolved, vec!["Ben Gannon-Doak"]);
    }
}

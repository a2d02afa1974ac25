//! Fuzzy stage: blocked, scored, greedy assignment

use std::collections::BTreeSet;

use super::{
    Candidate, DecisionOutcome, Link, MatchDecision, NameIndex, Pool, StageReport, AUDIT_LEN,
    SHORTLIST_LEN,
};
use crate::blocking::Blocker;
use crate::normalize::NormalizedName;
use crate::record::RawRecord;
use crate::similarity::{MatchScore, Scorer};

pub(super) struct FuzzyParams<'a> {
    pub scorer: &'a Scorer,
    pub threshold: f64,
}

/// Maps a pool name back to an authoritative record
#[derive(Debug, Clone)]
pub struct RecordLookup {
    index: NameIndex,
    names: Vec<Vec<NormalizedName>>,
}

impl RecordLookup {
    pub fn new<S: AsRef<str>>(records: &[RawRecord], name_fields: &[S]) -> Self {
        let names = records
            .iter()
            .map(|record| {
                name_fields
                    .iter()
                    .filter_map(|f| record.text(f.as_ref()))
                    .map(NormalizedName::new)
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .collect();

        Self {
            index: NameIndex::build_multi(records, name_fields),
            names,
        }
    }

    /// Record position for `name`, skipping records already in `linked`.
    ///
    /// An exact index hit wins (first free record on duplicates). Otherwise
    /// the free record whose best name scores highest against `name`, first
    /// on ties, provided that score reaches `min_score`.
    pub fn find(
        &self,
        name: &NormalizedName,
        scorer: &Scorer,
        min_score: f64,
        linked: &BTreeSet<usize>,
    ) -> Option<usize> {
        if let Some(&pos) = self
            .index
            .get(name)
            .and_then(|positions| positions.iter().find(|pos| !linked.contains(pos)))
        {
            return Some(pos);
        }

        let mut best: Option<(usize, f64)> = None;
        for (pos, names) in self.names.iter().enumerate() {
            if linked.contains(&pos) {
                continue;
            }
            for candidate in names {
                let composite = scorer.score_normalized(name, candidate).composite;
                if best.map_or(true, |(_, score)| composite > score) {
                    best = Some((pos, composite));
                }
            }
        }
        best.filter(|&(_, score)| score >= min_score)
            .map(|(pos, _)| pos)
    }
}

/// Fill `report` with one decision per query.
///
/// Candidates come from the pool as handed to the stage; claims made earlier
/// in the stage make a top candidate unavailable rather than skipping it.
/// Records in `linked` are never linked again; new links are added to it.
pub(super) fn run(
    report: &mut StageReport,
    params: &FuzzyParams<'_>,
    queries: &[String],
    pool: &Pool,
    records: &[RawRecord],
    lookup: &RecordLookup,
    linked: &mut BTreeSet<usize>,
) {
    if pool.is_empty() || queries.is_empty() {
        report.unresolved = queries.to_vec();
        report.remaining = pool.clone();
        return;
    }

    let blocker = Blocker::from_normalized(pool.entries().iter().map(|e| &e.normalized));
    let mut claimed: BTreeSet<usize> = BTreeSet::new();

    for query in queries {
        let normalized = NormalizedName::new(query);
        let shortlist = if normalized.is_empty() {
            Vec::new()
        } else {
            shortlist(params.scorer, &normalized, pool, &blocker)
        };

        let candidates: Vec<Candidate> = shortlist
            .iter()
            .take(AUDIT_LEN)
            .map(|(pos, score)| Candidate {
                source: query.clone(),
                pool_name: pool.entries()[*pos].name.clone(),
                score: *score,
            })
            .collect();

        let mut decision = MatchDecision {
            query: query.clone(),
            best_match: None,
            best_score: None,
            accepted: false,
            outcome: DecisionOutcome::NoCandidates,
            record_index: None,
            candidates,
        };

        if let Some(&(top, score)) = shortlist.first() {
            let entry = &pool.entries()[top];
            decision.best_match = Some(entry.name.clone());
            decision.best_score = Some(score.composite);

            decision.outcome = if score.composite < params.threshold {
                DecisionOutcome::BelowThreshold
            } else if claimed.contains(&top) {
                DecisionOutcome::AlreadyClaimed
            } else {
                match lookup.find(&entry.normalized, params.scorer, params.threshold, linked) {
                    Some(record_index) => {
                        claimed.insert(top);
                        linked.insert(record_index);
                        decision.accepted = true;
                        decision.record_index = Some(record_index);
                        report.links.push(Link {
                            query: query.clone(),
                            stage: report.label.clone(),
                            record_index,
                            record: records[record_index].clone(),
                            score: Some(score.composite),
                        });
                        DecisionOutcome::Linked
                    }
                    None => DecisionOutcome::NoRecord,
                }
            };
        }

        tracing::trace!(
            query = %decision.query,
            best = ?decision.best_match,
            score = ?decision.best_score,
            outcome = decision.outcome.as_str(),
            "fuzzy decision"
        );

        if !decision.accepted {
            report.unresolved.push(query.clone());
        }
        report.decisions.push(decision);
    }

    let (consumed, remaining) = pool.partition_by_position(&claimed);
    report.consumed = consumed;
    report.remaining = remaining;
}

/// Top candidates for one query, best first; ties keep pool order
fn shortlist(
    scorer: &Scorer,
    query: &NormalizedName,
    pool: &Pool,
    blocker: &Blocker,
) -> Vec<(usize, MatchScore)> {
    let mut scored: Vec<(usize, MatchScore)> = blocker
        .candidates(query)
        .into_iter()
        .map(|pos| (pos, scorer.score_normalized(query, &pool.entries()[pos].normalized)))
        .collect();
    scored.sort_by(|a, b| b.1.composite.total_cmp(&a.1.composite));
    scored.truncate(SHORTLIST_LEN);
    scored
}

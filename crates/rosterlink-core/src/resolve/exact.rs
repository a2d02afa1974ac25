//! Exact stage: normalized-name equality against one record field

use std::collections::{BTreeSet, HashSet};

use super::{ExactMatch, Link, NameIndex, Pool, StageReport};
use crate::normalize::NormalizedName;
use crate::record::RawRecord;

/// Fill `report` with the exact matches of `queries` on `field`.
///
/// A linked record consumes every pool entry that carries one of its names
/// under `name_fields`, not just the entry the query matched. Records in
/// `linked` are never linked again; new links are added to it.
pub(super) fn run(
    report: &mut StageReport,
    field: &str,
    queries: &[String],
    pool: &Pool,
    records: &[RawRecord],
    name_fields: &[String],
    linked: &mut BTreeSet<usize>,
) {
    let index = NameIndex::build(records, field);
    let mut taken: HashSet<NormalizedName> = HashSet::new();

    for query in queries {
        let normalized = NormalizedName::new(query);
        if normalized.is_empty() {
            report.unresolved.push(query.clone());
            continue;
        }

        let hit = index.get(&normalized);
        let free: Vec<usize> = hit
            .map(|positions| {
                positions
                    .iter()
                    .copied()
                    .filter(|pos| !linked.contains(pos))
                    .collect()
            })
            .unwrap_or_default();

        if !free.is_empty() {
            for &pos in &free {
                linked.insert(pos);
                let record = &records[pos];
                taken.extend(
                    name_fields
                        .iter()
                        .filter_map(|f| record.text(f))
                        .map(NormalizedName::new),
                );
                report.links.push(Link {
                    query: query.clone(),
                    stage: report.label.clone(),
                    record_index: pos,
                    record: record.clone(),
                    score: None,
                });
            }
            report.exact_matches.push(ExactMatch {
                query: query.clone(),
                normalized: normalized.clone(),
                record_indices: free,
            });
            taken.insert(normalized);
            continue;
        }

        if hit.is_some() {
            tracing::debug!(query = %query, field, "record already linked");
        } else if pool.contains(&normalized) && !taken.contains(&normalized) {
            tracing::debug!(query = %query, field, "name in pool but on no record");
            report.known_without_record.push(query.clone());
            taken.insert(normalized);
        }
        report.unresolved.push(query.clone());
    }

    let (consumed, remaining) = pool.partition_by_name(&taken);
    report.consumed = consumed;
    report.remaining = remaining;
}

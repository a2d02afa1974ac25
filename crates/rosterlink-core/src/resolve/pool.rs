//! Authoritative-side name pool
//!
//! A stage never mutates the pool it is given. It reports which entries it
//! consumed and hands a new, smaller pool to the next stage.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::normalize::NormalizedName;
use crate::record::RawRecord;

/// One pool name with its normalized form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub name: String,
    pub normalized: NormalizedName,
}

impl PoolEntry {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized = NormalizedName::new(&name);
        Self { name, normalized }
    }
}

/// Ordered pool of names, unique by normalized form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Pool {
    entries: Vec<PoolEntry>,
}

impl Pool {
    /// Build a pool from names in order.
    ///
    /// Names that normalize to nothing are dropped, and only the first
    /// spelling of each normalized name is kept.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_entries(names.into_iter().map(PoolEntry::new))
    }

    /// Pool of record labels: the first present name field of each record,
    /// in display form
    pub fn from_records<S: AsRef<str>>(records: &[RawRecord], name_fields: &[S]) -> Self {
        Self::new(records.iter().filter_map(|r| r.display_label(name_fields)))
    }

    fn from_entries<I: IntoIterator<Item = PoolEntry>>(entries: I) -> Self {
        let mut seen: HashSet<NormalizedName> = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| !entry.normalized.is_empty())
            .filter(|entry| seen.insert(entry.normalized.clone()))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn get(&self, pos: usize) -> Option<&PoolEntry> {
        self.entries.get(pos)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw names in pool order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn contains(&self, normalized: &NormalizedName) -> bool {
        self.entries.iter().any(|e| &e.normalized == normalized)
    }

    /// Split into `(consumed, remaining)` by normalized name
    pub fn partition_by_name(&self, taken: &HashSet<NormalizedName>) -> (Vec<PoolEntry>, Pool) {
        let (consumed, remaining): (Vec<PoolEntry>, Vec<PoolEntry>) = self
            .entries
            .iter()
            .cloned()
            .partition(|entry| taken.contains(&entry.normalized));
        (consumed, Pool { entries: remaining })
    }

    /// Split into `(consumed, remaining)` by position
    pub fn partition_by_position(&self, claimed: &BTreeSet<usize>) -> (Vec<PoolEntry>, Pool) {
        let mut consumed = Vec::with_capacity(claimed.len());
        let mut remaining = Vec::with_capacity(self.entries.len() - claimed.len().min(self.len()));
        for (pos, entry) in self.entries.iter().enumerate() {
            if claimed.contains(&pos) {
                consumed.push(entry.clone());
            } else {
                remaining.push(entry.clone());
            }
        }
        (consumed, Pool { entries: remaining })
    }
}

impl<S: Into<String>> FromIterator<S> for Pool {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Pool::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pool_dedupes_by_normalized_name() {
        let pool = Pool::new(["Eli Junior Kroupi", "eli kroupi", "", "  ", "Ben Doak"]);
        assert_eq!(pool.names(), vec!["Eli Junior Kroupi", "Ben Doak"]);
    }

    #[test]
    fn test_partition_by_name() {
        let pool = Pool::new(["Ben Doak", "Ben Mee", "Igor"]);
        let taken: HashSet<NormalizedName> = [NormalizedName::new("BEN MEE")].into_iter().collect();
        let (consumed, remaining) = pool.partition_by_name(&taken);
        assert_eq!(consumed.len(), 1);
        assert_eq!(consumed[0].name, "Ben Mee");
        assert_eq!(remaining.names(), vec!["Ben Doak", "Igor"]);
        // Partitioning leaves the source pool intact
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_partition_by_position() {
        let pool = Pool::new(["Ben Doak", "Ben Mee", "Igor"]);
        let claimed: BTreeSet<usize> = [0, 2].into_iter().collect();
        let (consumed, remaining) = pool.partition_by_position(&claimed);
        assert_eq!(consumed.len(), 2);
        assert_eq!(remaining.names(), vec!["Ben Mee"]);
    }

    #[test]
    fn test_from_records_uses_first_name_field() {
        let records: Vec<RawRecord> = vec![
            json!({"display_name": "Martin Ødegaard", "name": "Martin Odegaard"}),
            json!({"name": "Igor Julio"}),
            json!({"id": 3}),
        ]
        .into_iter()
        .filter_map(RawRecord::from_value)
        .collect();

        let pool = Pool::from_records(&records, &["display_name", "name"]);
        assert_eq!(pool.names(), vec!["Martin Odegaard", "Igor Julio"]);
    }
}

//! Candidate blocking
//!
//! Restricts fuzzy scoring to plausible pool entries. Three tiers, each
//! tried only when the previous one is empty:
//!
//! 1. entries sharing at least one token with the query
//! 2. entries with the same last token (surname)
//! 3. the whole pool
//!
//! A non-empty pool therefore always yields at least one candidate.

use std::collections::HashSet;

use crate::normalize::NormalizedName;

/// Pre-tokenized pool, built once and queried many times
#[derive(Debug, Clone, Default)]
pub struct Blocker {
    entries: Vec<BlockEntry>,
}

#[derive(Debug, Clone)]
struct BlockEntry {
    tokens: HashSet<String>,
    surname: String,
}

impl BlockEntry {
    fn new(name: &NormalizedName) -> Self {
        Self {
            tokens: name.tokens().map(str::to_string).collect(),
            surname: name.surname().to_string(),
        }
    }
}

impl Blocker {
    /// Build from raw pool names
    pub fn new<S: AsRef<str>>(pool: &[S]) -> Self {
        Self {
            entries: pool
                .iter()
                .map(|name| BlockEntry::new(&NormalizedName::new(name.as_ref())))
                .collect(),
        }
    }

    /// Build from names that are already normalized
    pub fn from_normalized<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a NormalizedName>,
    {
        Self {
            entries: names.into_iter().map(BlockEntry::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positions of the candidate entries, in pool order
    pub fn candidates(&self, query: &NormalizedName) -> Vec<usize> {
        let query_tokens: HashSet<&str> = query.tokens().collect();

        let shared = self.positions(|entry| {
            entry
                .tokens
                .iter()
                .any(|token| query_tokens.contains(token.as_str()))
        });
        if !shared.is_empty() {
            return shared;
        }

        let surname = query.surname();
        if !surname.is_empty() {
            let same_surname = self.positions(|entry| entry.surname == surname);
            if !same_surname.is_empty() {
                return same_surname;
            }
        }

        (0..self.entries.len()).collect()
    }

    fn positions<F>(&self, keep: F) -> Vec<usize>
    where
        F: Fn(&BlockEntry) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| keep(entry))
            .map(|(pos, _)| pos)
            .collect()
    }
}

/// Candidate pool names for `query`
pub fn candidate_block<'p, S: AsRef<str>>(query: &str, pool: &'p [S]) -> Vec<&'p str> {
    Blocker::new(pool)
        .candidates(&NormalizedName::new(query))
        .into_iter()
        .map(|pos| pool[pos].as_ref())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: [&str; 6] = [
        "Ben Osborn",
        "Ben Doak",
        "Hee-chan Hwang",
        "Ui-Jo Hwang",
        "Kadan Young",
        "Ashley Young",
    ];

    #[test]
    fn test_token_overlap_tier() {
        let candidates = candidate_block("Ben Gannon-Doak", &POOL);
        assert_eq!(candidates, vec!["Ben Osborn", "Ben Doak"]);
    }

    #[test]
    fn test_token_overlap_is_normalized() {
        let candidates = candidate_block("HWANG Hee-Chan", &POOL);
        assert_eq!(candidates, vec!["Hee-chan Hwang", "Ui-Jo Hwang"]);
    }

    #[test]
    fn test_full_pool_fallback() {
        let candidates = candidate_block("John Doe", &POOL);
        assert_eq!(candidates.len(), POOL.len());
    }

    #[test]
    fn test_empty_query_gets_full_pool() {
        assert_eq!(candidate_block("", &POOL).len(), POOL.len());
    }

    #[test]
    fn test_empty_pool() {
        let pool: [&str; 0] = [];
        assert!(candidate_block("Ben Doak", &pool).is_empty());
    }

    #[test]
    fn test_positions_index_into_pool() {
        let blocker = Blocker::new(&["", "Ashley Young"]);
        assert_eq!(blocker.candidates(&NormalizedName::new("Kadan Young")), vec![1]);
        assert_eq!(blocker.candidates(&NormalizedName::new("Igor")), vec![0, 1]);
    }
}

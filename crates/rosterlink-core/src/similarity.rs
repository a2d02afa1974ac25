//! Similarity scoring between two player names
//!
//! Three independent signals, each on a 0-100 scale:
//!
//! - **surname**: 100 when the family names agree, else 0
//! - **token overlap**: Dice coefficient over the token sets
//! - **fuzzy**: token-set similarity of the normalized strings
//!
//! The composite is their weighted sum, rounded to two decimals.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

use crate::config::{MatchingConfig, ScoreWeights};
use crate::normalize::NormalizedName;

/// Score breakdown for one name pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Weighted sum of the three signals (0-100)
    pub composite: f64,
    /// 0 or 100
    pub surname_match: f64,
    /// Dice coefficient of the token sets (0-100)
    pub token_overlap: f64,
    /// Token-set string similarity (0-100)
    pub fuzzy: f64,
}

/// Composite scorer with configurable weights
#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    weights: ScoreWeights,
    reversed_name_order: bool,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

impl Scorer {
    /// Strict scorer: surname credit only when the last tokens agree
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights,
            reversed_name_order: false,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self {
            weights: config.weights,
            reversed_name_order: config.reversed_name_order,
        }
    }

    pub fn with_reversed_name_order(mut self, enabled: bool) -> Self {
        self.reversed_name_order = enabled;
        self
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Score two raw names
    pub fn score(&self, a: &str, b: &str) -> MatchScore {
        self.score_normalized(&NormalizedName::new(a), &NormalizedName::new(b))
    }

    /// Score two already-normalized names
    pub fn score_normalized(&self, a: &NormalizedName, b: &NormalizedName) -> MatchScore {
        let surname = surname_match(a, b, self.reversed_name_order);
        let overlap = token_overlap(a, b);
        let fuzzy = token_set_similarity(a.as_str(), b.as_str());

        let composite = self.weights.surname * surname
            + self.weights.token_overlap * overlap
            + self.weights.fuzzy * fuzzy;

        MatchScore {
            composite: round2(composite.clamp(0.0, 100.0)),
            surname_match: surname,
            token_overlap: round2(overlap),
            fuzzy: round2(fuzzy),
        }
    }
}

/// 100 if the family names agree, else 0.
///
/// With `reversed_name_order`, a family-name-first spelling of a multi-token
/// name also agrees: the last token of one equals the first token of the other.
pub fn surname_match(a: &NormalizedName, b: &NormalizedName, reversed_name_order: bool) -> f64 {
    let (last_a, last_b) = (a.surname(), b.surname());
    if last_a.is_empty() || last_b.is_empty() {
        return 0.0;
    }
    if last_a == last_b {
        return 100.0;
    }

    if reversed_name_order && a.token_count() > 1 && b.token_count() > 1 {
        if last_a == b.first_token() || a.first_token() == last_b {
            return 100.0;
        }
    }

    0.0
}

/// Dice coefficient over token sets, scaled to 0-100
pub fn token_overlap(a: &NormalizedName, b: &NormalizedName) -> f64 {
    let set_a: BTreeSet<&str> = a.tokens().collect();
    let set_b: BTreeSet<&str> = b.tokens().collect();

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let shared = set_a.intersection(&set_b).count();
    200.0 * shared as f64 / (set_a.len() + set_b.len()) as f64
}

/// Token-set similarity (0-100) of two normalized strings.
///
/// Splits both names into sorted token sets, then compares the shared part
/// against each side's recombination, so word order and extra given names
/// cost little. A name whose tokens are a subset of the other's scores 100.
pub fn token_set_similarity(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = set_a.intersection(&set_b).copied().collect();
    let only_a: Vec<&str> = set_a.difference(&set_b).copied().collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).copied().collect();

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let shared = shared.join(" ");
    let combined_a = join_tokens(&shared, &only_a);
    let combined_b = join_tokens(&shared, &only_b);

    let mut best = ratio(&combined_a, &combined_b);
    if !shared.is_empty() {
        best = best
            .max(ratio(&shared, &combined_a))
            .max(ratio(&shared, &combined_b));
    }
    best
}

fn join_tokens(prefix: &str, rest: &[&str]) -> String {
    let rest = rest.join(" ");
    match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => prefix.to_string(),
        (false, false) => format!("{} {}", prefix, rest),
    }
}

fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(text: &str) -> NormalizedName {
        NormalizedName::new(text)
    }

    #[test]
    fn test_surname_match_strict() {
        assert_eq!(surname_match(&n("Ben Doak"), &n("Ben Gannon-Doak"), false), 100.0);
        assert_eq!(surname_match(&n("Ben Doak"), &n("Ben Mee"), false), 0.0);
        assert_eq!(surname_match(&n("Hee-chan Hwang"), &n("Hwang Hee-Chan"), false), 0.0);
        assert_eq!(surname_match(&n(""), &n(""), false), 0.0);
    }

    #[test]
    fn test_surname_match_reversed_order() {
        assert_eq!(surname_match(&n("Hee-chan Hwang"), &n("Hwang Hee-Chan"), true), 100.0);
        assert_eq!(surname_match(&n("Hwang Hee-Chan"), &n("Hee-chan Hwang"), true), 100.0);
        // Single-token names never match by position swap
        assert_eq!(surname_match(&n("Chermiti"), &n("Chermiti Youssef"), true), 0.0);
    }

    #[test]
    fn test_token_overlap_dice() {
        assert_eq!(token_overlap(&n("Ben Doak"), &n("Ben Doak")), 100.0);
        assert_eq!(token_overlap(&n("Ben Doak"), &n("Ben Mee")), 50.0);
        assert_eq!(token_overlap(&n("Ben Doak"), &n("")), 0.0);
        let third = token_overlap(&n("Hee-chan Hwang"), &n("Ui-Jo Hwang"));
        assert!((third - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_token_set_similarity() {
        assert_eq!(token_set_similarity("hee chan hwang", "hwang hee chan"), 100.0);
        assert_eq!(token_set_similarity("igor", "igor julio"), 100.0);
        assert_eq!(token_set_similarity("", "igor"), 0.0);
        assert!(token_set_similarity("ben doak", "ben mee") < 100.0);
        assert!(token_set_similarity("john doe", "ashley young") < 40.0);
    }

    #[test]
    fn test_composite_weights() {
        let scorer = Scorer::default();
        let score = scorer.score("Ben Gannon-Doak", "Ben Doak");
        assert_eq!(score.surname_match, 100.0);
        assert!((score.token_overlap - 80.0).abs() < 1e-9);
        assert_eq!(score.fuzzy, 100.0);
        assert_eq!(score.composite, 93.0);
    }

    #[test]
    fn test_composite_is_rounded() {
        let score = Scorer::default().score("Hee-chan Hwang", "Ui-Jo Hwang");
        assert_eq!(score.composite, (score.composite * 100.0).round() / 100.0);
        assert!(score.composite < 70.0);
    }

    #[test]
    fn test_custom_weights() {
        let scorer = Scorer::new(ScoreWeights::new(0.0, 0.0, 1.0));
        let score = scorer.score("Igor", "Igor Jesus");
        assert_eq!(score.composite, 100.0);
    }
}

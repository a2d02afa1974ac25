//! Name normalization for comparison and display
//!
//! `normalize_name` produces the canonical form every comparison runs on:
//! diacritics stripped, transliterated, case folded, punctuation and the
//! "jr"/"junior" suffix removed, whitespace collapsed. `display_name` only
//! strips diacritics and transliterates, for labels a human will read.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Letters that compatibility decomposition leaves intact
    static ref TRANSLITERATIONS: HashMap<char, &'static str> = {
        let pairs = [
            ('ı', "i"), // dotless i
            ('İ', "I"), // capital dotted i
            ('ğ', "g"),
            ('Ğ', "G"),
            ('Ø', "O"),
            ('ø', "o"),
            ('Ł', "L"),
            ('ł', "l"),
            ('Đ', "D"),
            ('đ', "d"),
            ('Ħ', "H"),
            ('ħ', "h"),
            ('ß', "ss"),
            ('Æ', "AE"),
            ('æ', "ae"),
            ('Œ', "OE"),
            ('œ', "oe"),
            ('Þ', "Th"),
            ('þ', "th"),
            ('ð', "d"),
        ];
        pairs.into_iter().collect()
    };
}

/// Standalone tokens dropped from normalized names
const SUFFIX_TOKENS: [&str; 2] = ["jr", "junior"];

/// Normalize a name for comparison.
///
/// Total: any input yields a (possibly empty) string made only of
/// `[a-z0-9']` tokens separated by single spaces. Idempotent.
pub fn normalize_name(text: &str) -> String {
    let folded = fold_letters(text);

    let mut cleaned = String::with_capacity(folded.len());
    for c in folded.chars() {
        let c = match c {
            c if is_hyphen_like(c) => ' ',
            '\u{2018}' | '\u{2019}' => '\'',
            c => c,
        };
        for lower in c.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() || lower == '\'' {
                cleaned.push(lower);
            } else {
                cleaned.push(' ');
            }
        }
    }

    cleaned
        .split_whitespace()
        .filter(|token| !SUFFIX_TOKENS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip diacritics and transliterate, keeping case and punctuation
pub fn display_name(text: &str) -> String {
    fold_letters(text).trim().to_string()
}

/// Tokens of the normalized name
pub fn tokens(text: &str) -> Vec<String> {
    NormalizedName::new(text)
        .tokens()
        .map(str::to_string)
        .collect()
}

/// Last normalized token, or an empty string
pub fn surname(text: &str) -> String {
    NormalizedName::new(text).surname().to_string()
}

/// Decompose, drop combining marks, apply the transliteration table
fn fold_letters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        match TRANSLITERATIONS.get(&c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

fn is_hyphen_like(c: char) -> bool {
    matches!(c, '-' | '\u{2010}'..='\u{2015}' | '\u{2212}')
}

/// A name in canonical comparison form
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedName(String);

impl NormalizedName {
    pub fn new(text: &str) -> Self {
        Self(normalize_name(text))
    }

    /// Missing input normalizes to the empty name
    pub fn from_optional(text: Option<&str>) -> Self {
        text.map(Self::new).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    pub fn first_token(&self) -> &str {
        self.tokens().next().unwrap_or("")
    }

    /// Last token, treated as the family name
    pub fn surname(&self) -> &str {
        self.tokens().last().unwrap_or("")
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

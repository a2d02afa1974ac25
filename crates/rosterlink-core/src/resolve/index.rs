//! Normalized-name index over the authoritative records

use std::collections::HashMap;

use crate::normalize::NormalizedName;
use crate::record::RawRecord;

/// Map from normalized name to record positions, in record order.
///
/// Built once per stage and read-only afterwards. Records without the
/// indexed field are skipped.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: HashMap<NormalizedName, Vec<usize>>,
}

impl NameIndex {
    /// Index one field
    pub fn build(records: &[RawRecord], field: &str) -> Self {
        Self::build_multi(records, &[field])
    }

    /// Index several fields; a record is listed once per distinct key
    pub fn build_multi<S: AsRef<str>>(records: &[RawRecord], fields: &[S]) -> Self {
        let mut entries: HashMap<NormalizedName, Vec<usize>> = HashMap::new();
        let mut skipped = 0usize;

        for (pos, record) in records.iter().enumerate() {
            let mut indexed = false;
            for field in fields {
                let Some(text) = record.text(field.as_ref()) else {
                    continue;
                };
                let key = NormalizedName::new(text);
                if key.is_empty() {
                    continue;
                }
                let positions = entries.entry(key).or_default();
                if positions.last() != Some(&pos) {
                    positions.push(pos);
                }
                indexed = true;
            }
            if !indexed {
                skipped += 1;
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "records without an indexable name field");
        }

        Self { entries }
    }

    pub fn get(&self, name: &NormalizedName) -> Option<&[usize]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &NormalizedName) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<RawRecord> {
        vec![
            json!({"id": 1, "display_name": "Eli Kroupi", "name": "Eli Junior Kroupi"}),
            json!({"id": 2, "display_name": "Igor", "name": "Igor Julio"}),
            json!({"id": 3, "name": "Igor"}),
            json!({"id": 4}),
        ]
        .into_iter()
        .filter_map(RawRecord::from_value)
        .collect()
    }

    #[test]
    fn test_single_field_index() {
        let index = NameIndex::build(&records(), "display_name");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&NormalizedName::new("IGOR")), Some(&[1usize][..]));
        assert!(!index.contains(&NormalizedName::new("Igor Julio")));
    }

    #[test]
    fn test_multiple_records_per_key() {
        let index = NameIndex::build_multi(&records(), &["display_name", "name"]);
        assert_eq!(index.get(&NormalizedName::new("Igor")), Some(&[1usize, 2][..]));
        // Both fields of record 0 normalize to the same key; listed once
        assert_eq!(index.get(&NormalizedName::new("eli kroupi")), Some(&[0usize][..]));
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let index = NameIndex::build(&records(), "nickname");
        assert!(index.is_empty());
    }
}

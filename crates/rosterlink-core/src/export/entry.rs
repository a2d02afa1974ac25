//! Stored entries

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{IdentityKey, IdentityPolicy};
use crate::normalize::display_name;
use crate::record::RawRecord;
use crate::resolve::Link;

/// One linked entity as persisted in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub key: IdentityKey,
    /// Record name in display form
    pub display_name: String,
    /// Query name that produced the link
    pub source_name: String,
    /// Stage label
    pub stage: String,
    pub record: RawRecord,
}

impl LinkRecord {
    pub fn from_link<S: AsRef<str>>(link: &Link, policy: &IdentityPolicy, name_fields: &[S]) -> Self {
        let display = link
            .record
            .display_label(name_fields)
            .unwrap_or_else(|| display_name(&link.query));
        Self {
            key: policy.key_for(&link.record),
            display_name: display,
            source_name: link.query.clone(),
            stage: link.stage.clone(),
            record: link.record.clone(),
        }
    }
}

/// Anything found in a store file.
///
/// Entries written by older tooling are bare records or arbitrary values;
/// they are kept as they are and still take part in duplicate detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Link(LinkRecord),
    Legacy(RawRecord),
    Opaque(Value),
}

impl StoredEntry {
    pub fn from_value(value: Value) -> Self {
        if let Ok(link) = LinkRecord::deserialize(&value) {
            return StoredEntry::Link(link);
        }
        match value {
            Value::Object(fields) => StoredEntry::Legacy(RawRecord::new(fields)),
            other => StoredEntry::Opaque(other),
        }
    }

    pub fn key(&self, policy: &IdentityPolicy) -> IdentityKey {
        match self {
            StoredEntry::Link(link) => link.key.clone(),
            StoredEntry::Legacy(record) => policy.key_for(record),
            StoredEntry::Opaque(value) => IdentityKey::Content(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link() -> Link {
        Link {
            query: "Hwang Hee-Chan".to_string(),
            stage: "fuzzy".to_string(),
            record_index: 0,
            record: RawRecord::from_value(json!({"id": 9, "display_name": "Hee-chan Hwang"}))
                .unwrap(),
            score: Some(100.0),
        }
    }

    #[test]
    fn test_link_record_from_link() {
        let record = LinkRecord::from_link(&link(), &IdentityPolicy::default(), &["display_name"]);
        assert_eq!(record.key, IdentityKey::ApiId(json!(9)));
        assert_eq!(record.display_name, "Hee-chan Hwang");
        assert_eq!(record.source_name, "Hwang Hee-Chan");
        assert_eq!(record.stage, "fuzzy");
    }

    #[test]
    fn test_stored_entry_variants() {
        let policy = IdentityPolicy::default();
        let stored = LinkRecord::from_link(&link(), &policy, &["display_name"]);
        let value = serde_json::to_value(&stored).unwrap();
        assert!(matches!(StoredEntry::from_value(value), StoredEntry::Link(_)));

        let legacy = StoredEntry::from_value(json!({"id": 9, "name": "Hwang Hee-Chan"}));
        assert!(matches!(legacy, StoredEntry::Legacy(_)));
        assert_eq!(legacy.key(&policy), stored.key);

        let opaque = StoredEntry::from_value(json!("stray"));
        assert_eq!(opaque.key(&policy), IdentityKey::Content("\"stray\"".to_string()));
    }

    #[test]
    fn test_legacy_entry_serializes_verbatim() {
        let value = json!({"id": 3, "name": "Ben Doak"});
        let entry = StoredEntry::from_value(value.clone());
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }
}

//! Identity keys for duplicate detection

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::RawRecord;

/// What makes two stored records the same entity.
///
/// Keys of different kinds never compare equal, so a record keyed by its API
/// id is never a duplicate of one keyed by content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdentityKey {
    /// Upstream API identifier
    ApiId(Value),
    /// Database object id, compared structurally (`{"$oid": "..."}`)
    ObjectId(Value),
    /// Canonical JSON of the whole record
    Content(String),
}

impl IdentityKey {
    pub fn kind(&self) -> &'static str {
        match self {
            IdentityKey::ApiId(_) => "api_id",
            IdentityKey::ObjectId(_) => "object_id",
            IdentityKey::Content(_) => "content",
        }
    }
}

/// Field names consulted, in priority order, when keying a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityPolicy {
    pub api_id_field: String,
    pub object_id_field: String,
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        Self {
            api_id_field: "id".to_string(),
            object_id_field: "_id".to_string(),
        }
    }
}

impl IdentityPolicy {
    /// API id, else object id, else the canonical record content
    pub fn key_for(&self, record: &RawRecord) -> IdentityKey {
        if let Some(id) = record.get(&self.api_id_field) {
            return IdentityKey::ApiId(id.clone());
        }
        if let Some(oid) = record.get(&self.object_id_field) {
            return IdentityKey::ObjectId(oid.clone());
        }
        IdentityKey::Content(record.canonical_json())
    }
}

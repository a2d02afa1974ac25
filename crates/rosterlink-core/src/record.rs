//! Authoritative-source records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::display_name;

/// One authoritative-source entity as loaded from the roster file.
///
/// The core only reads named fields; it never mutates a record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value, if it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Field value, treating `null` as absent
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Non-empty string field
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// First present name among `fields`
    pub fn first_text<'a, S: AsRef<str>>(&'a self, fields: &[S]) -> Option<&'a str> {
        fields.iter().find_map(|f| self.text(f.as_ref()))
    }

    /// Human-readable label: the first present name field in display form
    pub fn display_label<S: AsRef<str>>(&self, fields: &[S]) -> Option<String> {
        self.first_text(fields).map(display_name)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Compact JSON with keys in sorted order.
    ///
    /// serde_json's default map is ordered, so two records with the same
    /// fields and values always produce the same string.
    pub fn canonical_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

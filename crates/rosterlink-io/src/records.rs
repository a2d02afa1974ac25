//! Authoritative roster files

use std::path::Path;

use rosterlink_core::RawRecord;
use serde_json::Value;

use crate::reader::{read_json, IoError, IoResult};

/// Records from a JSON roster file
pub fn read_records(path: &Path) -> IoResult<Vec<RawRecord>> {
    let records = parse_records(read_json(path)?)?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Records from a parsed roster document.
///
/// An array yields one record per object element; other elements are
/// skipped. A lone object is a one-record roster.
pub fn parse_records(document: Value) -> IoResult<Vec<RawRecord>> {
    match document {
        Value::Array(items) => {
            let total = items.len();
            let records: Vec<RawRecord> =
                items.into_iter().filter_map(RawRecord::from_value).collect();
            if records.len() < total {
                tracing::warn!(
                    skipped = total - records.len(),
                    "roster entries that are not objects"
                );
            }
            Ok(records)
        }
        Value::Object(fields) => Ok(vec![RawRecord::new(fields)]),
        other => Err(IoError::InvalidFormat(format!(
            "expected an array of records, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skips_non_objects() {
        let records = parse_records(json!([{"id": 1}, 2, null, {"id": 3}])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("id"), Some(&json!(3)));
    }

    #[test]
    fn test_single_object() {
        let records = parse_records(json!({"id": 1, "name": "Igor Julio"})).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        let err = parse_records(json!("players")).unwrap_err();
        assert!(err.to_string().contains("a string"));
    }
}

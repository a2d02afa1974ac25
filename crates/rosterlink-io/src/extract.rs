//! Name extraction from source documents
//!
//! The betting feed is an array whose first element holds `events`; each
//! event lists `futures` (markets), and each market lists `runners`:
//!
//! ```text
//! [ { "events": [ { "futures": [ { "marketType": "...", "runners": [ { "runnerName": "..." } ] } ] } ] } ]
//! ```

use std::collections::HashSet;

use rosterlink_core::{display_name, RawRecord};
use serde_json::Value;

/// Market whose runners are the players in the feed
pub const SHOTS_MARKET: &str = "PLAYER_TO_HAVE_1_OR_MORE_SHOTS";

/// Runner names of every `market` future, in feed order, without repeats.
///
/// Missing or mistyped levels of the feed are skipped. A feed that is a
/// single object rather than an array is read as the first element.
pub fn runner_names(feed: &Value, market: &str) -> Vec<String> {
    let root = match feed {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(feed),
        _ => None,
    };

    let mut seen = HashSet::new();
    let mut names = Vec::new();

    let futures = root
        .and_then(|r| r.get("events"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|event| event.get("futures").and_then(Value::as_array))
        .flatten()
        .filter(|future| future.get("marketType").and_then(Value::as_str) == Some(market));

    for future in futures {
        let runners = future
            .get("runners")
            .and_then(Value::as_array)
            .into_iter()
            .flatten();
        for runner in runners {
            let Some(name) = runner.get("runnerName").and_then(Value::as_str) else {
                continue;
            };
            let name = name.trim();
            if !name.is_empty() && seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
    }

    tracing::debug!(market, count = names.len(), "extracted runner names");
    names
}

/// First present name field of each record, in display form
pub fn display_names<S: AsRef<str>>(records: &[RawRecord], name_fields: &[S]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.first_text(name_fields))
        .map(display_name)
        .collect()
}

/// Raw value of `field` for each record that has it
pub fn field_values(records: &[RawRecord], field: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.text(field))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed() -> Value {
        json!([{
            "events": [
                {
                    "futures": [
                        {
                            "marketType": "PLAYER_TO_HAVE_1_OR_MORE_SHOTS",
                            "runners": [
                                {"runnerName": "Hee-chan Hwang"},
                                {"runnerName": "Ben Gannon-Doak"},
                                {"selectionId": 3}
                            ]
                        },
                        {
                            "marketType": "MATCH_ODDS",
                            "runners": [{"runnerName": "Wolves"}]
                        }
                    ]
                },
                {
                    "futures": [
                        {
                            "marketType": "PLAYER_TO_HAVE_1_OR_MORE_SHOTS",
                            "runners": [
                                {"runnerName": "Hee-chan Hwang"},
                                {"runnerName": " Eli Junior Kroupi "}
                            ]
                        }
                    ]
                },
                {"name": "event without markets"}
            ]
        }])
    }

    #[test]
    fn test_runner_names_for_market() {
        assert_eq!(
            runner_names(&feed(), SHOTS_MARKET),
            vec!["Hee-chan Hwang", "Ben Gannon-Doak", "Eli Junior Kroupi"]
        );
        assert_eq!(runner_names(&feed(), "MATCH_ODDS"), vec!["Wolves"]);
    }

    #[test]
    fn test_runner_names_tolerates_bad_shapes() {
        assert!(runner_names(&json!([]), SHOTS_MARKET).is_empty());
        assert!(runner_names(&json!("feed"), SHOTS_MARKET).is_empty());
        assert!(runner_names(&json!([{"events": {}}]), SHOTS_MARKET).is_empty());

        let object_feed = feed().as_array().unwrap()[0].clone();
        assert_eq!(runner_names(&object_feed, SHOTS_MARKET).len(), 3);
    }

    fn roster() -> Vec<RawRecord> {
        vec![
            json!({"display_name": "Martin Ødegaard", "name": "Martin Odegaard"}),
            json!({"display_name": "", "name": "Kerem Aktürkoğlu"}),
            json!({"name": null}),
        ]
        .into_iter()
        .filter_map(RawRecord::from_value)
        .collect()
    }

    #[test]
    fn test_display_names() {
        assert_eq!(
            display_names(&roster(), &["display_name", "name"]),
            vec!["Martin Odegaard", "Kerem Akturkoglu"]
        );
    }

    #[test]
    fn test_field_values_skip_missing() {
        assert_eq!(
            field_values(&roster(), "name"),
            vec!["Martin Odegaard", "Kerem Aktürkoğlu"]
        );
    }
}

//! Test fixture loading utilities

use std::path::PathBuf;

use rosterlink_core::RawRecord;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Authoritative roster used across the integration tests
pub fn roster() -> Vec<RawRecord> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&load_fixture("roster.json")).expect("roster fixture is valid JSON");
    values.into_iter().filter_map(RawRecord::from_value).collect()
}

/// Owned query list
#[allow(dead_code)]
pub fn queries(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

//! Configuration for rosterlink-core
//!
//! Centralized configuration for the matching thresholds, score weights,
//! the stage list, record field names, identity-key policy and export
//! behaviour. Every section has defaults, so a config file only needs the
//! keys it overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::IdentityPolicy;

/// Tolerance used when checking that the weights sum to one
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Pipeline-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Fuzzy matching parameters
    pub matching: MatchingConfig,
    /// Field names on the authoritative records
    pub records: RecordFields,
    /// Duplicate detection for the export store
    pub identity: IdentityPolicy,
    /// Export store settings
    pub export: ExportConfig,
    /// Ordered resolution stages
    pub stages: Vec<StageSpec>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            records: RecordFields::default(),
            identity: IdentityPolicy::default(),
            export: ExportConfig::default(),
            stages: vec![
                StageSpec::exact("display_name"),
                StageSpec::exact("name"),
                StageSpec::Fuzzy,
            ],
        }
    }
}

/// Fuzzy matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum composite score (0-100) for a fuzzy match to be accepted
    pub threshold: f64,
    /// Weights of the three similarity signals
    pub weights: ScoreWeights,
    /// Credit family-name-first spellings ("Hwang Hee-Chan") as a surname match
    pub reversed_name_order: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: 70.0,
            weights: ScoreWeights::default(),
            reversed_name_order: true,
        }
    }
}

/// Weights of the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub surname: f64,
    pub token_overlap: f64,
    pub fuzzy: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            surname: 0.40,
            token_overlap: 0.35,
            fuzzy: 0.25,
        }
    }
}

impl ScoreWeights {
    pub fn new(surname: f64, token_overlap: f64, fuzzy: f64) -> Self {
        Self {
            surname,
            token_overlap,
            fuzzy,
        }
    }

    pub fn sum(&self) -> f64 {
        self.surname + self.token_overlap + self.fuzzy
    }

    /// Each weight must lie in [0, 1] and together they must sum to 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("surname", self.surname),
            ("token_overlap", self.token_overlap),
            ("fuzzy", self.fuzzy),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightOutOfRange { name, value });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }

        Ok(())
    }
}

/// Name-bearing fields on the authoritative records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFields {
    /// Fields that carry a player name, in preference order.
    ///
    /// The first present field labels a record; all of them are indexed
    /// when a fuzzy match is resolved back to a record.
    pub name_fields: Vec<String>,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            name_fields: vec!["display_name".to_string(), "name".to_string()],
        }
    }
}

/// Export store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// JSON file holding the linked records
    pub store_path: PathBuf,
    /// Report what would be exported without touching the store
    pub dry_run: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("output_files/linked_players.json"),
            dry_run: false,
        }
    }
}

/// One resolution stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageSpec {
    /// Exact match of normalized names against one record field
    Exact { field: String },
    /// Blocked, scored, greedy fuzzy match against the remaining pool
    Fuzzy,
}

impl StageSpec {
    pub fn exact(field: impl Into<String>) -> Self {
        StageSpec::Exact {
            field: field.into(),
        }
    }

    /// Label used in reports and on exported links
    pub fn label(&self) -> String {
        match self {
            StageSpec::Exact { field } => format!("exact:{}", field),
            StageSpec::Fuzzy => "fuzzy".to_string(),
        }
    }
}

impl RosterConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Name fields that exact stages index, followed by the record name fields,
    /// without duplicates
    pub fn indexed_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        let stage_fields = self.stages.iter().filter_map(|stage| match stage {
            StageSpec::Exact { field } => Some(field),
            StageSpec::Fuzzy => None,
        });
        for field in stage_fields.chain(self.records.name_fields.iter()) {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        fields
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.matching.threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }

        self.matching.weights.validate()?;

        if self.stages.is_empty() {
            return Err(ConfigError::NoStages);
        }

        for stage in &self.stages {
            if let StageSpec::Exact { field } = stage {
                if field.trim().is_empty() {
                    return Err(ConfigError::MissingField("stages.field".to_string()));
                }
            }
        }

        if self.records.name_fields.iter().all(|f| f.trim().is_empty()) {
            return Err(ConfigError::MissingField("records.name_fields".to_string()));
        }

        if self.identity.api_id_field.trim().is_empty() {
            return Err(ConfigError::MissingField("identity.api_id_field".to_string()));
        }

        if self.identity.object_id_field.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "identity.object_id_field".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Threshold outside the score domain
    #[error("threshold {0} is outside [0, 100]")]
    ThresholdOutOfRange(f64),

    /// A single weight outside [0, 1]
    #[error("weight {name} = {value} is outside [0, 1]")]
    WeightOutOfRange { name: &'static str, value: f64 },

    /// Weights do not sum to one
    #[error("weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    /// Empty stage list
    #[error("at least one resolution stage is required")]
    NoStages,

    /// Required field is missing or blank
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    Parse(String),
}

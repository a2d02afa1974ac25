//! Error types for rosterlink-core

use thiserror::Error;

pub use crate::config::ConfigError;

/// Result type alias for rosterlink operations
pub type Result<T> = std::result::Result<T, RosterError>;

/// Main error type for rosterlink operations
#[derive(Error, Debug)]
pub enum RosterError {
    /// Configuration rejected before the run started
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Export store could not be written
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Export store errors
///
/// Only writes can fail. A store that cannot be read is treated as empty.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure while writing or removing the store
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },

    /// Entries could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

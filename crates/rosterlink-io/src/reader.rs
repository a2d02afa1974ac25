//! Error type and shared file helpers

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Read a whole UTF-8 file
pub(crate) fn read_text(path: &Path) -> IoResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IoError::FileNotFound(path.display().to_string()),
        _ => IoError::OpenFailed(format!("{}: {}", path.display(), e)),
    })
}

/// Read and parse a JSON document
pub fn read_json(path: &Path) -> IoResult<Value> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .map_err(|e| IoError::InvalidFormat(format!("{}: {}", path.display(), e)))
}

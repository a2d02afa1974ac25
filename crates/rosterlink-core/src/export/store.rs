//! File-backed export store
//!
//! The store is one JSON array. It is read in full before every export and
//! rewritten in full after every addition, so repeated runs never store the
//! same identity key twice.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use super::{IdentityKey, IdentityPolicy, LinkRecord, StoredEntry};
use crate::error::StoreError;

/// Outcome of a batch export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExportSummary {
    /// Links written, or that would be written in a dry run
    pub added: usize,
    /// Links whose identity key was already stored
    pub skipped: usize,
    pub dry_run: bool,
}

/// Append-only JSON store of linked records
#[derive(Debug, Clone)]
pub struct ExportStore {
    path: PathBuf,
    policy: IdentityPolicy,
}

impl ExportStore {
    pub fn new(path: impl Into<PathBuf>, policy: IdentityPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &IdentityPolicy {
        &self.policy
    }

    /// Current entries.
    ///
    /// A missing, empty, unreadable or malformed file reads as an empty store.
    /// A top-level value that is not an array is read as a single entry.
    pub fn load(&self) -> Vec<StoredEntry> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "store unreadable, treating as empty");
                return Vec::new();
            }
        };

        if text.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items.into_iter().map(StoredEntry::from_value).collect(),
            Ok(other) => vec![StoredEntry::from_value(other)],
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "store is not valid JSON, treating as empty");
                Vec::new()
            }
        }
    }

    /// Identity keys of every stored entry, in file order
    pub fn keys(&self) -> Vec<IdentityKey> {
        self.load().iter().map(|e| e.key(&self.policy)).collect()
    }

    pub fn contains_key(&self, key: &IdentityKey) -> bool {
        self.keys().iter().any(|k| k == key)
    }

    /// Add `link` unless its identity key is already stored.
    ///
    /// Returns whether the link was (or, with `dry_run`, would be) added. A dry
    /// run performs the same duplicate check and never touches the file.
    pub fn export(&self, link: &LinkRecord, dry_run: bool) -> Result<bool, StoreError> {
        let mut entries = self.load();
        if entries.iter().any(|e| e.key(&self.policy) == link.key) {
            tracing::debug!(name = %link.display_name, key = link.key.kind(), "already stored");
            return Ok(false);
        }

        if dry_run {
            tracing::info!(name = %link.display_name, "would export");
            return Ok(true);
        }

        entries.push(StoredEntry::Link(link.clone()));
        self.write(&entries)?;
        tracing::info!(name = %link.display_name, path = %self.path.display(), "exported");
        Ok(true)
    }

    /// Export `links` in order.
    ///
    /// A dry run also skips links duplicated within the batch, matching what a
    /// live run would have written.
    pub fn export_all(&self, links: &[LinkRecord], dry_run: bool) -> Result<ExportSummary, StoreError> {
        let mut summary = ExportSummary {
            dry_run,
            ..ExportSummary::default()
        };

        if dry_run {
            let mut keys = self.keys();
            for link in links {
                if keys.contains(&link.key) {
                    summary.skipped += 1;
                } else {
                    tracing::info!(name = %link.display_name, "would export");
                    keys.push(link.key.clone());
                    summary.added += 1;
                }
            }
            return Ok(summary);
        }

        for link in links {
            if self.export(link, false)? {
                summary.added += 1;
            } else {
                summary.skipped += 1;
            }
        }
        Ok(summary)
    }

    /// Delete the store file. Returns whether there was one.
    pub fn reset(&self) -> Result<bool, StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "store reset");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StoreError::io(&self.path, err)),
        }
    }

    /// Replace the file contents through a sibling temp file
    fn write(&self, entries: &[StoredEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        entries.serialize(&mut ser)?;
        buf.push(b'\n');

        let tmp = self.temp_path();
        fs::write(&tmp, &buf).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

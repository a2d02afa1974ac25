//! Idempotent export of linked records

mod entry;
mod identity;
mod store;

pub use entry::{LinkRecord, StoredEntry};
pub use identity::{IdentityKey, IdentityPolicy};
pub use store::{ExportStore, ExportSummary};

//! # scholar-storage
//!
//! MetadataStore: SQLite persistence for paper records with work-queue
//! semantics (lease, commit, recover) plus per-source sync cursors.
//! One mutexed write connection carries every mutation and queue claim;
//! a WAL read pool serves lookups.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::MetadataStore;

use scholar_core::errors::StorageError;
use scholar_core::ScholarError;

/// Map a low-level SQLite failure message into the storage error domain.
pub(crate) fn to_storage_err(message: impl Into<String>) -> ScholarError {
    StorageError::SqliteError {
        message: message.into(),
    }
    .into()
}

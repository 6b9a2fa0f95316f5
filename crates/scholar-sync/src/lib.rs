//! # scholar-sync
//!
//! Pulls paper metadata from configured providers into the relational
//! store. Providers stream rows with progress; the engine batches them
//! into upsert transactions, filters by category, and advances a
//! per-source incremental cursor so the next run only processes newer
//! records.

pub mod engine;
pub mod providers;

pub use engine::SyncEngine;
pub use providers::{FetchProgress, MetadataFetchResult, MetadataProvider};

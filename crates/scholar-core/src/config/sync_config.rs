use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Metadata-provider selection. Closed set: every variant has exactly one
/// implementation, mapped by the sync crate's factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetadataProviderConfig {
    /// A local JSONL metadata dump (one paper per line).
    JsonDump { path: PathBuf },
}

/// Sync subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Providers to pull from, in order.
    pub providers: Vec<MetadataProviderConfig>,
    /// Records per upsert transaction.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// When non-empty, only papers whose category set intersects this
    /// filter are kept.
    #[serde(default)]
    pub filter_categories: BTreeSet<String>,
}

fn default_batch_size() -> usize {
    defaults::DEFAULT_SYNC_BATCH_SIZE
}

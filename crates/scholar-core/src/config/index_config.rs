use serde::{Deserialize, Serialize};

use super::defaults;

/// Index subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Records leased and embedded per batch.
    pub batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::DEFAULT_INDEX_BATCH_SIZE,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// Vector index connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexConfig {
    /// Base URL of the vector index REST endpoint.
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    defaults::DEFAULT_VECTOR_TIMEOUT_SECS
}

//! Metadata providers: closed set, one variant per config variant.

mod json_dump;

use chrono::{DateTime, Utc};

use scholar_core::config::MetadataProviderConfig;
use scholar_core::{PaperMetadata, ScholarResult};

pub use json_dump::JsonDumpProvider;

/// One streamed row. `metadata` is `None` when the provider consumed a
/// row without emitting it (already synced); `progress` still advances
/// so callers can display accurate totals.
pub struct FetchProgress {
    pub metadata: Option<PaperMetadata>,
    /// Absolute progress in provider-defined units (bytes for dumps).
    pub progress: u64,
}

/// A provider fetch: the progress total plus the row stream.
pub struct MetadataFetchResult {
    pub total_progress: u64,
    pub stream: Box<dyn Iterator<Item = ScholarResult<FetchProgress>> + Send>,
}

/// Closed provider set. Adding a provider means adding a config variant,
/// a provider type, and an arm here.
pub enum MetadataProvider {
    JsonDump(JsonDumpProvider),
}

impl MetadataProvider {
    pub fn from_config(config: &MetadataProviderConfig) -> Self {
        match config {
            MetadataProviderConfig::JsonDump { path } => {
                Self::JsonDump(JsonDumpProvider::new(path.clone()))
            }
        }
    }

    /// The source name this provider feeds; keys the sync cursor and the
    /// fqn prefix of every record it emits.
    pub fn provides_source(&self) -> &'static str {
        match self {
            Self::JsonDump(p) => p.provides_source(),
        }
    }

    /// Open the stream. Rows older than `since` are consumed but not
    /// emitted.
    pub fn fetch_metadata(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> ScholarResult<MetadataFetchResult> {
        match self {
            Self::JsonDump(p) => p.fetch_metadata(since),
        }
    }
}

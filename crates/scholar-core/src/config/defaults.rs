//! Default values shared by the config structs.

/// Records accumulated per upsert transaction during sync.
pub const DEFAULT_SYNC_BATCH_SIZE: usize = 500;

/// Records leased per indexing batch.
pub const DEFAULT_INDEX_BATCH_SIZE: usize = 64;

/// Candidate pre-fetch multiplier for fusion retrieval
/// (`limit * prefetch_factor` candidates per vector space).
pub const DEFAULT_PREFETCH_FACTOR: usize = 5;

/// Weight of the log-scaled citation boost in the composite score.
pub const DEFAULT_CITATION_BOOST_WEIGHT: f64 = 0.1;

/// Maximum ids per citation-provider chunk.
pub const DEFAULT_CITATION_MAX_BATCH_SIZE: usize = 500;

/// Attempts per citation chunk before the request fails.
pub const CITATION_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for the exponential citation retry backoff.
pub const CITATION_BACKOFF_BASE_MS: u64 = 250;

/// HTTP timeout for vector index calls.
pub const DEFAULT_VECTOR_TIMEOUT_SECS: u64 = 30;

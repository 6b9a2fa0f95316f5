//! Error taxonomy: one enum per subsystem, wrapped by [`ScholarError`].

mod citation_error;
mod config_error;
mod embedding_error;
mod search_error;
mod storage_error;
mod sync_error;
mod vector_index_error;

pub use citation_error::CitationError;
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use search_error::SearchError;
pub use storage_error::StorageError;
pub use sync_error::SyncError;
pub use vector_index_error::VectorIndexError;

/// Top-level error for all scholar subsystems.
#[derive(Debug, thiserror::Error)]
pub enum ScholarError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    VectorIndex(#[from] VectorIndexError),

    #[error(transparent)]
    Citation(#[from] CitationError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias used across the workspace.
pub type ScholarResult<T> = Result<T, ScholarError>;

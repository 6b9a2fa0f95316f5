/// Embedding and reranking model errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("model inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("failed to load model '{name}': {reason}")]
    ModelLoadFailed { name: String, reason: String },

    #[error("embedder returned {actual} vectors for {expected} documents")]
    BatchMisaligned { expected: usize, actual: usize },
}

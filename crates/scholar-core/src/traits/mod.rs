//! Collaborator traits for the black-box scoring models.

mod embedding;
mod reranker;

pub use embedding::IEmbeddingProvider;
pub use reranker::IReranker;

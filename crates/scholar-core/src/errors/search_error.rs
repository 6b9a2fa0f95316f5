/// Request-scoped retrieval pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("reranker returned {actual} scores for {expected} documents")]
    RerankMisaligned { expected: usize, actual: usize },
}

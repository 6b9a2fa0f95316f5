//! # scholar-retrieval
//!
//! The query-time pipeline: embed the query, pull fused dense+sparse
//! candidates from the vector index, hydrate full metadata from the
//! relational store, rerank with the cross-encoder, and boost by
//! log-scaled citation counts.

pub mod citations;
pub mod engine;
pub mod scoring;

pub use citations::CitationProvider;
pub use engine::{SearchPipeline, SearchRequest, SearchResponse};
pub use scoring::ScoredPaper;

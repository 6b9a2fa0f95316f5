//! # scholar-vector
//!
//! The vector-index collaborator seam. One collection per paper source,
//! three named vector spaces per point: a cosine dense space plus two
//! IDF-weighted sparse spaces encoded server-side from raw text by a
//! named sparse model. The index's internal storage and ANN algorithms
//! are its own business; this crate only speaks the contract.

pub mod client;
pub mod types;

pub use client::HttpVectorIndex;
pub use types::{FusionQuery, PaperPoint, PointPayload, ScoredPointId};

use scholar_core::ScholarResult;

/// Named vector space holding the dense document embedding.
pub const DENSE_SPACE: &str = "metadata/dense";
/// Named sparse space over paper titles.
pub const SPARSE_TITLE_SPACE: &str = "title/sparse";
/// Named sparse space over paper abstracts. Fusion queries use this side.
pub const SPARSE_ABSTRACT_SPACE: &str = "abstract/sparse";
/// Server-side sparse term-weighting model, referenced by name.
pub const SPARSE_MODEL: &str = "Qdrant/bm25";

/// The vector index contract. Implementations must be safe for
/// concurrent use; engines hold them behind shared references.
pub trait IVectorIndex: Send + Sync {
    fn collection_exists(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = ScholarResult<bool>> + Send;

    /// Create a collection with the three named spaces, dimensioning the
    /// dense space to `dense_dim`.
    fn create_collection(
        &self,
        collection: &str,
        dense_dim: usize,
    ) -> impl std::future::Future<Output = ScholarResult<()>> + Send;

    /// Upsert points. Point ids are caller-provided and deterministic, so
    /// re-upserting a paper overwrites its previous entry.
    fn upsert_points(
        &self,
        collection: &str,
        points: &[PaperPoint],
    ) -> impl std::future::Future<Output = ScholarResult<()>> + Send;

    /// One fusion query: dense and sparse prefetches merged by a
    /// distribution-based rank-fusion rule, returning fused candidate
    /// fqns with fusion scores. Only the fqn payload field travels back.
    fn query_fusion(
        &self,
        collection: &str,
        query: &FusionQuery,
    ) -> impl std::future::Future<Output = ScholarResult<Vec<ScoredPointId>>> + Send;
}

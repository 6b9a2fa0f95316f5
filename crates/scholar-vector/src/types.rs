//! Wire DTOs for the vector index contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scholar_core::PaperMetadata;

/// One point to upsert: a paper across the three named vector spaces.
#[derive(Debug, Clone)]
pub struct PaperPoint {
    pub id: Uuid,
    /// Dense document embedding.
    pub dense: Vec<f32>,
    /// Raw title, sparse-encoded server-side.
    pub sparse_title: String,
    /// Raw abstract, sparse-encoded server-side.
    pub sparse_abstract: String,
    pub payload: PointPayload,
}

/// Point payload stored alongside the vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPayload {
    pub title: String,
    pub n_versions: usize,
    pub journal_ref: Option<String>,
    pub fully_qualified_name: String,
    pub updated_at: DateTime<Utc>,
    pub categories: Vec<String>,
}

impl PointPayload {
    pub fn from_metadata(meta: &PaperMetadata) -> Self {
        Self {
            title: meta.title.clone(),
            n_versions: meta.versions.len(),
            journal_ref: meta.journal_ref.clone(),
            fully_qualified_name: meta.fqn(),
            updated_at: meta.updated_at,
            categories: meta.categories.iter().cloned().collect(),
        }
    }
}

/// A hybrid retrieval request: both sides pre-fetch `prefetch_limit`
/// candidates, the fused list is cut at `limit`.
#[derive(Debug, Clone)]
pub struct FusionQuery {
    /// Raw query text for the sparse side.
    pub query_text: String,
    /// Dense query embedding.
    pub query_vector: Vec<f32>,
    pub prefetch_limit: usize,
    pub limit: usize,
}

/// A fused candidate: the paper's fqn and its fusion score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPointId {
    pub fqn: String,
    pub score: f32,
}

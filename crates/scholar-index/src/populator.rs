//! Builds points from paper batches and keeps the target collection
//! provisioned.

use std::collections::HashMap;

use uuid::Uuid;

use scholar_core::errors::{ConfigError, EmbeddingError};
use scholar_core::{PaperMetadata, ScholarResult};
use scholar_vector::{IVectorIndex, PaperPoint, PointPayload};

/// Deterministic point id: UUIDv5 over the paper's fqn. Re-indexing the
/// same paper always lands on the same point.
pub fn point_id(meta: &PaperMetadata) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, meta.fqn().as_bytes())
}

/// Upserts paper batches into per-source collections, creating each
/// collection lazily from the first batch's embedding width.
pub struct CollectionPopulator<'a, V: IVectorIndex> {
    index: &'a V,
    /// Collections confirmed to exist, with their dense dimension.
    provisioned: HashMap<String, usize>,
}

impl<'a, V: IVectorIndex> CollectionPopulator<'a, V> {
    pub fn new(index: &'a V) -> Self {
        Self {
            index,
            provisioned: HashMap::new(),
        }
    }

    async fn ensure_collection(&mut self, collection: &str, dense_dim: usize) -> ScholarResult<()> {
        if let Some(&known_dim) = self.provisioned.get(collection) {
            if known_dim != dense_dim {
                return Err(ConfigError::DimensionMismatch {
                    collection: collection.to_string(),
                    expected: known_dim,
                    actual: dense_dim,
                }
                .into());
            }
            return Ok(());
        }

        if !self.index.collection_exists(collection).await? {
            self.index.create_collection(collection, dense_dim).await?;
        }
        self.provisioned.insert(collection.to_string(), dense_dim);
        Ok(())
    }

    /// Upsert one batch. The collection is the batch's source; all
    /// papers in a batch share it. The vector slice must be one-to-one
    /// with the papers: a short or over-long embedding batch is an
    /// error, never a silent truncation, since the caller marks every
    /// paper indexed afterwards.
    pub async fn upsert_batch(
        &mut self,
        papers: &[PaperMetadata],
        dense_vectors: &[Vec<f32>],
    ) -> ScholarResult<()> {
        if papers.len() != dense_vectors.len() {
            return Err(EmbeddingError::BatchMisaligned {
                expected: papers.len(),
                actual: dense_vectors.len(),
            }
            .into());
        }
        let Some(first_vector) = dense_vectors.first() else {
            return Ok(());
        };
        let collection = papers[0].source.clone();
        self.ensure_collection(&collection, first_vector.len()).await?;

        let points: Vec<PaperPoint> = papers
            .iter()
            .zip(dense_vectors)
            .map(|(meta, dense)| PaperPoint {
                id: point_id(meta),
                dense: dense.clone(),
                sparse_title: meta.title.clone(),
                sparse_abstract: meta.abstract_text.clone(),
                payload: PointPayload::from_metadata(meta),
            })
            .collect();

        self.index.upsert_points(&collection, &points).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn paper(id: &str) -> PaperMetadata {
        PaperMetadata {
            source: "arxiv".into(),
            id: id.into(),
            authors: "A".into(),
            title: format!("Paper {id}"),
            doi: None,
            license: None,
            abstract_text: "abs".into(),
            categories: BTreeSet::new(),
            journal_ref: None,
            updated_at: Utc::now(),
            versions: vec![],
        }
    }

    #[test]
    fn point_ids_are_deterministic_and_distinct_per_paper() {
        let a = paper("2401.00001");
        let b = paper("2401.00002");
        assert_eq!(point_id(&a), point_id(&a));
        assert_ne!(point_id(&a), point_id(&b));
    }
}

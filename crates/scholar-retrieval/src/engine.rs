//! The search pipeline.

use std::time::Instant;

use scholar_core::config::SearchConfig;
use scholar_core::errors::SearchError;
use scholar_core::templates::{EncodingTemplate, RerankTemplate};
use scholar_core::traits::{IEmbeddingProvider, IReranker};
use scholar_core::ScholarResult;
use scholar_storage::MetadataStore;
use scholar_vector::{FusionQuery, IVectorIndex};

use crate::citations::CitationProvider;
use crate::scoring::{self, ScoredPaper};

#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Collection to search, named after the paper source.
    pub collection: String,
    pub query: String,
    pub limit: usize,
}

pub struct SearchResponse {
    pub results: Vec<ScoredPaper>,
    pub time_taken_seconds: f64,
}

pub struct SearchPipeline<'a, E: IEmbeddingProvider, R: IReranker, V: IVectorIndex> {
    store: &'a MetadataStore,
    embedder: &'a E,
    reranker: &'a R,
    vector_index: &'a V,
    citations: CitationProvider,
    encoding_template: EncodingTemplate,
    rerank_template: RerankTemplate,
    config: SearchConfig,
}

impl<'a, E: IEmbeddingProvider, R: IReranker, V: IVectorIndex> SearchPipeline<'a, E, R, V> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: &'a MetadataStore,
        embedder: &'a E,
        reranker: &'a R,
        vector_index: &'a V,
        citations: CitationProvider,
        encoding_template: EncodingTemplate,
        rerank_template: RerankTemplate,
        config: SearchConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            reranker,
            vector_index,
            citations,
            encoding_template,
            rerank_template,
            config,
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> ScholarResult<SearchResponse> {
        let started = Instant::now();

        // The dense side sees the templated query; the sparse side the
        // raw text.
        let query_vector = self
            .embedder
            .embed(&self.encoding_template.template_query(&request.query))?;

        let prefetch_limit = request.limit * self.config.prefetch_factor;
        let candidates = self
            .vector_index
            .query_fusion(
                &request.collection,
                &FusionQuery {
                    query_text: request.query.clone(),
                    query_vector,
                    prefetch_limit,
                    limit: prefetch_limit,
                },
            )
            .await?;
        tracing::debug!(candidates = candidates.len(), "fusion retrieval done");

        // Stale index entries without a backing row drop out here.
        let fqns: Vec<String> = candidates.into_iter().map(|c| c.fqn).collect();
        let papers = self.store.get_by_ids(&fqns)?;
        if papers.is_empty() {
            return Ok(SearchResponse {
                results: Vec::new(),
                time_taken_seconds: started.elapsed().as_secs_f64(),
            });
        }

        let hydrated_fqns: Vec<String> = papers.iter().map(|p| p.fqn()).collect();
        let citation_counts = self.citations.citation_counts(&hydrated_fqns).await?;

        let prompts: Vec<String> = papers
            .iter()
            .map(|paper| self.rerank_template.format(&request.query, paper))
            .collect();
        let semantic_scores = self.reranker.score_batch(&prompts)?;
        if semantic_scores.len() != papers.len() {
            return Err(SearchError::RerankMisaligned {
                expected: papers.len(),
                actual: semantic_scores.len(),
            }
            .into());
        }

        let results = scoring::rank(
            papers,
            &semantic_scores,
            &citation_counts,
            self.config.citation_boost_weight,
            request.limit,
        );

        Ok(SearchResponse {
            results,
            time_taken_seconds: started.elapsed().as_secs_f64(),
        })
    }
}

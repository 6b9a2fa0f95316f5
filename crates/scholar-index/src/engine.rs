//! Index engine: the lease/embed/upsert/commit loop.

use indicatif::{ProgressBar, ProgressStyle};

use scholar_core::config::IndexConfig;
use scholar_core::templates::EncodingTemplate;
use scholar_core::traits::IEmbeddingProvider;
use scholar_core::ScholarResult;
use scholar_storage::MetadataStore;
use scholar_vector::IVectorIndex;

use crate::populator::CollectionPopulator;

/// Drains the indexing backlog. Exactly one engine may run against a
/// store at a time: the startup sweep below recovers leases from any
/// previous crashed run, and would steal in-flight leases from a live
/// sibling.
pub struct IndexEngine<'a, E: IEmbeddingProvider, V: IVectorIndex> {
    store: &'a MetadataStore,
    embedder: &'a E,
    vector_index: &'a V,
    template: EncodingTemplate,
    batch_size: usize,
}

impl<'a, E: IEmbeddingProvider, V: IVectorIndex> IndexEngine<'a, E, V> {
    pub fn new(
        store: &'a MetadataStore,
        embedder: &'a E,
        vector_index: &'a V,
        template: EncodingTemplate,
        config: &IndexConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            vector_index,
            template,
            batch_size: config.batch_size,
        }
    }

    /// Run until the backlog is empty. Any failure aborts mid-run and
    /// leaves the current lease reserved; the next run's sweep requeues
    /// it. Vector upserts land before the store commit, so a crash
    /// between the two only re-indexes (idempotent point ids).
    pub async fn run(&self) -> ScholarResult<u64> {
        let recovered = self.store.clear_all_reservations()?;
        if recovered > 0 {
            tracing::warn!(recovered, "requeued reservations from an interrupted run");
        }

        let backlog = self.store.estimate_backlog()?;
        tracing::info!(backlog, "indexing starting");
        let pbar = progress_bar(backlog);

        let mut populator = CollectionPopulator::new(self.vector_index);
        let mut indexed: u64 = 0;

        loop {
            let papers = self.store.lease_batch(self.batch_size)?;
            if papers.is_empty() {
                break;
            }

            let documents: Vec<String> = papers
                .iter()
                .map(|meta| self.template.template_document(meta))
                .collect();
            let dense_vectors = self.embedder.embed_batch(&documents)?;

            populator.upsert_batch(&papers, &dense_vectors).await?;
            self.store.mark_indexed(&papers)?;

            indexed += papers.len() as u64;
            pbar.inc(papers.len() as u64);
        }

        pbar.finish();
        tracing::info!(indexed, "indexing finished");
        Ok(indexed)
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let pbar = ProgressBar::new(total);
    pbar.set_style(
        ProgressStyle::default_bar()
            .template("Indexing [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pbar
}

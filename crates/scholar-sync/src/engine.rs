//! Sync engine: streams provider rows into batched upserts and advances
//! the per-source cursor.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use scholar_core::config::SyncConfig;
use scholar_core::{PaperMetadata, ScholarResult};
use scholar_storage::MetadataStore;

use crate::providers::MetadataProvider;

pub struct SyncEngine<'a> {
    store: &'a MetadataStore,
    providers: Vec<MetadataProvider>,
    filter_categories: BTreeSet<String>,
    batch_size: usize,
}

impl<'a> SyncEngine<'a> {
    pub fn new(store: &'a MetadataStore, config: &SyncConfig) -> Self {
        Self {
            store,
            providers: config
                .providers
                .iter()
                .map(MetadataProvider::from_config)
                .collect(),
            filter_categories: config.filter_categories.clone(),
            batch_size: config.batch_size,
        }
    }

    /// Sync every configured provider, in order. A provider failure
    /// aborts the run; already-committed batches stay committed and the
    /// untouched cursor makes the next run re-cover the gap.
    pub fn sync(&self) -> ScholarResult<()> {
        for provider in &self.providers {
            self.sync_provider(provider)?;
        }
        Ok(())
    }

    fn sync_provider(&self, provider: &MetadataProvider) -> ScholarResult<()> {
        let source = provider.provides_source();
        let since = self.store.last_synced_for(source)?;
        tracing::info!(source, ?since, "sync starting");

        let fetch = provider.fetch_metadata(since)?;
        let pbar = progress_bar(source, fetch.total_progress);

        let mut batch: Vec<PaperMetadata> = Vec::with_capacity(self.batch_size);
        let mut new_cursor: Option<DateTime<Utc>> = None;
        let mut total_records: u64 = 0;

        for row in fetch.stream {
            let row = row?;
            pbar.set_position(row.progress);

            let Some(meta) = row.metadata else { continue };

            if !self.filter_categories.is_empty()
                && meta.categories.is_disjoint(&self.filter_categories)
            {
                continue;
            }

            if new_cursor.map_or(true, |cursor| meta.updated_at > cursor) {
                new_cursor = Some(meta.updated_at);
            }

            batch.push(meta);
            if batch.len() >= self.batch_size {
                total_records += self.store.upsert_batch(&batch)? as u64;
                batch.clear();
            }
        }
        if !batch.is_empty() {
            total_records += self.store.upsert_batch(&batch)? as u64;
        }
        pbar.finish();

        // No records means nothing to advance past; leave the cursor
        // alone rather than overwriting it with nothing.
        if let Some(cursor) = new_cursor {
            self.store.set_last_synced(source, Some(cursor))?;
        }

        tracing::info!(source, total_records, ?new_cursor, "sync finished");
        Ok(())
    }
}

fn progress_bar(source: &str, total: u64) -> ProgressBar {
    let pbar = ProgressBar::new(total);
    pbar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pbar.set_message(source.to_string());
    pbar
}

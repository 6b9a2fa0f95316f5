//! MetadataStore owns the SQLite connections and exposes the work-queue
//! and sync-cursor contracts. Each operation runs in its own transaction;
//! the indexing pipeline as a whole is deliberately not atomic.

use std::path::Path;

use chrono::{DateTime, Utc};

use scholar_core::{PaperMetadata, ScholarResult};

use crate::migrations;
use crate::pool::{ReadPool, WriteConnection};
use crate::queries;

/// Readers opened for file-backed stores.
const READ_POOL_SIZE: usize = 4;

/// The paper-record store. All mutations and queue claims go through the
/// single write connection, which is what makes concurrent leases
/// non-overlapping.
pub struct MetadataStore {
    writer: WriteConnection,
    /// `None` for in-memory stores, whose reads route through the writer
    /// since every in-memory connection is its own isolated database.
    readers: Option<ReadPool>,
}

impl MetadataStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> ScholarResult<Self> {
        let writer = WriteConnection::open(path)?;
        writer.with_conn_sync(migrations::run_migrations)?;
        // Readers open after the writer so the database file and its WAL
        // already exist.
        let readers = Some(ReadPool::open(path, READ_POOL_SIZE)?);
        Ok(Self { writer, readers })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> ScholarResult<Self> {
        let writer = WriteConnection::open_in_memory()?;
        writer.with_conn_sync(migrations::run_migrations)?;
        Ok(Self {
            writer,
            readers: None,
        })
    }

    fn with_reader<F, T>(&self, f: F) -> ScholarResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> ScholarResult<T>,
    {
        match &self.readers {
            Some(pool) => pool.with_conn(f),
            None => self.writer.with_conn_sync(f),
        }
    }

    // --- work queue -------------------------------------------------------

    /// Idempotent merge of provider records; re-queues on conflict.
    pub fn upsert_batch(&self, papers: &[PaperMetadata]) -> ScholarResult<usize> {
        self.writer.with_conn_sync(|conn| queries::paper_queue::upsert_batch(conn, papers))
    }

    /// Claim up to `batch_size` eligible records, shortest abstracts first.
    /// Empty means the backlog is exhausted.
    pub fn lease_batch(&self, batch_size: usize) -> ScholarResult<Vec<PaperMetadata>> {
        self.writer.with_conn_sync(|conn| queries::paper_queue::lease_batch(conn, batch_size))
    }

    /// Commit a processed batch: sets `indexed_at`, clears the reservation.
    pub fn mark_indexed(&self, papers: &[PaperMetadata]) -> ScholarResult<usize> {
        self.writer.with_conn_sync(|conn| queries::paper_queue::mark_indexed(conn, papers))
    }

    /// Release every reservation unconditionally. The sole recovery
    /// mechanism for leases leaked by a crashed run.
    pub fn clear_all_reservations(&self) -> ScholarResult<usize> {
        self.writer.with_conn_sync(queries::paper_queue::clear_all_reservations)
    }

    /// Approximate count of eligible rows, for progress reporting.
    pub fn estimate_backlog(&self) -> ScholarResult<u64> {
        self.with_reader(queries::paper_queue::estimate_backlog)
    }

    /// Hydrate records by fqn; input order preserved, missing ids dropped.
    pub fn get_by_ids(&self, fqns: &[String]) -> ScholarResult<Vec<PaperMetadata>> {
        self.with_reader(|conn| queries::paper_queue::get_by_ids(conn, fqns))
    }

    // --- sync cursors -----------------------------------------------------

    pub fn last_synced_for(&self, source: &str) -> ScholarResult<Option<DateTime<Utc>>> {
        self.with_reader(|conn| queries::sync_state::last_synced_for(conn, source))
    }

    pub fn set_last_synced(
        &self,
        source: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> ScholarResult<()> {
        self.writer
            .with_conn_sync(|conn| queries::sync_state::set_last_synced(conn, source, timestamp))
    }
}

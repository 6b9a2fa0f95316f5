//! v001: paper_records plus the partial queue index.

use rusqlite::Connection;

use scholar_core::ScholarResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ScholarResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS paper_records (
            fqn                   TEXT PRIMARY KEY,
            paper_metadata        TEXT NOT NULL,
            abstract_len          INTEGER NOT NULL,
            synced_at             TEXT NOT NULL,
            indexed_at            TEXT,
            indexing_reserved_at  TEXT
        );

        -- Queue scans only touch rows that are neither indexed nor
        -- reserved; the partial index keeps claims cheap as the table grows.
        CREATE INDEX IF NOT EXISTS idx_paper_queue
            ON paper_records(abstract_len)
            WHERE indexed_at IS NULL AND indexing_reserved_at IS NULL;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

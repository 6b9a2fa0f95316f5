//! v002: sync_state, one cursor row per metadata source.

use rusqlite::Connection;

use scholar_core::ScholarResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ScholarResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sync_state (
            source          TEXT PRIMARY KEY,
            last_synced_at  TEXT
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

//! Per-source sync cursors.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use scholar_core::ScholarResult;

use crate::to_storage_err;

/// The cursor for a source, or `None` when the source has never synced
/// (or is flagged for a full resync).
pub fn last_synced_for(conn: &Connection, source: &str) -> ScholarResult<Option<DateTime<Utc>>> {
    let stored: Option<Option<String>> = conn
        .query_row(
            "SELECT last_synced_at FROM sync_state WHERE source = ?1",
            params![source],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match stored.flatten() {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(&raw)
                .map_err(|e| to_storage_err(format!("bad cursor for '{source}': {e}")))?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
        None => Ok(None),
    }
}

/// Atomically overwrite (or create) the cursor row for a source.
pub fn set_last_synced(
    conn: &Connection,
    source: &str,
    timestamp: Option<DateTime<Utc>>,
) -> ScholarResult<()> {
    conn.execute(
        "INSERT INTO sync_state (source, last_synced_at) VALUES (?1, ?2)
         ON CONFLICT(source) DO UPDATE SET last_synced_at = excluded.last_synced_at",
        params![source, timestamp.map(|t| t.to_rfc3339())],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

//! Versioned schema migrations, run in order when the store opens.

use rusqlite::{params, Connection};

use scholar_core::errors::StorageError;
use scholar_core::ScholarResult;

use crate::to_storage_err;

mod v001_paper_records;
mod v002_sync_state;

type MigrationFn = fn(&Connection) -> ScholarResult<()>;

const MIGRATIONS: [(u32, MigrationFn); 2] = [
    (1, v001_paper_records::migrate),
    (2, v002_sync_state::migrate),
];

/// Apply every migration newer than the stored schema version.
pub fn run_migrations(conn: &Connection) -> ScholarResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current: u32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
            row.get(0)
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if version <= current {
            continue;
        }
        migrate(conn).map_err(|e| {
            scholar_core::ScholarError::from(StorageError::MigrationFailed {
                version,
                reason: e.to_string(),
            })
        })?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::debug!(version, "applied migration");
    }
    Ok(())
}

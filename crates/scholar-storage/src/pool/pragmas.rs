//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode so readers are never blocked by the writer, NORMAL sync,
//! 5s busy_timeout, foreign_keys ON.

use rusqlite::Connection;

use scholar_core::ScholarResult;

use crate::to_storage_err;

/// Apply write-side pragmas to a connection.
pub fn apply_pragmas(conn: &Connection) -> ScholarResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Apply read-side pragmas: same as the writer plus query_only, so a read
/// connection can never mutate even by accident.
pub fn apply_read_pragmas(conn: &Connection) -> ScholarResult<()> {
    apply_pragmas(conn)?;
    conn.execute_batch("PRAGMA query_only = ON;")
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

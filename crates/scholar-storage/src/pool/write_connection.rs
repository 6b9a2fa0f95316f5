//! The single write connection. Every mutation and queue claim funnels
//! through it, so claims serialize: two concurrent lease calls can never
//! reserve the same rows.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use scholar_core::ScholarResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// The mutexed write connection.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the write connection for the given database path.
    pub fn open(path: &Path) -> ScholarResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory write connection (for testing).
    pub fn open_in_memory() -> ScholarResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure while holding the write connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> ScholarResult<T>
    where
        F: FnOnce(&Connection) -> ScholarResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("write connection lock poisoned: {e}")))?;
        f(&guard)
    }
}

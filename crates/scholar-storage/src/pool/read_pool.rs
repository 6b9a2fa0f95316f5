//! Read-only connections for lookups. Readers are never blocked by the
//! writer thanks to WAL; only file-backed stores get a pool, since each
//! in-memory connection would be its own database.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use scholar_core::ScholarResult;

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

/// Read-only SQLite connections for concurrent lookups.
///
/// Acquisition prefers whichever connection is free right now and only
/// blocks, round-robin, when every reader is busy.
pub struct ReadPool {
    readers: Vec<Mutex<Connection>>,
    fallback: AtomicUsize,
}

fn open_reader(path: &Path) -> ScholarResult<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    apply_read_pragmas(&conn)?;
    Ok(conn)
}

impl ReadPool {
    /// Open `size` read-only connections to the database file. At least
    /// one reader is always opened.
    pub fn open(path: &Path, size: usize) -> ScholarResult<Self> {
        let readers = (0..size.max(1))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<ScholarResult<Vec<_>>>()?;
        Ok(Self {
            readers,
            fallback: AtomicUsize::new(0),
        })
    }

    /// Run a query on a reader: the first idle connection if any, else
    /// block on the next one in rotation.
    pub fn with_conn<F, T>(&self, f: F) -> ScholarResult<T>
    where
        F: FnOnce(&Connection) -> ScholarResult<T>,
    {
        for reader in &self.readers {
            if let Ok(conn) = reader.try_lock() {
                return f(&conn);
            }
        }
        let idx = self.fallback.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|e| to_storage_err(format!("read pool lock poisoned: {e}")))?;
        f(&conn)
    }
}

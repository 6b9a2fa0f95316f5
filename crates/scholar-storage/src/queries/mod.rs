//! SQL query modules. Every public function here runs inside its own
//! transaction on the connection it is given.

pub mod paper_queue;
pub mod sync_state;

/// SQLite's default host-parameter limit is 999; chunk `IN (...)` lists
/// well below it.
pub(crate) const MAX_SQL_PARAMS: usize = 500;

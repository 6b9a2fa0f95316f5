//! SQLite connections: one mutexed writer, optional read-only readers.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

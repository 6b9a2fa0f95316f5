/// Sync-engine errors: provider feeds and row parsing.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to read feed '{path}': {message}")]
    FeedIo { path: String, message: String },

    #[error("malformed feed row: {reason}")]
    MalformedRow { reason: String },
}

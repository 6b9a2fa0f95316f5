/// Vector-index collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum VectorIndexError {
    #[error("vector index transport failure: {message}")]
    Transport { message: String },

    #[error("vector index returned status {status}: {message}")]
    BadStatus { status: u16, message: String },

    #[error("unexpected vector index response: {reason}")]
    BadResponse { reason: String },
}

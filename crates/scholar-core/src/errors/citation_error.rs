/// Citation-provider errors. Transport failures are retried with bounded
/// exponential backoff before [`CitationError::RetriesExhausted`] surfaces.
#[derive(Debug, thiserror::Error)]
pub enum CitationError {
    #[error("citation lookup transport failure: {message}")]
    Transport { message: String },

    #[error("citation lookup failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    #[error("malformed citation response: {reason}")]
    MalformedResponse { reason: String },
}

use crate::errors::ScholarResult;

/// Dense embedding provider. Calls block the calling pipeline until the
/// model returns.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    fn embed(&self, text: &str) -> ScholarResult<Vec<f32>>;

    /// Embed a batch of texts, one vector per input, order-aligned.
    fn embed_batch(&self, texts: &[String]) -> ScholarResult<Vec<Vec<f32>>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

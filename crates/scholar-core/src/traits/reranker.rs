use crate::errors::ScholarResult;

/// Cross-encoder reranking provider. Scores fully-rendered
/// (query, document) prompts; one score per prompt, order-aligned with
/// the input. Calls block the calling pipeline until the model returns.
pub trait IReranker: Send + Sync {
    fn score_batch(&self, prompts: &[String]) -> ScholarResult<Vec<f32>>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

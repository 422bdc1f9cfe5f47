use crate::domain::{errors::RagError, Embedding};
use async_trait::async_trait;

/// Maps text to fixed-length vectors under one configured model.
///
/// Implementations must be deterministic for a fixed model and input, and
/// `embed_batch` must return vectors in the same order as the input texts.
/// An unreachable backend surfaces as `RagError::ServiceUnavailable`.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, RagError>;
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, RagError>;
    fn model(&self) -> &str;
    fn dimension(&self) -> usize;
}

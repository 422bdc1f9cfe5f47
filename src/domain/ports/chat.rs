use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::domain::errors::RagError;

/// Lazy sequence of text increments from the language model. The stream ends
/// when the model signals completion; a consumer that wants to stop early can
/// simply stop polling.
pub type AnswerStream = Pin<Box<dyn Stream<Item = Result<String, RagError>> + Send>>;

/// Streams an answer conditioned on a system instruction.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn stream_answer(&self, system: &str, prompt: &str) -> Result<AnswerStream, RagError>;
}

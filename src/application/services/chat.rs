use std::sync::Arc;

use futures::stream;
use tracing::instrument;

use crate::domain::ports::{AnswerStream, ChatModel};
use crate::domain::{Message, RagError};
use crate::infrastructure::index::VectorIndex;

/// Fixed reply streamed when no knowledge base has been built yet.
pub const EMPTY_INDEX_REPLY: &str =
    "Please add documents to the knowledge base before asking questions.";

const CONTEXT_SEPARATOR: &str = "\n\n";

/// Query-path orchestration: retrieve context, then stream the answer.
pub struct ChatService {
    chat: Arc<dyn ChatModel>,
    top_k: usize,
}

impl ChatService {
    pub fn new(chat: Arc<dyn ChatModel>, top_k: usize) -> Self {
        Self { chat, top_k }
    }

    /// Streams an answer to `question` grounded in the retrieved context.
    /// With no index, yields exactly one fixed prompt-the-user increment.
    /// Retrieval and generation errors are delivered through the stream
    /// rather than wrapped here.
    #[instrument(skip(self, history, index))]
    pub async fn answer(
        &self,
        question: &str,
        history: &[Message],
        index: Option<&VectorIndex>,
    ) -> AnswerStream {
        let Some(index) = index else {
            return fixed_reply(EMPTY_INDEX_REPLY);
        };

        let results = match index.search(question, self.top_k).await {
            Ok(results) => results,
            Err(err) => return failed(err),
        };

        let context = results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        let system = format!("Answer using only this context:\n{context}");
        let prompt = build_prompt(question, history);

        match self.chat.stream_answer(&system, &prompt).await {
            Ok(stream) => stream,
            Err(err) => failed(err),
        }
    }
}

fn build_prompt(question: &str, history: &[Message]) -> String {
    if history.is_empty() {
        return question.to_string();
    }

    let transcript = history
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!("Previous conversation:\n{transcript}\n\nCurrent message from user: {question}")
}

fn fixed_reply(text: &str) -> AnswerStream {
    Box::pin(stream::iter(vec![Ok(text.to_string())]))
}

fn failed(err: RagError) -> AnswerStream {
    Box::pin(stream::iter(vec![Err(err)]))
}

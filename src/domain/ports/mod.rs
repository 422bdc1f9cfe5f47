mod chat;
mod embedding;

pub use chat::{AnswerStream, ChatModel};
pub use embedding::EmbeddingService;

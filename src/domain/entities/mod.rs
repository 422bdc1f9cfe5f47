mod chunk;
mod conversation;
mod document;
mod embedding;

pub use chunk::{Chunker, DocumentChunk, SearchResult};
pub use conversation::{Conversation, Message, MessageRole};
pub use document::{Document, SourceMetadata};
pub use embedding::Embedding;

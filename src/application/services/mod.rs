mod chat;
mod indexing;

pub use chat::{ChatService, EMPTY_INDEX_REPLY};
pub use indexing::IndexingService;

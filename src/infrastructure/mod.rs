pub mod config;
pub mod embedding;
pub mod index;
pub mod llm;
pub mod loader;

pub use config::Config;
pub use embedding::OllamaEmbedding;
pub use index::{IndexTrust, VectorIndex};
pub use llm::OllamaChat;
pub use loader::{DocumentLoader, SourceKind};

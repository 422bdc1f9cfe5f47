mod ollama;

pub use ollama::OllamaChat;

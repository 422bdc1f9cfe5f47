use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::errors::{RagError, Result};

pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_LLM_MODEL: &str = "gemma3:1b";
pub const DEFAULT_USER_AGENT: &str = "ragchat/0.1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub chunking: ChunkingConfig,
    pub user_agent: String,
    pub top_k: usize,
    pub index_dir: Option<PathBuf>,
    pub trust_saved_index: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig {
                model: DEFAULT_EMBEDDING_MODEL.to_string(),
                dimension: 768,
            },
            llm: LlmConfig {
                model: DEFAULT_LLM_MODEL.to_string(),
                temperature: 0.3,
            },
            chunking: ChunkingConfig {
                chunk_size: 1000,
                chunk_overlap: 100,
            },
            user_agent: DEFAULT_USER_AGENT.to_string(),
            top_k: 4,
            index_dir: None,
            trust_saved_index: false,
        }
    }
}

impl Config {
    /// Reads configuration from the environment, falling back to defaults for
    /// anything unset. Call `dotenvy::dotenv()` beforehand to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            embedding: EmbeddingConfig {
                model: env_or("EMBEDDING_MODEL", defaults.embedding.model),
                dimension: parse_env("EMBEDDING_DIMENSION", defaults.embedding.dimension)?,
            },
            llm: LlmConfig {
                model: env_or("LLM_MODEL", defaults.llm.model),
                temperature: parse_env("LLM_TEMPERATURE", defaults.llm.temperature)?,
            },
            chunking: ChunkingConfig {
                chunk_size: parse_env("CHUNK_SIZE", defaults.chunking.chunk_size)?,
                chunk_overlap: parse_env("CHUNK_OVERLAP", defaults.chunking.chunk_overlap)?,
            },
            user_agent: env_or("USER_AGENT", defaults.user_agent),
            top_k: parse_env("TOP_K", defaults.top_k)?,
            index_dir: std::env::var("INDEX_DIR").ok().map(PathBuf::from),
            trust_saved_index: parse_env("INDEX_TRUSTED", defaults.trust_saved_index)?,
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| RagError::invalid_config(format!("{key} has unparseable value {raw:?}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_models() {
        let config = Config::default();
        assert_eq!(config.embedding.model, "nomic-embed-text");
        assert_eq!(config.llm.model, "gemma3:1b");
        assert_eq!(config.top_k, 4);
        assert!(config.chunking.chunk_overlap < config.chunking.chunk_size);
        assert!(!config.trust_saved_index);
    }
}

use async_trait::async_trait;
use rig::client::{EmbeddingsClient, Nothing, ProviderClient};
use rig::embeddings::EmbeddingsBuilder;
use rig::providers::ollama;

use crate::domain::{ports::EmbeddingService, Embedding, RagError};
use crate::infrastructure::config::{EmbeddingConfig, DEFAULT_EMBEDDING_MODEL};

/// Embedding adapter backed by a locally running Ollama instance.
pub struct OllamaEmbedding {
    model: String,
    dimension: usize,
}

impl OllamaEmbedding {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimension: 768,
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            model: config.model.clone(),
            dimension: config.dimension,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for OllamaEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, RagError> {
        let embeddings = self.embed_batch(&[text]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagError::internal("no embedding returned"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let client = ollama::Client::from_val(Nothing);
        let model = client.embedding_model(&self.model);

        let mut builder = EmbeddingsBuilder::new(model);
        for text in texts {
            builder = builder
                .document(text.to_string())
                .map_err(|e| RagError::service_unavailable(e.to_string()))?;
        }

        let embeddings = builder
            .build()
            .await
            .map_err(|e| RagError::service_unavailable(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(RagError::internal(format!(
                "embedding count mismatch: {} texts, {} vectors",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings
            .into_iter()
            .map(|(_doc, emb)| Embedding::from_f64(emb.first().vec))
            .collect())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

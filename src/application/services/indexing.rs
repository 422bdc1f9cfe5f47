use std::sync::Arc;
use tracing::instrument;

use crate::domain::ports::EmbeddingService;
use crate::domain::Chunker;
use crate::infrastructure::index::VectorIndex;
use crate::infrastructure::loader::DocumentLoader;

/// Build-path orchestration: load, chunk, embed, index.
pub struct IndexingService {
    loader: DocumentLoader,
    chunker: Chunker,
    embedding: Arc<dyn EmbeddingService>,
}

impl IndexingService {
    pub fn new(loader: DocumentLoader, chunker: Chunker, embedding: Arc<dyn EmbeddingService>) -> Self {
        Self {
            loader,
            chunker,
            embedding,
        }
    }

    /// Builds a fresh index over the given locations. Every failure is folded
    /// into the returned status message; this never returns an error and the
    /// index is `None` whenever anything went wrong.
    #[instrument(skip(self, locations), fields(count = locations.len()))]
    pub async fn build_index(&self, locations: &[String]) -> (String, Option<VectorIndex>) {
        if locations.is_empty() {
            return (
                "No files provided. Add documents before building the knowledge base.".to_string(),
                None,
            );
        }

        let documents = self.loader.load(locations).await;
        if documents.is_empty() {
            return (
                "None of the provided sources could be loaded.".to_string(),
                None,
            );
        }

        let chunks = self.chunker.split_all(&documents);

        match VectorIndex::build(chunks, self.embedding.clone()).await {
            Ok(index) => (
                format!(
                    "Indexed {} file(s) into {} chunk(s).",
                    locations.len(),
                    index.len()
                ),
                Some(index),
            ),
            Err(err) => (format!("Indexing failed: {err}"), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Embedding, RagError};
    use async_trait::async_trait;

    struct FixedEmbedding;

    #[async_trait]
    impl EmbeddingService for FixedEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, RagError> {
            Ok(Embedding::new(vec![text.len() as f32, 1.0]))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, RagError> {
            Ok(texts
                .iter()
                .map(|t| Embedding::new(vec![t.len() as f32, 1.0]))
                .collect())
        }

        fn model(&self) -> &str {
            "fixed"
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct DownEmbedding;

    #[async_trait]
    impl EmbeddingService for DownEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, RagError> {
            Err(RagError::service_unavailable("backend offline"))
        }

        async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Embedding>, RagError> {
            Err(RagError::service_unavailable("backend offline"))
        }

        fn model(&self) -> &str {
            "down"
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn service(embedding: Arc<dyn EmbeddingService>) -> IndexingService {
        IndexingService::new(
            DocumentLoader::new("test-agent/1.0").unwrap(),
            Chunker::new(1000, 100).unwrap(),
            embedding,
        )
    }

    #[tokio::test]
    async fn test_empty_input_yields_status_and_no_index() {
        let (status, index) = service(Arc::new(FixedEmbedding)).build_index(&[]).await;
        assert!(status.to_lowercase().contains("no files"));
        assert!(index.is_none());
    }

    #[tokio::test]
    async fn test_unloadable_sources_yield_status_and_no_index() {
        let (status, index) = service(Arc::new(FixedEmbedding))
            .build_index(&["missing.txt".to_string()])
            .await;
        assert!(status.contains("could be loaded"));
        assert!(index.is_none());
    }

    #[tokio::test]
    async fn test_successful_build_reports_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "The sky is blue.").unwrap();

        let (status, index) = service(Arc::new(FixedEmbedding))
            .build_index(&[path.to_string_lossy().into_owned()])
            .await;

        assert!(status.contains("Indexed 1 file(s)"));
        let index = index.unwrap();
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_folded_into_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "some content").unwrap();

        let (status, index) = service(Arc::new(DownEmbedding))
            .build_index(&[path.to_string_lossy().into_owned()])
            .await;

        assert!(status.contains("Indexing failed"));
        assert!(index.is_none());
    }
}

//! In-memory similarity index over embedded chunks, with explicit opt-in
//! persistence. Built once per ingestion, read-only afterwards.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::domain::errors::{RagError, Result};
use crate::domain::ports::EmbeddingService;
use crate::domain::{DocumentChunk, Embedding, SearchResult};

const SNAPSHOT_FILE: &str = "index.json";

/// Whether the caller has independently verified where a persisted index came
/// from. Loading deserializes stored data, so `Unverified` archives are
/// refused outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexTrust {
    Trusted,
    Unverified,
}

#[derive(Serialize, Deserialize)]
struct IndexSnapshot {
    model: String,
    dimension: usize,
    entries: Vec<IndexEntry>,
}

#[derive(Serialize, Deserialize)]
struct IndexEntry {
    chunk: DocumentChunk,
    vector: Embedding,
}

/// Similarity-searchable collection of (vector, chunk) pairs.
///
/// Queries must be embedded with the same model the index was built with;
/// this is an invariant of the caller, not a runtime check. There is no
/// append operation: new documents mean a full rebuild.
pub struct VectorIndex {
    entries: Vec<(Embedding, DocumentChunk)>,
    model: String,
    dimension: usize,
    embedding: Arc<dyn EmbeddingService>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("entries", &self.entries.len())
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl VectorIndex {
    /// Embeds every chunk and builds the index in one bulk operation.
    #[instrument(skip_all, fields(chunks = chunks.len()))]
    pub async fn build(
        chunks: Vec<DocumentChunk>,
        embedding: Arc<dyn EmbeddingService>,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RagError::empty_input("no chunks to index"));
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let vectors = embedding.embed_batch(&texts).await?;

        let dimension = vectors[0].dimension();
        if vectors.iter().any(|v| v.dimension() != dimension) {
            return Err(RagError::internal(
                "embedding backend returned vectors of mixed dimensionality",
            ));
        }

        let entries = vectors.into_iter().zip(chunks).collect();
        Ok(Self {
            entries,
            model: embedding.model().to_string(),
            dimension,
            embedding,
        })
    }

    /// Returns up to `k` chunks, most similar first. An index with fewer than
    /// `k` entries returns all of them.
    #[instrument(skip(self), fields(entries = self.entries.len()))]
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_vector = self.embedding.embed(query).await?;

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|(vector, chunk)| SearchResult {
                chunk: chunk.clone(),
                score: query_vector.cosine_similarity(vector),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Writes the index snapshot into `dir`, creating the directory as
    /// needed. Round-trips through `load`.
    #[instrument(skip(self))]
    pub async fn save(&self, dir: &Path) -> Result<()> {
        let snapshot = IndexSnapshot {
            model: self.model.clone(),
            dimension: self.dimension,
            entries: self
                .entries
                .iter()
                .map(|(vector, chunk)| IndexEntry {
                    chunk: chunk.clone(),
                    vector: vector.clone(),
                })
                .collect(),
        };

        let bytes = serde_json::to_vec(&snapshot)
            .map_err(|e| RagError::internal(format!("failed to serialize index: {e}")))?;

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| RagError::internal(format!("failed to create {}: {e}", dir.display())))?;
        tokio::fs::write(dir.join(SNAPSHOT_FILE), bytes)
            .await
            .map_err(|e| RagError::internal(format!("failed to write index: {e}")))?;
        Ok(())
    }

    /// Restores a saved index. The caller must assert the snapshot's origin
    /// via `trust`; `Unverified` is refused before any file is read.
    #[instrument(skip(embedding))]
    pub async fn load(
        dir: &Path,
        embedding: Arc<dyn EmbeddingService>,
        trust: IndexTrust,
    ) -> Result<Self> {
        if trust == IndexTrust::Unverified {
            return Err(RagError::trusted_source_required(dir.display().to_string()));
        }

        let path = dir.join(SNAPSHOT_FILE);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| RagError::internal(format!("failed to read {}: {e}", path.display())))?;
        let snapshot: IndexSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| RagError::internal(format!("corrupt index snapshot: {e}")))?;

        if snapshot
            .entries
            .iter()
            .any(|e| e.vector.dimension() != snapshot.dimension)
        {
            return Err(RagError::internal(
                "corrupt index snapshot: entry dimension differs from manifest",
            ));
        }

        if snapshot.model != embedding.model() {
            warn!(
                saved = %snapshot.model,
                current = %embedding.model(),
                "index was built with a different embedding model; search quality is undefined"
            );
        }

        Ok(Self {
            entries: snapshot
                .entries
                .into_iter()
                .map(|e| (e.vector, e.chunk))
                .collect(),
            model: snapshot.model,
            dimension: snapshot.dimension,
            embedding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chunker, Document, SourceMetadata};
    use async_trait::async_trait;

    /// Deterministic stand-in embedder: counts of 'a', 'b', 'c' in the text.
    struct LetterCounts;

    fn count_vector(text: &str) -> Embedding {
        let count = |ch| text.chars().filter(|&c| c == ch).count() as f32;
        Embedding::new(vec![count('a'), count('b'), count('c')])
    }

    #[async_trait]
    impl EmbeddingService for LetterCounts {
        async fn embed(&self, text: &str) -> std::result::Result<Embedding, RagError> {
            Ok(count_vector(text))
        }

        async fn embed_batch(
            &self,
            texts: &[&str],
        ) -> std::result::Result<Vec<Embedding>, RagError> {
            Ok(texts.iter().map(|t| count_vector(t)).collect())
        }

        fn model(&self) -> &str {
            "letter-counts"
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    fn chunk(content: &str) -> DocumentChunk {
        DocumentChunk::new(
            uuid::Uuid::new_v4(),
            content,
            0,
            SourceMetadata::new("test.txt"),
        )
    }

    #[tokio::test]
    async fn test_build_rejects_empty_chunk_set() {
        let err = VectorIndex::build(Vec::new(), Arc::new(LetterCounts))
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::EmptyInput(_)));
    }

    #[tokio::test]
    async fn test_search_returns_k_most_similar_in_order() {
        let chunks = vec![chunk("bbbb"), chunk("aabb"), chunk("aaaa")];
        let index = VectorIndex::build(chunks, Arc::new(LetterCounts))
            .await
            .unwrap();

        let results = index.search("aaaa", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "aaaa");
        assert_eq!(results[1].chunk.content, "aabb");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_search_with_k_larger_than_index_returns_all() {
        let chunks = vec![chunk("aa"), chunk("bb")];
        let index = VectorIndex::build(chunks, Arc::new(LetterCounts))
            .await
            .unwrap();

        let results = index.search("ab", 10).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_single_document_scenario() {
        let document = Document::new("The sky is blue.", SourceMetadata::new("a.txt"));
        let chunks = Chunker::new(1000, 100).unwrap().split(&document);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "The sky is blue.");

        let index = VectorIndex::build(chunks, Arc::new(LetterCounts))
            .await
            .unwrap();
        let results = index.search("What color is the sky?", 4).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "The sky is blue.");
    }

    #[tokio::test]
    async fn test_save_load_round_trip_preserves_search_results() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = vec![chunk("aaaa"), chunk("abab"), chunk("cccc")];
        let index = VectorIndex::build(chunks, Arc::new(LetterCounts))
            .await
            .unwrap();
        index.save(dir.path()).await.unwrap();

        let restored = VectorIndex::load(dir.path(), Arc::new(LetterCounts), IndexTrust::Trusted)
            .await
            .unwrap();

        assert_eq!(restored.len(), index.len());
        assert_eq!(restored.model(), "letter-counts");

        let before = index.search("aaab", 3).await.unwrap();
        let after = restored.search("aaab", 3).await.unwrap();
        let contents = |rs: &[SearchResult]| {
            rs.iter().map(|r| r.chunk.content.clone()).collect::<Vec<_>>()
        };
        assert_eq!(contents(&before), contents(&after));
    }

    #[tokio::test]
    async fn test_load_refuses_unverified_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = VectorIndex::load(dir.path(), Arc::new(LetterCounts), IndexTrust::Unverified)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::TrustedSourceRequired(_)));
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SNAPSHOT_FILE), b"not json").unwrap();

        let err = VectorIndex::load(dir.path(), Arc::new(LetterCounts), IndexTrust::Trusted)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Internal(_)));
    }
}

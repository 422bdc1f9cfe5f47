use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::document::{Document, SourceMetadata};
use crate::domain::errors::{RagError, Result};

/// Bounded-length fragment of one document, the unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub chunk_index: usize,
    pub metadata: SourceMetadata,
}

impl DocumentChunk {
    pub fn new(
        document_id: Uuid,
        content: impl Into<String>,
        chunk_index: usize,
        metadata: SourceMetadata,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            chunk_index,
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// Splits documents into overlapping fixed-size character windows.
///
/// Every chunk is at most `chunk_size` characters; consecutive chunks of the
/// same document share exactly `chunk_overlap` characters. The final chunk may
/// be shorter than `chunk_size` but always extends past the shared prefix.
/// Chunks never cross document boundaries.
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::invalid_config("chunk size must be positive"));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::invalid_config(format!(
                "chunk overlap {chunk_overlap} must be smaller than chunk size {chunk_size}"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split(&self, document: &Document) -> Vec<DocumentChunk> {
        // Window arithmetic is in characters; map back to byte offsets so
        // slicing stays valid on multi-byte content.
        let starts: Vec<usize> = document.content.char_indices().map(|(i, _)| i).collect();
        let char_count = starts.len();
        if char_count == 0 {
            return Vec::new();
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut index = 0;

        loop {
            let end = (start + self.chunk_size).min(char_count);
            let byte_start = starts[start];
            let byte_end = if end == char_count {
                document.content.len()
            } else {
                starts[end]
            };
            chunks.push(DocumentChunk::new(
                document.id,
                &document.content[byte_start..byte_end],
                index,
                document.metadata.clone(),
            ));

            if end == char_count {
                break;
            }
            start += step;
            index += 1;
        }

        chunks
    }

    pub fn split_all(&self, documents: &[Document]) -> Vec<DocumentChunk> {
        documents.iter().flat_map(|doc| self.split(doc)).collect()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a document came from: the path or URL it was loaded from, plus the
/// page number for paginated formats. Chunks inherit this unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub origin: String,
    pub page: Option<usize>,
}

impl SourceMetadata {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            page: None,
        }
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

/// A unit of loaded content. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub content: String,
    pub metadata: SourceMetadata,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: SourceMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_with_page() {
        let meta = SourceMetadata::new("report.pdf").with_page(3);
        assert_eq!(meta.origin, "report.pdf");
        assert_eq!(meta.page, Some(3));
    }

    #[test]
    fn test_document_keeps_metadata() {
        let doc = Document::new("hello", SourceMetadata::new("notes.txt"));
        assert_eq!(doc.content, "hello");
        assert_eq!(doc.metadata.origin, "notes.txt");
        assert!(doc.metadata.page.is_none());
    }
}

//! Turns heterogeneous input locations (text files, PDFs, URLs) into a
//! uniform sequence of documents. One bad location never fails the batch.

mod html;

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::errors::{RagError, Result};
use crate::domain::{Document, SourceMetadata};

/// How a location will be loaded, decided once up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Pdf,
    Web,
    Unsupported,
}

impl SourceKind {
    pub fn classify(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::Web;
        }
        match Path::new(location).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("md") => {
                Self::Text
            }
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::Unsupported,
        }
    }
}

pub struct DocumentLoader {
    http: reqwest::Client,
}

impl DocumentLoader {
    pub fn new(user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| RagError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Loads every location it can, in input order. Failures are logged and
    /// skipped, so a batch of N locations may yield fewer documents but never
    /// an error.
    pub async fn load(&self, locations: &[String]) -> Vec<Document> {
        let mut documents = Vec::new();
        for location in locations {
            match self.load_one(location).await {
                Ok(mut loaded) => documents.append(&mut loaded),
                Err(err) => warn!(location = %location, error = %err, "skipping source"),
            }
        }
        documents
    }

    async fn load_one(&self, location: &str) -> Result<Vec<Document>> {
        match SourceKind::classify(location) {
            SourceKind::Text => self.load_text(location).await,
            SourceKind::Pdf => self.load_pdf(location).await,
            SourceKind::Web => self.load_web(location).await,
            SourceKind::Unsupported => {
                debug!(location = %location, "unsupported source type, skipping");
                Ok(Vec::new())
            }
        }
    }

    async fn load_text(&self, path: &str) -> Result<Vec<Document>> {
        // read_to_string rejects non-UTF-8 content, which is exactly the
        // decode failure we want to skip rather than abort on.
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RagError::load_failure(path, e.to_string()))?;
        Ok(vec![Document::new(content, SourceMetadata::new(path))])
    }

    async fn load_pdf(&self, path: &str) -> Result<Vec<Document>> {
        let owned = path.to_string();
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_by_pages(&owned)
        })
        .await
        .map_err(|e| RagError::internal(format!("PDF extraction task failed: {e}")))?
        .map_err(|e| RagError::load_failure(path, e.to_string()))?;

        Ok(pages
            .into_iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| Document::new(text, SourceMetadata::new(path).with_page(i + 1)))
            .collect())
    }

    async fn load_web(&self, url: &str) -> Result<Vec<Document>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RagError::load_failure(url, e.to_string()))?
            .error_for_status()
            .map_err(|e| RagError::load_failure(url, e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| RagError::load_failure(url, e.to_string()))?;

        let text = html::extract_text(&body);
        if text.is_empty() {
            return Err(RagError::load_failure(url, "no text content in page"));
        }
        Ok(vec![Document::new(text, SourceMetadata::new(url))])
    }
}

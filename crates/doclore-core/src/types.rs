//! Core domain types for Doclore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for documents.
pub type DocumentId = String;

/// Unique identifier for chunk embeddings.
pub type ChunkId = String;

/// Generate a new unique ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Kind of ingested document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    File,
    Link,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::File => "file",
            DocumentKind::Link => "link",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" => Some(DocumentKind::File),
            "link" => Some(DocumentKind::Link),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing status of a document.
///
/// A document is created in `Processing` once its raw text has been
/// acquired, moves to `Completed` after every chunk is embedded and
/// persisted, and to `Failed` if any later stage errors out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "processing" => Some(DocumentStatus::Processing),
            "completed" => Some(DocumentStatus::Completed),
            "failed" => Some(DocumentStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ingested document in the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub title: String,
    /// Origin locator: blob URL for files, page URL for links.
    pub source: Option<String>,
    /// Truncated preview of the extracted text.
    pub content: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(kind: DocumentKind, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            kind,
            title: title.into(),
            source: None,
            content: None,
            file_size: None,
            mime_type: None,
            status: DocumentStatus::Processing,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_file_size(mut self, size: i64) -> Self {
        self.file_size = Some(size);
        self
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }
}

/// An embedded text chunk, the unit of retrieval.
///
/// Created in bulk during one ingestion run and immutable afterwards.
/// Deleted only via cascading document deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkEmbedding {
    pub id: ChunkId,
    pub document_id: DocumentId,
    pub chunk_index: i32,
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: serde_json::Value,
}

impl ChunkEmbedding {
    pub fn new(
        document_id: DocumentId,
        chunk_index: i32,
        content: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: new_id(),
            document_id,
            chunk_index,
            content: content.into(),
            embedding,
            metadata: serde_json::json!({}),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_roundtrip() {
        assert_eq!(DocumentKind::from_str("file"), Some(DocumentKind::File));
        assert_eq!(DocumentKind::from_str("LINK"), Some(DocumentKind::Link));
        assert_eq!(DocumentKind::from_str("pdf"), None);
        assert_eq!(DocumentKind::File.as_str(), "file");
    }

    #[test]
    fn test_document_status_roundtrip() {
        for status in [
            DocumentStatus::Processing,
            DocumentStatus::Completed,
            DocumentStatus::Failed,
        ] {
            assert_eq!(DocumentStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::from_str("done"), None);
    }

    #[test]
    fn test_document_creation() {
        let doc = Document::new(DocumentKind::File, "API Reference")
            .with_source("file:///blobs/abc-api.txt")
            .with_file_size(2048)
            .with_mime_type("text/plain");

        assert_eq!(doc.title, "API Reference");
        assert_eq!(doc.kind, DocumentKind::File);
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert_eq!(doc.file_size, Some(2048));
        assert!(!doc.id.is_empty());
    }

    #[test]
    fn test_chunk_embedding_metadata() {
        let chunk = ChunkEmbedding::new("doc1".to_string(), 2, "some text", vec![0.1, 0.2])
            .with_metadata(serde_json::json!({"chunk_index": 2, "total_chunks": 5}));

        assert_eq!(chunk.chunk_index, 2);
        assert_eq!(chunk.metadata["total_chunks"], 5);
    }
}

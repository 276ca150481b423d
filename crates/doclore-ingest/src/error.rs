//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] doclore_db::DbError),

    #[error("Model service error: {0}")]
    Llm(#[from] doclore_llm::LlmError),

    #[error("Failed to fetch URL {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Could not extract text: {0}")]
    UnextractableContent(String),

    #[error("Blob storage error: {0}")]
    Blob(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

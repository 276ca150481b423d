//! Doclore Ingest - Document ingestion pipeline.
//!
//! This crate provides:
//! - Text sanitization (control-character stripping, whitespace collapsing)
//! - Word-bounded chunking with a hard token ceiling
//! - HTML text extraction for link ingestion
//! - Blob storage for uploaded file bytes
//! - The end-to-end ingestion pipeline: fetch, sanitize, chunk, embed, persist

mod blob;
mod chunker;
mod error;
mod html;
mod pipeline;
mod text;

pub use blob::{BlobStore, LocalBlobStore, StoredBlob};
pub use chunker::{
    enforce_token_limit, ChunkConfig, Chunker, TiktokenCounter, TokenCounter,
};
pub use error::{IngestError, IngestResult};
pub use html::{extract_text, extract_title};
pub use pipeline::{IngestOptions, IngestOutcome, Ingestor};
pub use text::sanitize;

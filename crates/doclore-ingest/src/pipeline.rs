//! The end-to-end ingestion pipeline.

use crate::blob::BlobStore;
use crate::chunker::{enforce_token_limit, ChunkConfig, Chunker, TokenCounter};
use crate::error::{IngestError, IngestResult};
use crate::html;
use crate::text::sanitize;
use doclore_core::{ChunkEmbedding, Document, DocumentKind, DocumentStatus};
use doclore_db::Database;
use doclore_llm::{Embedder, EmbeddingBatcher};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Minimum decoded length for file content to count as extractable.
const MIN_FILE_CHARS: usize = 10;
/// Minimum extracted length for a fetched page to count as extractable.
const MIN_LINK_CHARS: usize = 50;

/// Tunables for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub chunk_config: ChunkConfig,
    /// Hard token ceiling per chunk (embedding model context limit).
    pub max_chunk_tokens: usize,
    /// Chunks per embedding request.
    pub embed_batch_size: usize,
    /// Characters of extracted text stored as the document preview.
    pub preview_chars: usize,
    /// Timeout for fetching link content.
    pub fetch_timeout: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            chunk_config: ChunkConfig::default(),
            max_chunk_tokens: 7500,
            embed_batch_size: 50,
            preview_chars: 10_000,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl IngestOptions {
    /// Build options from processing configuration.
    pub fn from_config(config: &doclore_config::ProcessingConfig) -> Self {
        Self {
            chunk_config: ChunkConfig {
                chunk_size_words: config.chunk_size_words,
                min_chunk_chars: config.min_chunk_chars,
            },
            max_chunk_tokens: config.max_chunk_tokens,
            embed_batch_size: config.embed_batch_size,
            preview_chars: config.preview_chars,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// Result of one successful ingestion run.
#[derive(Debug)]
pub struct IngestOutcome {
    /// The created document, in `completed` status.
    pub document: Document,
    /// Number of chunk embeddings persisted.
    pub chunk_count: usize,
}

/// Orchestrates ingestion: acquire content, sanitize, chunk, enforce
/// token limits, embed in batches, persist.
///
/// Each document is one independent run; multiple runs may execute
/// concurrently as separate tasks. Within a run, embedding batches are
/// strictly sequential.
pub struct Ingestor {
    db: Database,
    embedder: Arc<dyn Embedder>,
    blobs: Arc<dyn BlobStore>,
    tokens: Arc<dyn TokenCounter>,
    options: IngestOptions,
    http: reqwest::Client,
}

impl Ingestor {
    pub fn new(
        db: Database,
        embedder: Arc<dyn Embedder>,
        blobs: Arc<dyn BlobStore>,
        tokens: Arc<dyn TokenCounter>,
        options: IngestOptions,
    ) -> Self {
        Self {
            db,
            embedder,
            blobs,
            tokens,
            options,
            http: reqwest::Client::new(),
        }
    }

    /// Ingest a raw file payload.
    ///
    /// The bytes are decoded as text naively: binary formats are not
    /// interpreted. Content shorter than the extractable minimum fails
    /// before any document row is created.
    pub async fn ingest_file(
        &self,
        file_name: &str,
        bytes: &[u8],
        mime_type: Option<&str>,
    ) -> IngestResult<IngestOutcome> {
        info!("Ingesting file: {} ({} bytes)", file_name, bytes.len());

        let content = sanitize(&String::from_utf8_lossy(bytes));
        if content.chars().count() < MIN_FILE_CHARS {
            return Err(IngestError::UnextractableContent(format!(
                "no readable text in '{}'; ensure the file contains plain text",
                file_name
            )));
        }

        let blob = self.blobs.put(file_name, bytes).await?;

        let mut document = Document::new(DocumentKind::File, file_name)
            .with_source(blob.url)
            .with_content(truncate_chars(&content, self.options.preview_chars))
            .with_file_size(bytes.len() as i64);
        if let Some(mime) = mime_type {
            document = document.with_mime_type(mime);
        }

        self.db.create_document(&document)?;
        self.embed_and_complete(document, &content).await
    }

    /// Ingest the content behind a URL.
    pub async fn ingest_link(&self, url: &str) -> IngestResult<IngestOutcome> {
        info!("Fetching link: {}", url);

        let response = self
            .http
            .get(url)
            .timeout(self.options.fetch_timeout)
            .send()
            .await
            .map_err(|e| IngestError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let body = response.text().await.map_err(|e| IngestError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let title = html::extract_title(&body).unwrap_or_else(|| url.to_string());
        let content = sanitize(&html::extract_text(&body));

        if content.chars().count() < MIN_LINK_CHARS {
            return Err(IngestError::UnextractableContent(format!(
                "no meaningful text at {}; the page may be JavaScript-heavy or require authentication",
                url
            )));
        }

        let document = Document::new(DocumentKind::Link, title)
            .with_source(url)
            .with_content(truncate_chars(&content, self.options.preview_chars));

        self.db.create_document(&document)?;
        self.embed_and_complete(document, &content).await
    }

    /// Shared continuation after the document row exists: chunk, embed,
    /// persist, and mark completed. On any error the document is marked
    /// failed (best effort) and the error is returned.
    async fn embed_and_complete(
        &self,
        mut document: Document,
        content: &str,
    ) -> IngestResult<IngestOutcome> {
        match self.chunk_embed_store(&document, content).await {
            Ok(chunk_count) => {
                self.db
                    .update_document_status(&document.id, DocumentStatus::Completed)?;
                document.status = DocumentStatus::Completed;
                info!(
                    "Ingestion complete: {} ({} chunks)",
                    document.id, chunk_count
                );
                Ok(IngestOutcome {
                    document,
                    chunk_count,
                })
            }
            Err(e) => {
                warn!("Ingestion failed for {}: {}", document.id, e);
                if let Err(update_err) = self
                    .db
                    .update_document_status(&document.id, DocumentStatus::Failed)
                {
                    warn!(
                        "Could not mark document {} as failed: {}",
                        document.id, update_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn chunk_embed_store(&self, document: &Document, content: &str) -> IngestResult<usize> {
        let chunker = Chunker::new(self.options.chunk_config.clone());
        let chunks = chunker.split(content);
        let chunks = enforce_token_limit(chunks, self.options.max_chunk_tokens, self.tokens.as_ref());
        info!("Safe chunk count: {}", chunks.len());

        if chunks.is_empty() {
            return Ok(0);
        }

        let batcher = EmbeddingBatcher::new(self.embedder.as_ref(), self.options.embed_batch_size);
        let embeddings = batcher.embed_all(&chunks).await?;

        let total_chunks = chunks.len();
        let records: Vec<ChunkEmbedding> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (chunk, embedding))| {
                ChunkEmbedding::new(document.id.clone(), index as i32, chunk, embedding)
                    .with_metadata(serde_json::json!({
                        "chunk_index": index,
                        "total_chunks": total_chunks,
                    }))
            })
            .collect();

        self.db
            .create_chunk_embeddings(&records, self.embedder.model_name())?;

        Ok(total_chunks)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

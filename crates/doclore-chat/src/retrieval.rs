//! The document retrieval tool.

use crate::error::ChatResult;
use doclore_db::{Database, SearchResult};
use doclore_llm::{Embedder, ToolDefinition};
use tracing::debug;

/// Name under which the tool is declared to the model.
pub const SEARCH_TOOL_NAME: &str = "search_documents";

/// Returned when the store holds no embeddings at all. No similarity
/// search is attempted in that case.
pub const EMPTY_STORE_MESSAGE: &str = "No documents have been ingested yet. \
    Please add some documents first, then ask again.";

/// Returned when nothing clears the similarity threshold.
pub const NO_MATCH_MESSAGE: &str = "No relevant documents found for this query. \
    Try rephrasing the question or adding more documents.";

/// Retrieval tunables.
#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    /// Chunks returned per query.
    pub top_k: usize,
    /// Minimum cosine similarity for a chunk to count as relevant.
    pub min_similarity: f32,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_similarity: 0.5,
        }
    }
}

impl RetrievalOptions {
    pub fn from_config(config: &doclore_config::RetrievalConfig) -> Self {
        Self {
            top_k: config.top_k,
            min_similarity: config.min_similarity,
        }
    }
}

/// The tool schema declared to the model.
pub fn search_tool_definition() -> ToolDefinition {
    ToolDefinition::function(
        SEARCH_TOOL_NAME,
        "Search the ingested documents for passages relevant to a query. \
         Use this whenever the user asks about the documents' content.",
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find relevant document passages"
                }
            },
            "required": ["query"]
        }),
    )
}

/// Execute the retrieval tool for a query.
///
/// The return value is a formatted text block, not structured data: it
/// is consumed directly as model-readable context. Empty-store and
/// no-match states are valid results, not errors.
pub async fn search_documents(
    db: &Database,
    embedder: &dyn Embedder,
    options: &RetrievalOptions,
    query: &str,
) -> ChatResult<String> {
    debug!("Retrieval query: {}", query);

    if db.count_chunk_embeddings()? == 0 {
        return Ok(EMPTY_STORE_MESSAGE.to_string());
    }

    let query_embedding = embedder.embed(query).await?;
    let results = db.vector_search(
        &query_embedding,
        options.top_k,
        Some(options.min_similarity),
    )?;

    debug!("Retrieval hits: {}", results.len());

    if results.is_empty() {
        return Ok(NO_MATCH_MESSAGE.to_string());
    }

    Ok(format_results(&results))
}

/// Render search hits as a numbered, citation-annotated block.
fn format_results(results: &[SearchResult]) -> String {
    let entries: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[{}] From \"{}\" ({}% relevant):\n{}\n",
                i + 1,
                r.document_title,
                (r.similarity * 100.0).round() as i32,
                r.content
            )
        })
        .collect();

    format!(
        "I found {} relevant section(s) in the ingested documents:\n\n{}",
        results.len(),
        entries.join("\n---\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclore_core::{ChunkEmbedding, Document, DocumentKind};
    use doclore_llm::mock::MockEmbedder;

    fn seed_chunk(db: &Database, title: &str, content: &str, embedding: Vec<f32>) {
        let doc = Document::new(DocumentKind::File, title);
        db.create_document(&doc).unwrap();
        db.create_chunk_embeddings(
            &[ChunkEmbedding::new(doc.id, 0, content, embedding)],
            "mock-embedder",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_empty_store_short_circuits() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);

        let result = search_documents(&db, &embedder, &RetrievalOptions::default(), "anything")
            .await
            .unwrap();

        assert_eq!(result, EMPTY_STORE_MESSAGE);
        // The guard fires before any query embedding happens
        assert_eq!(embedder.embed_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_match_above_threshold() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);

        // A vector orthogonal-ish to whatever the query hashes to is
        // hard to construct; a zero vector guarantees similarity 0.
        seed_chunk(&db, "Unrelated", "off-topic text", vec![0.0; 8]);

        let result = search_documents(&db, &embedder, &RetrievalOptions::default(), "webhooks")
            .await
            .unwrap();

        assert_eq!(result, NO_MATCH_MESSAGE);
    }

    #[tokio::test]
    async fn test_formatted_citations() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);

        // Identical vector to the query: similarity 1.0
        seed_chunk(
            &db,
            "Webhook Guide",
            "Verify signatures before trusting payloads.",
            embedder.vector_for("webhooks"),
        );

        let result = search_documents(&db, &embedder, &RetrievalOptions::default(), "webhooks")
            .await
            .unwrap();

        assert!(result.contains("1 relevant section"));
        assert!(result.contains("[1] From \"Webhook Guide\" (100% relevant):"));
        assert!(result.contains("Verify signatures"));
    }

    #[tokio::test]
    async fn test_top_k_and_threshold_applied() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);
        let query_vec = embedder.vector_for("webhooks");

        for i in 0..5 {
            seed_chunk(
                &db,
                &format!("Doc {}", i),
                &format!("matching passage {}", i),
                query_vec.clone(),
            );
        }

        let result = search_documents(&db, &embedder, &RetrievalOptions::default(), "webhooks")
            .await
            .unwrap();

        assert!(result.contains("3 relevant section(s)"));
        assert!(result.contains("[3]"));
        assert!(!result.contains("[4]"));
    }
}

//! Vector search operations for similarity retrieval.

use crate::database::Database;
use crate::error::DbResult;

/// Result of a similarity search. Ephemeral: produced per query,
/// discarded after response formatting.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// ID of the owning document.
    pub document_id: String,
    /// Title of the owning document.
    pub document_title: String,
    /// The matching chunk's text.
    pub content: String,
    /// Cosine similarity score (0.0 to 1.0).
    pub similarity: f32,
    /// Chunk metadata (chunk_index, total_chunks).
    pub metadata: serde_json::Value,
}

/// Encode a float vector as a BLOB (little-endian f32 bytes).
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode a BLOB back into a float vector.
pub fn blob_to_vec(blob: &[u8], dimensions: usize) -> Vec<f32> {
    blob.chunks_exact(4)
        .take(dimensions)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Calculate cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot_product += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    dot_product / denominator
}

impl Database {
    /// Find the most similar chunks using cosine similarity.
    ///
    /// This performs a brute-force search over all stored embeddings,
    /// which is efficient for personal knowledge bases (<100K chunks).
    /// Results are sorted by descending similarity, filtered by
    /// `min_similarity`, and truncated to `limit`.
    pub fn vector_search(
        &self,
        query_vector: &[f32],
        limit: usize,
        min_similarity: Option<f32>,
    ) -> DbResult<Vec<SearchResult>> {
        let conn = self.conn()?;
        let min_sim = min_similarity.unwrap_or(0.0);

        let mut stmt = conn.prepare(
            r#"
            SELECT
                c.document_id, c.content, c.vector, c.dimensions, c.metadata,
                d.title
            FROM chunk_embeddings c
            JOIN documents d ON d.id = c.document_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let document_id: String = row.get(0)?;
            let content: String = row.get(1)?;
            let vector_bytes: Vec<u8> = row.get(2)?;
            let dimensions: i32 = row.get(3)?;
            let metadata_str: String = row.get(4)?;
            let document_title: String = row.get(5)?;

            Ok((
                document_id,
                content,
                vector_bytes,
                dimensions,
                metadata_str,
                document_title,
            ))
        })?;

        let mut results: Vec<SearchResult> = Vec::new();

        for row_result in rows {
            let (document_id, content, vector_bytes, dimensions, metadata_str, document_title) =
                row_result?;

            let vector = blob_to_vec(&vector_bytes, dimensions as usize);
            let similarity = cosine_similarity(query_vector, &vector);

            if similarity >= min_sim {
                results.push(SearchResult {
                    document_id,
                    document_title,
                    content,
                    similarity,
                    metadata: serde_json::from_str(&metadata_str).unwrap_or_default(),
                });
            }
        }

        // Sort by similarity (descending)
        results.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap());

        results.truncate(limit);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclore_core::{ChunkEmbedding, Document, DocumentKind};

    #[test]
    fn test_cosine_similarity() {
        // Identical vectors
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.0001);

        // Orthogonal vectors
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.0001);

        // Opposite vectors
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) - (-1.0)).abs() < 0.0001);

        // Empty vectors
        let a: Vec<f32> = vec![];
        let b: Vec<f32> = vec![];
        assert_eq!(cosine_similarity(&a, &b), 0.0);

        // Different lengths
        let a = vec![1.0, 0.0];
        let b = vec![1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_blob_roundtrip() {
        let v = vec![1.0f32, -2.5, 3.125];
        let blob = vec_to_blob(&v);
        assert_eq!(blob.len(), 12);
        assert_eq!(blob_to_vec(&blob, 3), v);
    }

    fn seed(db: &Database) -> (Document, Document) {
        let rust_doc = Document::new(DocumentKind::File, "Rust Guide");
        let python_doc = Document::new(DocumentKind::Link, "Python Guide");
        db.create_document(&rust_doc).unwrap();
        db.create_document(&python_doc).unwrap();

        db.create_chunk_embeddings(
            &[ChunkEmbedding::new(
                rust_doc.id.clone(),
                0,
                "Chunk about Rust ownership",
                vec![1.0, 0.0, 0.0, 0.0],
            )],
            "test-model",
        )
        .unwrap();
        db.create_chunk_embeddings(
            &[ChunkEmbedding::new(
                python_doc.id.clone(),
                0,
                "Chunk about Python decorators",
                vec![0.0, 1.0, 0.0, 0.0],
            )],
            "test-model",
        )
        .unwrap();

        (rust_doc, python_doc)
    }

    #[test]
    fn test_vector_search_ranks_by_similarity() {
        let db = Database::open_in_memory().unwrap();
        let (rust_doc, _) = seed(&db);

        let query = vec![0.9, 0.1, 0.0, 0.0];
        let results = db.vector_search(&query, 10, None).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document_id, rust_doc.id);
        assert_eq!(results[0].document_title, "Rust Guide");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn test_vector_search_threshold_and_limit() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);

        // Threshold excludes the orthogonal chunk
        let query = vec![1.0, 0.0, 0.0, 0.0];
        let results = db.vector_search(&query, 10, Some(0.5)).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.iter().all(|r| r.similarity >= 0.5));

        // Limit truncates
        let results = db.vector_search(&query, 1, None).unwrap();
        assert_eq!(results.len(), 1);
    }
}

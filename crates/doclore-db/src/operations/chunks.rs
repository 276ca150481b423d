//! Chunk embedding operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use crate::operations::vectors::{blob_to_vec, vec_to_blob};
use doclore_core::{ChunkEmbedding, DocumentId};
use rusqlite::params;

impl Database {
    /// Insert all chunk embeddings for one ingestion run in a single transaction.
    ///
    /// Either every row lands or none do, so a failed run leaves no
    /// partial chunk state behind.
    pub fn create_chunk_embeddings(&self, chunks: &[ChunkEmbedding], model: &str) -> DbResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO chunk_embeddings (id, document_id, chunk_index, content, vector, dimensions, model, metadata)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;

            for chunk in chunks {
                stmt.execute(params![
                    chunk.id,
                    chunk.document_id,
                    chunk.chunk_index,
                    chunk.content,
                    vec_to_blob(&chunk.embedding),
                    chunk.embedding.len() as i32,
                    model,
                    chunk.metadata.to_string(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Get all chunks for a document, in chunk order.
    pub fn get_chunks_by_document(&self, document_id: &DocumentId) -> DbResult<Vec<ChunkEmbedding>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, document_id, chunk_index, content, vector, dimensions, metadata
             FROM chunk_embeddings WHERE document_id = ?1 ORDER BY chunk_index",
        )?;

        let chunks = stmt.query_map(params![document_id], |row| {
            let vector_bytes: Vec<u8> = row.get(4)?;
            let dimensions: i32 = row.get(5)?;
            let metadata_str: String = row.get(6)?;

            Ok(ChunkEmbedding {
                id: row.get(0)?,
                document_id: row.get(1)?,
                chunk_index: row.get(2)?,
                content: row.get(3)?,
                embedding: blob_to_vec(&vector_bytes, dimensions as usize),
                metadata: serde_json::from_str(&metadata_str).unwrap_or_default(),
            })
        })?;

        chunks.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Count stored chunk embeddings across all documents.
    ///
    /// The retrieval tool uses this as its empty-store guard.
    pub fn count_chunk_embeddings(&self) -> DbResult<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM chunk_embeddings", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclore_core::{Document, DocumentKind};

    fn seed_document(db: &Database, title: &str) -> Document {
        let doc = Document::new(DocumentKind::File, title);
        db.create_document(&doc).unwrap();
        doc
    }

    #[test]
    fn test_bulk_insert_and_fetch() {
        let db = Database::open_in_memory().unwrap();
        let doc = seed_document(&db, "Test Doc");

        let chunks: Vec<ChunkEmbedding> = (0..3)
            .map(|i| {
                ChunkEmbedding::new(
                    doc.id.clone(),
                    i,
                    format!("chunk number {}", i),
                    vec![i as f32, 1.0, 0.0],
                )
                .with_metadata(serde_json::json!({"chunk_index": i, "total_chunks": 3}))
            })
            .collect();

        db.create_chunk_embeddings(&chunks, "test-model").unwrap();

        let fetched = db.get_chunks_by_document(&doc.id).unwrap();
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[0].chunk_index, 0);
        assert_eq!(fetched[2].content, "chunk number 2");
        assert_eq!(fetched[1].embedding, vec![1.0, 1.0, 0.0]);
        assert_eq!(fetched[0].metadata["total_chunks"], 3);
    }

    #[test]
    fn test_cascade_delete_leaves_no_orphans() {
        let db = Database::open_in_memory().unwrap();
        let doc = seed_document(&db, "Doomed");

        let chunks = vec![
            ChunkEmbedding::new(doc.id.clone(), 0, "first", vec![1.0, 0.0]),
            ChunkEmbedding::new(doc.id.clone(), 1, "second", vec![0.0, 1.0]),
        ];
        db.create_chunk_embeddings(&chunks, "test-model").unwrap();
        assert_eq!(db.count_chunk_embeddings().unwrap(), 2);

        db.delete_document(&doc.id).unwrap();

        assert_eq!(db.count_chunk_embeddings().unwrap(), 0);
        assert!(db.get_chunks_by_document(&doc.id).unwrap().is_empty());
    }

    #[test]
    fn test_foreign_key_enforced() {
        let db = Database::open_in_memory().unwrap();

        let orphan = ChunkEmbedding::new("no-such-document".to_string(), 0, "text", vec![1.0]);
        let result = db.create_chunk_embeddings(&[orphan], "test-model");
        assert!(result.is_err());
    }
}

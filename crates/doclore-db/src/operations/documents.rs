//! Document CRUD operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use doclore_core::{Document, DocumentKind, DocumentStatus};
use rusqlite::params;

impl Database {
    /// Create a new document.
    pub fn create_document(&self, doc: &Document) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO documents (id, kind, title, source, content, file_size, mime_type, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                doc.id,
                doc.kind.as_str(),
                doc.title,
                doc.source,
                doc.content,
                doc.file_size,
                doc.mime_type,
                doc.status.as_str(),
                doc.created_at.to_rfc3339(),
                doc.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a document by ID.
    pub fn get_document(&self, id: &str) -> DbResult<Document> {
        let conn = self.conn()?;
        let doc = conn
            .query_row(
                "SELECT id, kind, title, source, content, file_size, mime_type, status, created_at, updated_at
                 FROM documents WHERE id = ?1",
                params![id],
                row_to_document,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    DbError::NotFound(format!("Document not found: {}", id))
                }
                _ => DbError::from(e),
            })?;

        Ok(doc)
    }

    /// Update a document's status, refreshing its updated_at timestamp.
    pub fn update_document_status(&self, id: &str, status: DocumentStatus) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE documents SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status.as_str(), Utc::now().to_rfc3339()],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Document not found: {}", id)));
        }

        Ok(())
    }

    /// Delete a document by ID. Chunk embeddings cascade.
    pub fn delete_document(&self, id: &str) -> DbResult<()> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(DbError::NotFound(format!("Document not found: {}", id)));
        }

        Ok(())
    }

    /// List documents, newest first.
    pub fn list_documents(&self, limit: Option<i64>) -> DbResult<Vec<Document>> {
        let conn = self.conn()?;
        let limit = limit.unwrap_or(100);

        let mut stmt = conn.prepare(
            "SELECT id, kind, title, source, content, file_size, mime_type, status, created_at, updated_at
             FROM documents ORDER BY created_at DESC LIMIT ?1",
        )?;

        let docs = stmt.query_map(params![limit], row_to_document)?;
        docs.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Get a document by ID prefix.
    ///
    /// Useful for CLI where users can type partial IDs.
    pub fn get_document_by_prefix(&self, prefix: &str) -> DbResult<Document> {
        let conn = self.conn()?;

        // First try exact match
        if let Ok(doc) = self.get_document(prefix) {
            return Ok(doc);
        }

        let pattern = format!("{}%", prefix);
        let mut stmt = conn.prepare(
            "SELECT id, kind, title, source, content, file_size, mime_type, status, created_at, updated_at
             FROM documents WHERE id LIKE ?1 LIMIT 2",
        )?;

        let docs: Vec<Document> = stmt
            .query_map(params![pattern], row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;

        match docs.len() {
            0 => Err(DbError::NotFound(format!("Document not found: {}", prefix))),
            1 => Ok(docs.into_iter().next().unwrap()),
            _ => Err(DbError::Other(format!(
                "Ambiguous ID prefix '{}': multiple documents match",
                prefix
            ))),
        }
    }
}

fn row_to_document(row: &rusqlite::Row) -> rusqlite::Result<Document> {
    let kind_str: String = row.get(1)?;
    let status_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(Document {
        id: row.get(0)?,
        kind: DocumentKind::from_str(&kind_str).unwrap_or(DocumentKind::File),
        title: row.get(2)?,
        source: row.get(3)?,
        content: row.get(4)?,
        file_size: row.get(5)?,
        mime_type: row.get(6)?,
        status: DocumentStatus::from_str(&status_str).unwrap_or(DocumentStatus::Processing),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

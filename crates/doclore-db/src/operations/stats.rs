//! Database statistics.

use crate::database::Database;
use crate::error::DbResult;
use rusqlite::params;
use std::collections::HashMap;

/// Summary counts for the `status` command.
#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    pub total_documents: i64,
    pub documents_by_status: HashMap<String, i64>,
    pub total_chunks: i64,
}

impl Database {
    /// Gather summary statistics.
    pub fn stats(&self) -> DbResult<DatabaseStats> {
        let conn = self.conn()?;

        let total_documents: i64 =
            conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;

        let mut documents_by_status = HashMap::new();
        let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM documents GROUP BY status")?;
        let rows = stmt.query_map(params![], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (status, count) = row?;
            documents_by_status.insert(status, count);
        }

        let total_chunks = self.count_chunk_embeddings()?;

        Ok(DatabaseStats {
            total_documents,
            documents_by_status,
            total_chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclore_core::{Document, DocumentKind, DocumentStatus};

    #[test]
    fn test_stats() {
        let db = Database::open_in_memory().unwrap();

        let done = Document::new(DocumentKind::File, "Done");
        let stuck = Document::new(DocumentKind::Link, "Stuck");
        db.create_document(&done).unwrap();
        db.create_document(&stuck).unwrap();
        db.update_document_status(&done.id, DocumentStatus::Completed)
            .unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.total_documents, 2);
        assert_eq!(stats.documents_by_status.get("completed"), Some(&1));
        assert_eq!(stats.documents_by_status.get("processing"), Some(&1));
        assert_eq!(stats.total_chunks, 0);
    }
}

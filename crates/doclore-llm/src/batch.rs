//! Sequential batch embedding.

use crate::error::LlmResult;
use crate::traits::Embedder;
use tracing::debug;

/// Embeds an ordered sequence of chunks in fixed-size batches.
///
/// Batches run strictly one after another: the service call is the
/// concurrency unit, which bounds peak memory and respects upstream
/// rate limits at the cost of latency. A failed batch fails the whole
/// run; callers must not commit partial results.
pub struct EmbeddingBatcher<'a, E: Embedder + ?Sized> {
    embedder: &'a E,
    batch_size: usize,
}

impl<'a, E: Embedder + ?Sized> EmbeddingBatcher<'a, E> {
    pub fn new(embedder: &'a E, batch_size: usize) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
        }
    }

    /// Embed all chunks, returning one vector per chunk in input order.
    pub async fn embed_all(&self, chunks: &[String]) -> LlmResult<Vec<Vec<f32>>> {
        let mut all_embeddings = Vec::with_capacity(chunks.len());
        let total_batches = chunks.len().div_ceil(self.batch_size);

        for (batch_no, batch) in chunks.chunks(self.batch_size).enumerate() {
            debug!(
                "Embedding batch {}/{} ({} chunks)",
                batch_no + 1,
                total_batches,
                batch.len()
            );

            let embeddings = self.embedder.embed_many(batch).await?;
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockEmbedder;

    #[tokio::test]
    async fn test_order_preserved_across_batches() {
        let embedder = MockEmbedder::new(4);
        let chunks: Vec<String> = (0..7).map(|i| format!("chunk {}", i)).collect();

        let batcher = EmbeddingBatcher::new(&embedder, 3);
        let embeddings = batcher.embed_all(&chunks).await.unwrap();

        assert_eq!(embeddings.len(), chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(embeddings[i], embedder.vector_for(chunk));
        }
    }

    #[tokio::test]
    async fn test_batches_are_sequential_and_sized() {
        let embedder = MockEmbedder::new(4);
        let chunks: Vec<String> = (0..10).map(|i| i.to_string()).collect();

        let batcher = EmbeddingBatcher::new(&embedder, 4);
        batcher.embed_all(&chunks).await.unwrap();

        assert_eq!(embedder.batch_sizes(), vec![4, 4, 2]);
    }

    #[tokio::test]
    async fn test_failed_batch_fails_run() {
        let embedder = MockEmbedder::new(4).failing_after(1);
        let chunks: Vec<String> = (0..6).map(|i| i.to_string()).collect();

        let batcher = EmbeddingBatcher::new(&embedder, 2);
        let result = batcher.embed_all(&chunks).await;
        assert!(result.is_err());
        // Only the first batch was attempted successfully
        assert_eq!(embedder.batch_sizes(), vec![2]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let embedder = MockEmbedder::new(4);
        let batcher = EmbeddingBatcher::new(&embedder, 50);
        let embeddings = batcher.embed_all(&[]).await.unwrap();
        assert!(embeddings.is_empty());
    }
}

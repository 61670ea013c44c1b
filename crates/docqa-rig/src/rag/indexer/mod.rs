//! Batched embedding and storage of document chunks.

mod report;

use std::sync::Arc;
use std::time::Duration;

pub use self::report::IngestReport;
use super::splitter::Chunk;
use super::vector_store::{DocumentStore, EmbeddedChunk};
use crate::provider::Embedder;
use crate::{Error, Result, TRACING_TARGET_INGEST};

/// Embeds chunks in fixed-size batches and stores each batch.
///
/// Batches run one after another with a flat pause in between to stay
/// under provider rate limits.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
    batch_size: usize,
    batch_delay: Duration,
}

impl Indexer {
    /// Creates a new indexer.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn DocumentStore>,
        batch_size: usize,
        batch_delay: Duration,
    ) -> Self {
        Self {
            embedder,
            store,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// Returns the number of batches needed for `chunks` chunks.
    pub fn batch_count(&self, chunks: usize) -> usize {
        chunks.div_ceil(self.batch_size)
    }

    /// Embeds and stores the chunks, returning the number of batches sent.
    ///
    /// Stops at the first failing batch; earlier batches stay stored.
    pub async fn index_chunks(&self, chunks: Vec<Chunk>) -> Result<usize> {
        let total = self.batch_count(chunks.len());

        for (index, batch) in chunks.chunks(self.batch_size).enumerate() {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self
                .embedder
                .embed_documents(texts)
                .await
                .inspect_err(|err| {
                    tracing::error!(
                        target: TRACING_TARGET_INGEST,
                        batch = index + 1,
                        total,
                        retryable = err.is_retryable(),
                        error = %err,
                        "Failed to embed batch"
                    );
                })?;

            if embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "embedding count mismatch: expected {}, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            let documents: Vec<EmbeddedChunk> = batch
                .iter()
                .cloned()
                .zip(embeddings)
                .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
                .collect();

            self.store.add_documents(documents).await?;

            tracing::info!(
                target: TRACING_TARGET_INGEST,
                batch = index + 1,
                total,
                "Stored batch {}/{}",
                index + 1,
                total
            );

            if index + 1 < total && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        Ok(total)
    }
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("batch_size", &self.batch_size)
            .field("batch_delay", &self.batch_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::mock::{MemoryStore, MockEmbedder};
    use crate::rag::splitter::ChunkMetadata;

    fn chunks(count: usize) -> Vec<Chunk> {
        (0..count)
            .map(|i| {
                let metadata = ChunkMetadata {
                    chunk_index: i as u32,
                    ..Default::default()
                };
                Chunk::new(format!("chunk number {i}"), metadata)
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn batches_with_pause_between() {
        let embedder = Arc::new(MockEmbedder::default());
        let store = Arc::new(MemoryStore::default());
        let indexer = Indexer::new(embedder.clone(), store.clone(), 10, Duration::from_secs(2));

        let start = Instant::now();
        let batches = indexer.index_chunks(chunks(25)).await.unwrap();

        assert_eq!(batches, 3);
        assert_eq!(store.len(), 25);
        assert_eq!(embedder.batch_sizes(), vec![10, 10, 5]);
        // Two pauses: none after the last batch.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4));
        assert!(elapsed < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn single_batch_does_not_pause() {
        let store = Arc::new(MemoryStore::default());
        let indexer = Indexer::new(
            Arc::new(MockEmbedder::default()),
            store.clone(),
            10,
            Duration::from_secs(2),
        );

        let start = Instant::now();
        assert_eq!(indexer.index_chunks(chunks(10)).await.unwrap(), 1);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn empty_input_sends_nothing() {
        let embedder = Arc::new(MockEmbedder::default());
        let indexer = Indexer::new(
            embedder.clone(),
            Arc::new(MemoryStore::default()),
            10,
            Duration::ZERO,
        );

        assert_eq!(indexer.index_chunks(vec![]).await.unwrap(), 0);
        assert!(embedder.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn failing_batch_keeps_earlier_batches() {
        let store = Arc::new(MemoryStore::default());
        let embedder = Arc::new(MockEmbedder::default().fail_on_batch(2));
        let indexer = Indexer::new(embedder, store.clone(), 10, Duration::ZERO);

        let err = indexer.index_chunks(chunks(30)).await.unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
        assert!(err.is_retryable());
        assert_eq!(store.len(), 10);
    }

    #[tokio::test]
    async fn count_mismatch_is_embedding_error() {
        let embedder = Arc::new(MockEmbedder::default().drop_last_embedding());
        let store = Arc::new(MemoryStore::default());
        let indexer = Indexer::new(embedder, store.clone(), 10, Duration::ZERO);

        let err = indexer.index_chunks(chunks(3)).await.unwrap_err();
        assert!(err.to_string().contains("expected 3, got 2"));
        assert_eq!(store.len(), 0);
    }
}

//! Embedding seam used by the RAG pipeline.

use crate::Result;

/// Turns text into embedding vectors.
///
/// Implemented by [`EmbeddingProvider`] for the real providers and by the
/// in-memory mock for tests.
///
/// [`EmbeddingProvider`]: super::EmbeddingProvider
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a batch of documents, one vector per input, in input order.
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Embeds a single query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

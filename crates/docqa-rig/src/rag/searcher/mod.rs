//! Similarity search over stored chunks.

mod retrieved;

use std::sync::Arc;

pub use self::retrieved::RetrievedChunk;
use super::vector_store::DocumentStore;
use crate::provider::Embedder;
use crate::{Result, TRACING_TARGET};

/// Embeds queries and retrieves the closest chunks.
#[derive(Clone)]
pub struct Searcher {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
}

impl Searcher {
    /// Creates a new searcher.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn DocumentStore>) -> Self {
        Self { embedder, store }
    }

    /// Returns at most `k` chunks for the query, most similar first.
    ///
    /// A blank query returns no chunks without calling the embedder.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if query.trim().is_empty() || k == 0 {
            return Ok(vec![]);
        }

        let embedding = self.embedder.embed_query(query).await?;
        let mut chunks = self.store.similarity_search_with_score(embedding, k).await?;
        chunks.truncate(k);

        tracing::debug!(
            target: TRACING_TARGET,
            k,
            results = chunks.len(),
            top_score = chunks.first().map(|c| c.score),
            "Retrieved chunks"
        );
        Ok(chunks)
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher").finish_non_exhaustive()
    }
}

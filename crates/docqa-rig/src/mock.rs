//! In-memory implementations of the provider and storage seams.
//!
//! Useful for exercising the ingestion and answering pipeline without
//! network access or a database.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! docqa-rig = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::provider::{Completer, Embedder};
use crate::rag::{DocumentStore, EmbeddedChunk, RetrievedChunk};
use crate::{Error, Result};

/// Deterministic bag-of-words embedder.
///
/// Each lowercase word is hashed into one of `dimensions` buckets, so texts
/// sharing words end up close in cosine distance.
#[derive(Debug)]
pub struct MockEmbedder {
    dimensions: usize,
    fail_on_batch: Option<usize>,
    drop_last_embedding: bool,
    batches: Mutex<Vec<usize>>,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::with_dimensions(64)
    }
}

impl MockEmbedder {
    /// Creates an embedder producing vectors of the given size.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            fail_on_batch: None,
            drop_last_embedding: false,
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Fails the given document batch (1-based).
    pub fn fail_on_batch(mut self, batch: usize) -> Self {
        self.fail_on_batch = Some(batch);
        self
    }

    /// Returns one embedding fewer than requested for document batches.
    pub fn drop_last_embedding(mut self) -> Self {
        self.drop_last_embedding = true;
        self
    }

    /// Returns the sizes of the document batches received so far.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Embeds a single text.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % self.dimensions as u64) as usize] += 1.0;
        }
        vector
    }
}

#[async_trait::async_trait]
impl Embedder for MockEmbedder {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let batch = {
            let mut batches = self
                .batches
                .lock()
                .map_err(|_| Error::embedding("mock embedder lock poisoned"))?;
            batches.push(texts.len());
            batches.len()
        };

        if self.fail_on_batch == Some(batch) {
            return Err(Error::provider("mock", format!("batch {batch} rejected")));
        }

        let mut embeddings: Vec<Vec<f32>> = texts.iter().map(|t| self.embed(t)).collect();
        if self.drop_last_embedding {
            embeddings.pop();
        }
        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }
}

/// Vector store kept in memory, searched by brute-force cosine similarity.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<EmbeddedChunk>>,
    unavailable: bool,
}

impl MemoryStore {
    /// Creates a store whose every operation fails.
    pub fn unavailable() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            unavailable: true,
        }
    }

    /// Returns the number of stored chunks.
    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or_default()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn documents(&self) -> Result<std::sync::MutexGuard<'_, Vec<EmbeddedChunk>>> {
        if self.unavailable {
            return Err(Error::retrieval("memory store is unavailable"));
        }
        self.documents
            .lock()
            .map_err(|_| Error::retrieval("memory store lock poisoned"))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm = |v: &[f32]| v.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn add_documents(&self, documents: Vec<EmbeddedChunk>) -> Result<usize> {
        let count = documents.len();
        self.documents()?.extend(documents);
        Ok(count)
    }

    async fn similarity_search_with_score(
        &self,
        query: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        let documents = self.documents()?;
        let mut scored: Vec<RetrievedChunk> = documents
            .iter()
            .map(|d| {
                RetrievedChunk::new(
                    d.chunk.text.clone(),
                    cosine_similarity(&query, &d.embedding),
                    d.chunk.metadata.clone(),
                )
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.documents()?.len() as u64)
    }

    async fn clear(&self) -> Result<usize> {
        let mut documents = self.documents()?;
        let count = documents.len();
        documents.clear();
        Ok(count)
    }
}

/// Completer returning a fixed answer and recording every prompt.
#[derive(Debug)]
pub struct MockCompleter {
    response: String,
    failing: bool,
    stalled: bool,
    prompts: Mutex<Vec<String>>,
}

impl MockCompleter {
    /// Creates a completer that always answers `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            failing: false,
            stalled: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Creates a completer whose every call fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new("")
        }
    }

    /// Creates a completer that records the prompt and never answers.
    pub fn stalled() -> Self {
        Self {
            stalled: true,
            ..Self::new("")
        }
    }

    /// Returns the prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Completer for MockCompleter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_owned());
        }

        if self.stalled {
            std::future::pending::<()>().await;
        }
        if self.failing {
            return Err(Error::provider("mock", "completion failed"));
        }
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similar_texts_score_higher() {
        let embedder = MockEmbedder::default();
        let query = embedder.embed("annual revenue");
        let close = embedder.embed("the annual revenue grew");
        let far = embedder.embed("office coffee machine");

        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn zero_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}

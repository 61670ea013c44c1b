//! RAG (Retrieval-Augmented Generation) module.
//!
//! Ingests a single PDF and retrieves the chunks closest to a question.
//!
//! # Modules
//!
//! - [`loader`] - PDF text extraction, one document per page
//! - [`splitter`] - Fixed-size overlapping chunks
//! - [`indexer`] - Batched embedding and storage
//! - [`searcher`] - Similarity search
//!
//! # Example
//!
//! ```ignore
//! use docqa_rig::rag::{RagConfig, RagService};
//!
//! let rag = RagService::new(embedder, store, RagConfig::default())?;
//!
//! if !rag.is_ingested().await {
//!     rag.ingest_pdf().await?;
//! }
//!
//! let prompt = rag.search_prompt("Qual o faturamento?").await?;
//! ```

mod config;
pub mod indexer;
pub mod loader;
mod prompt;
pub mod searcher;
pub mod splitter;
mod vector_store;

use std::sync::Arc;

pub use self::config::RagConfig;
pub use self::indexer::{IngestReport, Indexer};
pub use self::loader::{Document, DocumentMetadata, load_pdf};
pub use self::prompt::{NO_INFORMATION_ANSWER, PromptBuilder};
pub use self::searcher::{RetrievedChunk, Searcher};
pub use self::splitter::{Chunk, ChunkMetadata, Splitter};
pub use self::vector_store::{DocumentStore, EmbeddedChunk, PgVectorStore};
use crate::provider::Embedder;
use crate::{Result, TRACING_TARGET, TRACING_TARGET_INGEST};

/// High-level RAG service for ingestion and retrieval.
///
/// The service is cheap to clone and can be shared across threads.
#[derive(Clone)]
pub struct RagService {
    inner: Arc<RagServiceInner>,
}

struct RagServiceInner {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
    splitter: Splitter,
    config: RagConfig,
}

impl RagService {
    /// Creates a new RAG service.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn DocumentStore>,
        config: RagConfig,
    ) -> Result<Self> {
        config.validate()?;
        let splitter = Splitter::new(config.chunk_size, config.chunk_overlap, true)?;

        Ok(Self {
            inner: Arc::new(RagServiceInner {
                embedder,
                store,
                splitter,
                config,
            }),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Creates an indexer using the configured batch size and pause.
    pub fn indexer(&self) -> Indexer {
        Indexer::new(
            self.inner.embedder.clone(),
            self.inner.store.clone(),
            self.inner.config.ingest_batch_size,
            self.inner.config.batch_delay(),
        )
    }

    /// Creates a searcher over the store.
    pub fn searcher(&self) -> Searcher {
        Searcher::new(self.inner.embedder.clone(), self.inner.store.clone())
    }

    /// Returns true if the collection holds at least one chunk.
    ///
    /// Errors are logged and reported as not ingested.
    pub async fn is_ingested(&self) -> bool {
        match self.inner.store.count().await {
            Ok(count) => count > 0,
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET_INGEST,
                    error = %err,
                    "Failed to check ingestion state"
                );
                false
            }
        }
    }

    /// Loads, splits, embeds and stores the configured PDF.
    pub async fn ingest_pdf(&self) -> Result<IngestReport> {
        let path = &self.inner.config.pdf_path;
        tracing::info!(target: TRACING_TARGET_INGEST, path = %path.display(), "Loading document");

        let documents = load_pdf(path).await?;
        self.ingest_documents(&documents).await
    }

    /// Splits, embeds and stores already loaded documents.
    pub async fn ingest_documents(&self, documents: &[Document]) -> Result<IngestReport> {
        let chunks = self.inner.splitter.split_documents(documents)?;
        let chunk_count = chunks.len();

        tracing::info!(
            target: TRACING_TARGET_INGEST,
            pages = documents.len(),
            chunks = chunk_count,
            "Storing embeddings"
        );

        let batches = self.indexer().index_chunks(chunks).await?;
        let report = IngestReport {
            pages: documents.len(),
            chunks: chunk_count,
            batches,
        };

        tracing::info!(
            target: TRACING_TARGET_INGEST,
            pages = report.pages,
            chunks = report.chunks,
            batches = report.batches,
            "Ingestion completed"
        );
        Ok(report)
    }

    /// Removes every stored chunk from the collection.
    pub async fn reset(&self) -> Result<usize> {
        self.inner.store.clear().await
    }

    /// Retrieves at most `k` chunks for the query, most similar first.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        self.searcher().search(query, k).await
    }

    /// Builds the grounded prompt for a question.
    ///
    /// Returns `None` for a blank question or when nothing was retrieved.
    pub async fn search_prompt(&self, question: &str) -> Result<Option<String>> {
        if question.trim().is_empty() {
            return Ok(None);
        }

        let chunks = self.search(question, self.inner.config.search_top_k).await?;
        if chunks.is_empty() {
            tracing::debug!(target: TRACING_TARGET, "No context found for question");
            return Ok(None);
        }

        let prompt = PromptBuilder::new()
            .with_context(chunks)
            .with_question(question)
            .build();
        Ok(Some(prompt))
    }
}

impl std::fmt::Debug for RagService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagService")
            .field("splitter", &self.inner.splitter)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::Error;
    use crate::mock::{MemoryStore, MockEmbedder};

    fn service(store: Arc<MemoryStore>) -> RagService {
        let config = RagConfig {
            ingest_batch_delay_secs: 0,
            ..RagConfig::default()
        };
        RagService::new(Arc::new(MockEmbedder::default()), store, config).unwrap()
    }

    fn pages() -> Vec<Document> {
        vec![
            Document::new("The company revenue in 2023 was ten million.", "doc.pdf", 0),
            Document::new("The office is located in Lisbon.", "doc.pdf", 1),
        ]
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RagConfig::default().with_chunking(100, 100);
        let err = RagService::new(
            Arc::new(MockEmbedder::default()),
            Arc::new(MemoryStore::default()),
            config,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn ingestion_state_follows_store() {
        let store = Arc::new(MemoryStore::default());
        let rag = service(store.clone());
        assert!(!rag.is_ingested().await);

        let report = rag.ingest_documents(&pages()).await.unwrap();
        assert_eq!(report, IngestReport { pages: 2, chunks: 2, batches: 1 });
        assert!(rag.is_ingested().await);

        assert_eq!(rag.reset().await.unwrap(), 2);
        assert!(!rag.is_ingested().await);
    }

    #[tokio::test]
    async fn store_errors_read_as_not_ingested() {
        let rag = service(Arc::new(MemoryStore::unavailable()));
        assert!(!rag.is_ingested().await);
    }

    #[tokio::test]
    async fn missing_pdf_fails_ingestion() {
        let config = RagConfig::default().with_pdf_path("missing/document.pdf");
        let rag = RagService::new(
            Arc::new(MockEmbedder::default()),
            Arc::new(MemoryStore::default()),
            config,
        )
        .unwrap();

        let err = rag.ingest_pdf().await.unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(_)));
    }

    #[tokio::test]
    async fn blank_question_has_no_prompt() {
        let rag = service(Arc::new(MemoryStore::default()));
        rag.ingest_documents(&pages()).await.unwrap();

        assert_eq!(rag.search_prompt("").await.unwrap(), None);
        assert_eq!(rag.search_prompt("   ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_store_has_no_prompt() {
        let rag = service(Arc::new(MemoryStore::default()));
        assert_eq!(rag.search_prompt("What was the revenue?").await.unwrap(), None);
    }

    #[tokio::test]
    async fn prompt_ranks_closest_chunk_first() {
        let rag = service(Arc::new(MemoryStore::default()));
        rag.ingest_documents(&pages()).await.unwrap();

        let prompt = rag
            .search_prompt("company revenue 2023")
            .await
            .unwrap()
            .unwrap();

        let revenue = prompt.find("revenue in 2023").unwrap();
        let office = prompt.find("located in Lisbon").unwrap();
        assert!(revenue < office);
        assert!(prompt.contains("PERGUNTA DO USUÁRIO:\ncompany revenue 2023\n"));
    }

    #[tokio::test]
    async fn search_respects_k() {
        let rag = service(Arc::new(MemoryStore::default()));
        rag.ingest_documents(&pages()).await.unwrap();

        let results = rag.search("company revenue 2023 million", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ingestion_pauses_between_batches() {
        let config = RagConfig::default().with_batch_size(1);
        let rag = RagService::new(
            Arc::new(MockEmbedder::default()),
            Arc::new(MemoryStore::default()),
            config,
        )
        .unwrap();

        let start = tokio::time::Instant::now();
        let report = rag.ingest_documents(&pages()).await.unwrap();
        assert_eq!(report.batches, 2);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}

//! RAG pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for ingestion and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RagConfig {
    /// Path of the PDF to ingest
    #[cfg_attr(
        feature = "config",
        arg(long = "pdf-path", env = "PDF_PATH", default_value = "document.pdf")
    )]
    pub pdf_path: PathBuf,

    /// Name of the vector collection
    #[cfg_attr(
        feature = "config",
        arg(
            long = "collection-name",
            env = "PG_VECTOR_COLLECTION_NAME",
            default_value = "challenge_docs"
        )
    )]
    pub collection_name: String,

    /// Maximum chunk size in characters
    #[cfg_attr(
        feature = "config",
        arg(long = "chunk-size", env = "CHUNK_SIZE", default_value = "1000")
    )]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[cfg_attr(
        feature = "config",
        arg(long = "chunk-overlap", env = "CHUNK_OVERLAP", default_value = "150")
    )]
    pub chunk_overlap: usize,

    /// Chunks embedded and stored per batch
    #[cfg_attr(
        feature = "config",
        arg(
            long = "ingest-batch-size",
            env = "INGEST_BATCH_SIZE",
            default_value = "10"
        )
    )]
    pub ingest_batch_size: usize,

    /// Pause between ingestion batches in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "ingest-batch-delay-secs",
            env = "INGEST_BATCH_DELAY_SECS",
            default_value = "2"
        )
    )]
    pub ingest_batch_delay_secs: u64,

    /// Chunks retrieved per question
    #[cfg_attr(
        feature = "config",
        arg(long = "search-top-k", env = "SEARCH_TOP_K", default_value = "10")
    )]
    pub search_top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("document.pdf"),
            collection_name: "challenge_docs".to_owned(),
            chunk_size: 1000,
            chunk_overlap: 150,
            ingest_batch_size: 10,
            ingest_batch_delay_secs: 2,
            search_top_k: 10,
        }
    }
}

impl RagConfig {
    /// Sets the PDF path.
    pub fn with_pdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdf_path = path.into();
        self
    }

    /// Sets the chunk size and overlap.
    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    /// Sets the ingestion batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.ingest_batch_size = batch_size;
        self
    }

    /// Sets the retrieval k.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.search_top_k = top_k;
        self
    }

    /// Returns the pause between ingestion batches.
    #[inline]
    pub fn batch_delay(&self) -> Duration {
        Duration::from_secs(self.ingest_batch_delay_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunk size must be greater than 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::config(format!(
                "chunk overlap ({}) must be less than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.ingest_batch_size == 0 {
            return Err(Error::config("ingest batch size must be greater than 0"));
        }

        if self.search_top_k == 0 {
            return Err(Error::config("search top k must be greater than 0"));
        }

        if self.collection_name.trim().is_empty() {
            return Err(Error::config("collection name must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RagConfig::default();
        assert_eq!(config.pdf_path, PathBuf::from("document.pdf"));
        assert_eq!(config.collection_name, "challenge_docs");
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 150);
        assert_eq!(config.ingest_batch_size, 10);
        assert_eq!(config.batch_delay(), Duration::from_secs(2));
        assert_eq!(config.search_top_k, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation() {
        assert!(RagConfig::default().with_chunking(0, 0).validate().is_err());
        assert!(RagConfig::default().with_chunking(100, 100).validate().is_err());
        assert!(RagConfig::default().with_chunking(100, 99).validate().is_ok());
        assert!(RagConfig::default().with_batch_size(0).validate().is_err());
        assert!(RagConfig::default().with_top_k(0).validate().is_err());
    }
}

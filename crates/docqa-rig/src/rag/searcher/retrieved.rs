//! Retrieved chunk type for search results.

use serde::{Deserialize, Serialize};

use crate::rag::splitter::ChunkMetadata;

/// A retrieved chunk with its text and similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The chunk text.
    pub text: String,

    /// Similarity score (`1 - cosine distance`, higher is more similar).
    pub score: f64,

    /// Chunk metadata (source, page, offsets).
    pub metadata: ChunkMetadata,
}

impl RetrievedChunk {
    /// Creates a new retrieved chunk.
    pub fn new(text: impl Into<String>, score: f64, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            score,
            metadata,
        }
    }

    /// Returns the 0-based page the chunk came from.
    pub fn page(&self) -> u32 {
        self.metadata.page
    }
}

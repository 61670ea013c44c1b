//! Split chunk metadata.

use serde::{Deserialize, Serialize};

/// Metadata about a chunk's location in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Path of the source file.
    pub source: String,
    /// Page number (0-based).
    pub page: u32,
    /// Chunk index across the whole document (0-based).
    pub chunk_index: u32,
    /// Start byte offset in the page text.
    pub start_offset: u32,
    /// End byte offset in the page text.
    pub end_offset: u32,
}

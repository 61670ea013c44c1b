//! Split chunk type.

use sha2::{Digest, Sha256};

use super::ChunkMetadata;

/// A chunk of page text with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text content.
    pub text: String,
    /// Metadata about the chunk's position.
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Creates a new chunk.
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Returns the hex-encoded SHA-256 of the chunk text.
    pub fn content_sha256(&self) -> String {
        hex::encode(Sha256::digest(self.text.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash() {
        let chunk = Chunk::new("abc", ChunkMetadata::default());
        assert_eq!(
            chunk.content_sha256(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

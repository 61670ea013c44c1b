//! Text splitting for chunk creation.

mod chunk;
mod metadata;

use text_splitter::{ChunkConfig, TextSplitter};

pub use self::chunk::Chunk;
pub use self::metadata::ChunkMetadata;
use super::loader::Document;
use crate::{Error, Result, TRACING_TARGET};

/// Sliding-window splitter over characters with overlap.
#[derive(Debug, Clone)]
pub struct Splitter {
    chunk_size: usize,
    overlap: usize,
    trim: bool,
}

impl Splitter {
    /// Creates a new splitter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the overlap is not smaller than
    /// the chunk size.
    pub fn new(chunk_size: usize, overlap: usize, trim: bool) -> Result<Self> {
        let splitter = Self {
            chunk_size,
            overlap,
            trim,
        };
        splitter.chunk_config()?;

        tracing::debug!(target: TRACING_TARGET, chunk_size, overlap, trim, "Created text splitter");
        Ok(splitter)
    }

    /// Returns the maximum characters per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the overlap between chunks.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    fn chunk_config(&self) -> Result<ChunkConfig<text_splitter::Characters>> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunk size must be greater than 0"));
        }

        let config = ChunkConfig::new(self.chunk_size)
            .with_overlap(self.overlap)
            .map_err(|e| Error::config(format!("invalid chunk overlap: {e}")))?
            .with_trim(self.trim);
        Ok(config)
    }

    /// Splits each document independently.
    ///
    /// Chunk indexes run across all documents; offsets are byte offsets
    /// within the chunk's own page.
    pub fn split_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let splitter = TextSplitter::new(self.chunk_config()?);

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|document| {
                splitter
                    .chunk_indices(&document.page_content)
                    .map(move |(offset, text)| (document, offset, text))
            })
            .enumerate()
            .map(|(index, (document, offset, text))| {
                let metadata = ChunkMetadata {
                    source: document.metadata.source.clone(),
                    page: document.metadata.page,
                    chunk_index: index as u32,
                    start_offset: offset as u32,
                    end_offset: (offset + text.len()) as u32,
                };
                Chunk::new(text, metadata)
            })
            .collect();

        tracing::debug!(
            target: TRACING_TARGET,
            documents = documents.len(),
            chunks = chunks.len(),
            "Split documents into chunks"
        );
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str, page: u32) -> Document {
        Document::new(text, "doc.pdf", page)
    }

    #[test]
    fn invalid_overlap_is_config_error() {
        assert!(matches!(Splitter::new(100, 100, true), Err(Error::Config(_))));
        assert!(matches!(Splitter::new(100, 150, true), Err(Error::Config(_))));
        assert!(matches!(Splitter::new(0, 0, true), Err(Error::Config(_))));
    }

    #[test]
    fn chunks_respect_size() {
        let splitter = Splitter::new(50, 10, true).unwrap();
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(10);
        let chunks = splitter.split_documents(&[page(&text, 0)]).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 50);
            assert_eq!(chunk.text, chunk.text.trim());
        }
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let splitter = Splitter::new(40, 15, true).unwrap();
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let chunks = splitter.split_documents(&[page(text, 0)]).unwrap();

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            assert!(pair[1].metadata.start_offset < pair[0].metadata.end_offset);
        }
    }

    #[test]
    fn documents_split_independently() {
        let splitter = Splitter::new(1000, 150, true).unwrap();
        let documents = [page("First page text.", 0), page("Second page text.", 3)];
        let chunks = splitter.split_documents(&documents).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "First page text.");
        assert_eq!(chunks[0].metadata.page, 0);
        assert_eq!(chunks[1].metadata.page, 3);
        assert_eq!(chunks[1].metadata.chunk_index, 1);
        assert_eq!(chunks[1].metadata.start_offset, 0);
    }

    #[test]
    fn offsets_point_into_page() {
        let splitter = Splitter::new(1000, 0, true).unwrap();
        let text = "  Hello world  ";
        let chunks = splitter.split_documents(&[page(text, 0)]).unwrap();

        assert_eq!(chunks.len(), 1);
        let meta = &chunks[0].metadata;
        assert_eq!(&text[meta.start_offset as usize..meta.end_offset as usize], "Hello world");
    }
}

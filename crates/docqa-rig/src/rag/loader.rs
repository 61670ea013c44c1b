//! PDF loading, one document per page.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, TRACING_TARGET};

/// Text of a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted page text.
    pub page_content: String,
    /// Where the text came from.
    pub metadata: DocumentMetadata,
}

/// Origin of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Path of the source file.
    pub source: String,
    /// Page number (0-based).
    pub page: u32,
}

impl Document {
    /// Creates a page document.
    pub fn new(page_content: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: DocumentMetadata {
                source: source.into(),
                page,
            },
        }
    }
}

/// Loads a PDF and returns one [`Document`] per page that has text.
///
/// # Errors
///
/// Returns [`Error::DocumentNotFound`] when the file does not exist and
/// [`Error::Document`] when it cannot be parsed or contains no text.
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::DocumentNotFound(path.to_path_buf()),
        _ => Error::Io(err),
    })?;

    tracing::debug!(
        target: TRACING_TARGET,
        path = %path.display(),
        size = bytes.len(),
        "Loaded PDF file"
    );

    let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
        .await
        .map_err(|e| Error::document(format!("PDF extraction task failed: {e}")))??;

    let source = path.display().to_string();
    let documents = pages_to_documents(&source, pages)?;

    tracing::info!(
        target: TRACING_TARGET,
        path = %source,
        pages = documents.len(),
        "Extracted PDF pages"
    );
    Ok(documents)
}

/// Extracts per-page text; page order is preserved.
///
/// Uses lopdf page by page and falls back to pdf-extract when lopdf finds
/// no text at all.
fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let pages = lopdf_pages(bytes);
    if pages.iter().any(|text| !text.trim().is_empty()) {
        return Ok(pages);
    }

    tracing::debug!(target: TRACING_TARGET, "Falling back to pdf-extract");
    fallback_pages(bytes)
}

fn lopdf_pages(bytes: &[u8]) -> Vec<String> {
    let doc = match lopdf::Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(target: TRACING_TARGET, error = %err, "lopdf could not parse PDF");
            return Vec::new();
        }
    };

    doc.get_pages()
        .keys()
        .map(|&number| {
            doc.extract_text(&[number]).unwrap_or_else(|err| {
                tracing::warn!(
                    target: TRACING_TARGET,
                    page = number,
                    error = %err,
                    "Failed to extract page text"
                );
                String::new()
            })
        })
        .collect()
}

fn fallback_pages(bytes: &[u8]) -> Result<Vec<String>> {
    pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| Error::document(format!("failed to parse PDF: {e}")))
}

/// Drops blank pages, keeping the original 0-based page numbers.
fn pages_to_documents(source: &str, pages: Vec<String>) -> Result<Vec<Document>> {
    let documents: Vec<Document> = pages
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(page, text)| Document::new(text, source, page as u32))
        .collect();

    if documents.is_empty() {
        return Err(Error::document("no extractable text"));
    }

    Ok(documents)
}

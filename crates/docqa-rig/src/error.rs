//! Error types for docqa-rig.

use std::fmt;
use std::path::PathBuf;

use docqa_postgres::PgError;

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while ingesting or answering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An OpenAI or Gemini request failed.
    #[error("{provider} request failed: {message}")]
    Provider { provider: String, message: String },

    /// Embeddings came back malformed or mismatched.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Similarity search could not be served.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// The source document does not exist.
    #[error("document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// The source document could not be read or has no text.
    #[error("document error: {0}")]
    Document(String),

    /// Missing keys, unknown models or invalid settings.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The vector store rejected an operation.
    #[error("vector store error: {0}")]
    Storage(#[from] PgError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Error for a failed call to `provider` (`"openai"` or `"gemini"`).
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    pub fn embedding(message: impl fmt::Display) -> Self {
        Self::Embedding(message.to_string())
    }

    pub fn retrieval(message: impl fmt::Display) -> Self {
        Self::Retrieval(message.to_string())
    }

    pub fn document(message: impl fmt::Display) -> Self {
        Self::Document(message.to_string())
    }

    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Network and pool hiccups; a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider { .. } | Self::Io(_) => true,
            Self::Storage(err) => err.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_not_found_shows_path() {
        let err = Error::DocumentNotFound(PathBuf::from("missing.pdf"));
        assert_eq!(err.to_string(), "document not found: missing.pdf");
    }

    #[test]
    fn retryable_errors() {
        assert!(Error::provider("openai", "rate limited").is_retryable());
        assert!(!Error::config("bad overlap").is_retryable());
        assert!(!Error::document("no extractable text").is_retryable());
    }
}

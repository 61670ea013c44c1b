//! Embedding model references.

use serde::{Deserialize, Serialize};

/// Prefix Google uses for fully qualified model names.
const GEMINI_MODEL_PREFIX: &str = "models/";

/// Reference to an embedding model of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum EmbeddingModel {
    /// OpenAI embedding model.
    OpenAi { name: String, dimensions: usize },
    /// Google Gemini embedding model.
    Gemini { name: String, dimensions: usize },
}

impl EmbeddingModel {
    /// Creates an OpenAI model reference with its default dimensions.
    pub fn openai(name: impl Into<String>) -> Self {
        let name = name.into();
        let dimensions = default_dimensions(&name);
        Self::OpenAi { name, dimensions }
    }

    /// Creates a Gemini model reference with its default dimensions.
    ///
    /// A leading `models/` is stripped from the name.
    pub fn gemini(name: impl AsRef<str>) -> Self {
        let name = strip_gemini_prefix(name.as_ref()).to_owned();
        let dimensions = default_dimensions(&name);
        Self::Gemini { name, dimensions }
    }

    /// Overrides the embedding dimensions.
    pub fn with_dimensions(mut self, ndims: usize) -> Self {
        match &mut self {
            Self::OpenAi { dimensions, .. } | Self::Gemini { dimensions, .. } => {
                *dimensions = ndims;
            }
        }
        self
    }

    /// Returns the model name as sent to the provider.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi { name, .. } | Self::Gemini { name, .. } => name,
        }
    }

    /// Returns the embedding dimensions.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::OpenAi { dimensions, .. } | Self::Gemini { dimensions, .. } => *dimensions,
        }
    }
}

pub(crate) fn strip_gemini_prefix(name: &str) -> &str {
    name.strip_prefix(GEMINI_MODEL_PREFIX).unwrap_or(name)
}

/// Returns the output dimensions of a known embedding model.
///
/// Unknown OpenAI-style names fall back to 1536, anything else to 768.
pub fn default_dimensions(model: &str) -> usize {
    match strip_gemini_prefix(model) {
        "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
        "text-embedding-3-large" | "gemini-embedding-001" => 3072,
        "embedding-001" | "text-embedding-004" => 768,
        other if other.starts_with("text-embedding-") => 1536,
        _ => 768,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_defaults() {
        let model = EmbeddingModel::openai("text-embedding-3-small");
        assert_eq!(model.as_str(), "text-embedding-3-small");
        assert_eq!(model.dimensions(), 1536);
    }

    #[test]
    fn gemini_prefix_is_stripped() {
        let model = EmbeddingModel::gemini("models/embedding-001");
        assert_eq!(model.as_str(), "embedding-001");
        assert_eq!(model.dimensions(), 768);

        let bare = EmbeddingModel::gemini("text-embedding-004");
        assert_eq!(bare.as_str(), "text-embedding-004");
    }

    #[test]
    fn dimensions_override() {
        let model = EmbeddingModel::openai("text-embedding-3-large").with_dimensions(256);
        assert_eq!(model.dimensions(), 256);
    }

    #[test]
    fn known_dimensions() {
        assert_eq!(default_dimensions("text-embedding-3-large"), 3072);
        assert_eq!(default_dimensions("models/text-embedding-004"), 768);
        assert_eq!(default_dimensions("text-embedding-custom"), 1536);
        assert_eq!(default_dimensions("something-else"), 768);
    }
}

//! Provider selection from API keys and model names.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{
    ApiKeyCredentials, CompletionModel, CompletionProvider, Credentials, EmbeddingModel,
    EmbeddingProvider,
};
use crate::{Error, Result};

/// Message returned when neither API key is configured.
const NO_API_KEY: &str = "no API key configured; set OPENAI_API_KEY or GOOGLE_API_KEY";

/// API keys and model names for both supported providers.
///
/// Only one provider is used at a time: OpenAI when its key is set,
/// Google Gemini otherwise.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ProviderConfig {
    /// OpenAI API key
    #[cfg_attr(
        feature = "config",
        arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)
    )]
    pub openai_api_key: Option<String>,

    /// OpenAI embedding model
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openai-embedding-model",
            env = "OPENAI_EMBEDDING_MODEL",
            default_value = "text-embedding-3-small"
        )
    )]
    pub openai_embedding_model: String,

    /// OpenAI chat model
    #[cfg_attr(
        feature = "config",
        arg(
            long = "openai-chat-model",
            env = "OPENAI_CHAT_MODEL",
            default_value = "gpt-4o-mini"
        )
    )]
    pub openai_chat_model: String,

    /// Google API key
    #[cfg_attr(
        feature = "config",
        arg(long = "google-api-key", env = "GOOGLE_API_KEY", hide_env_values = true)
    )]
    pub google_api_key: Option<String>,

    /// Google embedding model
    #[cfg_attr(
        feature = "config",
        arg(
            long = "google-embedding-model",
            env = "GOOGLE_EMBEDDING_MODEL",
            default_value = "models/embedding-001"
        )
    )]
    pub google_embedding_model: String,

    /// Google chat model
    #[cfg_attr(
        feature = "config",
        arg(
            long = "google-chat-model",
            env = "GOOGLE_CHAT_MODEL",
            default_value = "gemini-2.5-flash-lite"
        )
    )]
    pub google_chat_model: String,

    /// Embedding dimensions (derived from the model name when unset)
    #[cfg_attr(
        feature = "config",
        arg(long = "embedding-dimensions", env = "EMBEDDING_DIMENSIONS")
    )]
    pub embedding_dimensions: Option<usize>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_embedding_model: "text-embedding-3-small".to_owned(),
            openai_chat_model: "gpt-4o-mini".to_owned(),
            google_api_key: None,
            google_embedding_model: "models/embedding-001".to_owned(),
            google_chat_model: "gemini-2.5-flash-lite".to_owned(),
            embedding_dimensions: None,
        }
    }
}

impl ProviderConfig {
    /// Sets the OpenAI API key.
    pub fn with_openai_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.openai_api_key = Some(api_key.into());
        self
    }

    /// Sets the Google API key.
    pub fn with_google_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.google_api_key = Some(api_key.into());
        self
    }

    /// Sets the embedding dimensions.
    pub fn with_embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = Some(dimensions);
        self
    }

    /// Selects credentials by key presence, OpenAI first.
    ///
    /// Empty or whitespace-only keys count as absent.
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(key) = non_empty(self.openai_api_key.as_deref()) {
            return Ok(Credentials::OpenAi(ApiKeyCredentials::new(key)));
        }

        if let Some(key) = non_empty(self.google_api_key.as_deref()) {
            return Ok(Credentials::Gemini(ApiKeyCredentials::new(key)));
        }

        Err(Error::config(NO_API_KEY))
    }

    /// Returns the embedding model matching the selected credentials.
    pub fn embedding_model(&self, credentials: &Credentials) -> EmbeddingModel {
        let model = match credentials {
            Credentials::OpenAi(_) => EmbeddingModel::openai(&self.openai_embedding_model),
            Credentials::Gemini(_) => EmbeddingModel::gemini(&self.google_embedding_model),
        };

        match self.embedding_dimensions {
            Some(dimensions) => model.with_dimensions(dimensions),
            None => model,
        }
    }

    /// Returns the chat model matching the selected credentials.
    pub fn completion_model(&self, credentials: &Credentials) -> CompletionModel {
        match credentials {
            Credentials::OpenAi(_) => CompletionModel::openai(&self.openai_chat_model),
            Credentials::Gemini(_) => CompletionModel::gemini(&self.google_chat_model),
        }
    }

    /// Builds the embedding provider for the selected credentials.
    pub fn embedding_provider(&self) -> Result<EmbeddingProvider> {
        let credentials = self.credentials()?;
        let model = self.embedding_model(&credentials);
        EmbeddingProvider::connect(model, credentials)
    }

    /// Builds the completion provider for the selected credentials.
    pub fn completion_provider(&self) -> Result<CompletionProvider> {
        let credentials = self.credentials()?;
        let model = self.completion_model(&credentials);
        CompletionProvider::connect(model, credentials)
    }
}

fn non_empty(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|key| !key.is_empty())
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "***");
        f.debug_struct("ProviderConfig")
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("openai_embedding_model", &self.openai_embedding_model)
            .field("openai_chat_model", &self.openai_chat_model)
            .field("google_api_key", &mask(&self.google_api_key))
            .field("google_embedding_model", &self.google_embedding_model)
            .field("google_chat_model", &self.google_chat_model)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_wins_when_both_keys_are_set() {
        let config = ProviderConfig::default()
            .with_openai_api_key("sk-test")
            .with_google_api_key("g-test");
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.provider(), "openai");
        assert_eq!(
            config.embedding_model(&credentials),
            EmbeddingModel::openai("text-embedding-3-small")
        );
        assert_eq!(
            config.completion_model(&credentials),
            CompletionModel::openai("gpt-4o-mini")
        );
    }

    #[test]
    fn empty_openai_key_falls_back_to_google() {
        let config = ProviderConfig::default()
            .with_openai_api_key("  ")
            .with_google_api_key("g-test");
        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.provider(), "gemini");

        let embedding = config.embedding_model(&credentials);
        assert_eq!(embedding.as_str(), "embedding-001");

        let completion = config.completion_model(&credentials);
        assert_eq!(completion.as_str(), "gemini-2.5-flash-lite");
        assert_eq!(completion.max_tokens(), Some(1000));
    }

    #[test]
    fn missing_keys_is_config_error() {
        let err = ProviderConfig::default().credentials().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY or GOOGLE_API_KEY"));

        assert!(ProviderConfig::default().embedding_provider().is_err());
        assert!(ProviderConfig::default().completion_provider().is_err());
    }

    #[test]
    fn dimensions_override_applies() {
        let config = ProviderConfig::default()
            .with_openai_api_key("sk-test")
            .with_embedding_dimensions(512);
        let credentials = config.credentials().unwrap();
        assert_eq!(config.embedding_model(&credentials).dimensions(), 512);
    }

    #[test]
    fn debug_hides_keys() {
        let config = ProviderConfig::default().with_openai_api_key("sk-secret");
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}

//! Embedding provider abstraction.

use std::sync::Arc;

use rig::embeddings::{Embedding, EmbeddingModel as RigEmbeddingModel};
use rig::prelude::EmbeddingsClient;
use rig::providers::{gemini, openai};

use super::embedder::Embedder;
use super::model::EmbeddingModel;
use crate::provider::Credentials;
use crate::{Error, Result, TRACING_TARGET};

/// Embedding provider that wraps the rig embedding model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<EmbeddingService>`.
#[derive(Clone)]
pub struct EmbeddingProvider(Arc<EmbeddingService>);

pub(crate) enum EmbeddingService {
    OpenAi {
        model: openai::EmbeddingModel,
        model_name: String,
    },
    Gemini {
        model: gemini::embedding::EmbeddingModel,
        model_name: String,
    },
}

impl EmbeddingProvider {
    /// Builds a provider for the given model.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the credentials belong to a
    /// different provider than the model, or a provider error when the
    /// client cannot be created.
    pub fn connect(params: EmbeddingModel, credentials: Credentials) -> Result<Self> {
        let inner = match (credentials, params) {
            (Credentials::OpenAi(c), EmbeddingModel::OpenAi { name, dimensions }) => {
                let client = openai::Client::new(&c.api_key)
                    .map_err(|e| Error::provider("openai", e.to_string()))?;
                EmbeddingService::OpenAi {
                    model: client.embedding_model_with_ndims(&name, dimensions),
                    model_name: name,
                }
            }
            (Credentials::Gemini(c), EmbeddingModel::Gemini { name, dimensions }) => {
                let client = gemini::Client::new(&c.api_key)
                    .map_err(|e| Error::provider("gemini", e.to_string()))?;
                EmbeddingService::Gemini {
                    model: client.embedding_model_with_ndims(&name, dimensions),
                    model_name: name,
                }
            }
            _ => return Err(Error::config("mismatched credentials and model provider")),
        };

        let provider = Self(Arc::new(inner));
        tracing::debug!(
            target: TRACING_TARGET,
            provider = provider.provider_name(),
            model = provider.model_name(),
            ndims = provider.ndims(),
            "Created embedding provider"
        );
        Ok(provider)
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { model_name, .. } => model_name,
            EmbeddingService::Gemini { model_name, .. } => model_name,
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { .. } => "openai",
            EmbeddingService::Gemini { .. } => "gemini",
        }
    }

    /// Returns the embedding dimensions.
    pub fn ndims(&self) -> usize {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { model, .. } => model.ndims(),
            EmbeddingService::Gemini { model, .. } => model.ndims(),
        }
    }

    /// Embeds multiple text documents.
    pub async fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Embedding>> {
        let result = match self.0.as_ref() {
            EmbeddingService::OpenAi { model, .. } => model.embed_texts(texts).await,
            EmbeddingService::Gemini { model, .. } => model.embed_texts(texts).await,
        };

        result.map_err(|e| Error::provider(self.provider_name(), e.to_string()))
    }
}

/// Converts rig's f64 embeddings into the f32 vectors pgvector stores.
fn into_vector(embedding: Embedding) -> Vec<f32> {
    embedding.vec.into_iter().map(|x| x as f32).collect()
}

#[async_trait::async_trait]
impl Embedder for EmbeddingProvider {
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let embeddings = self.embed_texts(texts).await?;
        Ok(embeddings.into_iter().map(into_vector).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_texts(vec![text.to_owned()])
            .await?
            .into_iter()
            .next()
            .map(into_vector)
            .ok_or_else(|| Error::embedding("provider returned no embedding for the query"))
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { model, model_name } => f
                .debug_struct("EmbeddingProvider::OpenAi")
                .field("model", model_name)
                .field("ndims", &model.ndims())
                .finish(),
            EmbeddingService::Gemini { model, model_name } => f
                .debug_struct("EmbeddingProvider::Gemini")
                .field("model", model_name)
                .field("ndims", &model.ndims())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ApiKeyCredentials;

    #[test]
    fn mismatched_provider_is_config_error() {
        let credentials = Credentials::Gemini(ApiKeyCredentials::new("g-test"));
        let model = EmbeddingModel::openai("text-embedding-3-small");
        let err = EmbeddingProvider::connect(model, credentials).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}

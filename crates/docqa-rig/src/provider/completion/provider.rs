//! Completion provider abstraction.

use std::sync::Arc;

use rig::completion::{AssistantContent, CompletionError, CompletionModel as RigCompletionModel};
use rig::one_or_many::OneOrMany;
use rig::prelude::CompletionClient;
use rig::providers::{gemini, openai};

use super::completer::Completer;
use super::model::CompletionModel;
use crate::provider::Credentials;
use crate::{Error, Result, TRACING_TARGET};

/// Completion provider that wraps the rig completion model implementations.
///
/// This is a cheaply cloneable wrapper around an `Arc<CompletionService>`.
#[derive(Clone)]
pub struct CompletionProvider(Arc<CompletionService>);

pub(crate) struct CompletionService {
    backend: CompletionBackend,
    model_name: String,
    temperature: f64,
    max_tokens: Option<u64>,
}

enum CompletionBackend {
    OpenAi(openai::CompletionModel),
    Gemini(gemini::completion::CompletionModel),
}

impl CompletionProvider {
    /// Builds a provider for the given model.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the credentials belong to a
    /// different provider than the model, or a provider error when the
    /// client cannot be created.
    pub fn connect(params: CompletionModel, credentials: Credentials) -> Result<Self> {
        let temperature = params.temperature();
        let max_tokens = params.max_tokens();

        let (backend, model_name) = match (credentials, params) {
            (Credentials::OpenAi(c), CompletionModel::OpenAi { name, .. }) => {
                let client = openai::Client::new(&c.api_key)
                    .map_err(|e| Error::provider("openai", e.to_string()))?
                    .completions_api();
                (
                    CompletionBackend::OpenAi(client.completion_model(&name)),
                    name,
                )
            }
            (Credentials::Gemini(c), CompletionModel::Gemini { name, .. }) => {
                let client = gemini::Client::new(&c.api_key)
                    .map_err(|e| Error::provider("gemini", e.to_string()))?;
                (
                    CompletionBackend::Gemini(client.completion_model(&name)),
                    name,
                )
            }
            _ => return Err(Error::config("mismatched credentials and model provider")),
        };

        let provider = Self(Arc::new(CompletionService {
            backend,
            model_name,
            temperature,
            max_tokens,
        }));

        tracing::debug!(
            target: TRACING_TARGET,
            provider = provider.provider_name(),
            model = provider.model_name(),
            temperature,
            max_tokens,
            "Created completion provider"
        );
        Ok(provider)
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.0.model_name
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.backend {
            CompletionBackend::OpenAi(_) => "openai",
            CompletionBackend::Gemini(_) => "gemini",
        }
    }

    /// Sends a completion request with the given prompt.
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        let service = self.0.as_ref();
        let map_err =
            |e: CompletionError| Error::provider(self.provider_name(), e.to_string());

        match &service.backend {
            CompletionBackend::OpenAi(model) => model
                .completion_request(prompt)
                .temperature(service.temperature)
                .max_tokens_opt(service.max_tokens)
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
            CompletionBackend::Gemini(model) => model
                .completion_request(prompt)
                .temperature(service.temperature)
                .max_tokens_opt(service.max_tokens)
                .send()
                .await
                .map(|r| extract_text_content(&r.choice))
                .map_err(map_err),
        }
    }
}

/// Extracts text content from assistant content choices.
fn extract_text_content(choice: &OneOrMany<AssistantContent>) -> String {
    choice
        .iter()
        .filter_map(|content| match content {
            AssistantContent::Text(text) => Some(text.text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

#[async_trait::async_trait]
impl Completer for CompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompt(prompt).await
    }
}

impl std::fmt::Debug for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0.backend {
            CompletionBackend::OpenAi(_) => "CompletionProvider::OpenAi",
            CompletionBackend::Gemini(_) => "CompletionProvider::Gemini",
        };
        f.debug_struct(name)
            .field("model", &self.0.model_name)
            .field("temperature", &self.0.temperature)
            .field("max_tokens", &self.0.max_tokens)
            .finish()
    }
}

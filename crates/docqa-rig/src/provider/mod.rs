//! Embedding and completion providers.
//!
//! Exactly one provider backs both models. [`ProviderConfig`] picks it from
//! the configured API keys, OpenAI first and Google Gemini second.

mod completion;
mod config;
mod credentials;
mod embedding;

pub use completion::{Completer, CompletionModel, CompletionProvider};
pub use config::ProviderConfig;
pub use credentials::{ApiKeyCredentials, Credentials};
pub use embedding::{EmbeddingModel, EmbeddingProvider, Embedder, default_dimensions};

//! Embedding models and providers.

mod embedder;
mod model;
mod provider;

pub use embedder::Embedder;
pub use model::{EmbeddingModel, default_dimensions};
pub use provider::EmbeddingProvider;
pub(crate) use model::strip_gemini_prefix;

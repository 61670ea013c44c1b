//! Completion models and providers.

mod completer;
mod model;
mod provider;

pub use completer::Completer;
pub use model::CompletionModel;
pub use provider::CompletionProvider;

//! Completion seam used by the chat service.

use crate::Result;

/// Sends a single prompt to a chat model and returns its text answer.
#[async_trait::async_trait]
pub trait Completer: Send + Sync {
    /// Completes the prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

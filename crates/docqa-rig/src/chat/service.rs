//! Chat service answering questions from retrieved context.

use std::sync::Arc;

use crate::provider::Completer;
use crate::rag::RagService;
use crate::{Result, TRACING_TARGET};

/// Outcome of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Nothing relevant is stored; the model was not called.
    NoContext,
    /// The model's answer.
    Response(String),
}

/// Answers questions by prompting a chat model with retrieved chunks.
#[derive(Clone)]
pub struct ChatService {
    rag: RagService,
    completer: Arc<dyn Completer>,
}

impl ChatService {
    /// Creates a new chat service.
    pub fn new(rag: RagService, completer: Arc<dyn Completer>) -> Self {
        Self { rag, completer }
    }

    /// Answers a single question.
    #[tracing::instrument(skip_all, target = TRACING_TARGET)]
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let Some(prompt) = self.rag.search_prompt(question).await? else {
            return Ok(Answer::NoContext);
        };

        let response = self.completer.complete(&prompt).await?;
        tracing::debug!(
            target: TRACING_TARGET,
            prompt_len = prompt.len(),
            response_len = response.len(),
            "Answered question"
        );
        Ok(Answer::Response(response))
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("rag", &self.rag)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::mock::{MemoryStore, MockCompleter, MockEmbedder};
    use crate::rag::{Document, RagConfig};

    fn rag() -> RagService {
        RagService::new(
            Arc::new(MockEmbedder::default()),
            Arc::new(MemoryStore::default()),
            RagConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn no_context_skips_model() {
        let completer = Arc::new(MockCompleter::new("unused"));
        let chat = ChatService::new(rag(), completer.clone());

        assert_eq!(chat.answer("Qual o faturamento?").await.unwrap(), Answer::NoContext);
        assert!(completer.prompts().is_empty());
    }

    #[tokio::test]
    async fn answers_from_context() {
        let rag = rag();
        rag.ingest_documents(&[Document::new("Faturamento de 10 milhões.", "doc.pdf", 0)])
            .await
            .unwrap();

        let completer = Arc::new(MockCompleter::new("10 milhões"));
        let chat = ChatService::new(rag, completer.clone());

        let answer = chat.answer("Qual o faturamento?").await.unwrap();
        assert_eq!(answer, Answer::Response("10 milhões".to_owned()));

        let prompts = completer.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Faturamento de 10 milhões."));
        assert!(prompts[0].contains("Qual o faturamento?"));
    }

    #[tokio::test]
    async fn completion_errors_propagate() {
        let rag = rag();
        rag.ingest_documents(&[Document::new("Some context.", "doc.pdf", 0)])
            .await
            .unwrap();

        let chat = ChatService::new(rag, Arc::new(MockCompleter::failing()));
        let err = chat.answer("question").await.unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }
}

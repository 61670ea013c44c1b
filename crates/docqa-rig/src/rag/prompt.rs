//! Prompt assembly for grounded answers.

use super::searcher::RetrievedChunk;

/// Answer the model must give when the context does not cover the question.
pub const NO_INFORMATION_ANSWER: &str =
    "Não tenho informações necessárias para responder sua pergunta.";

const CONTEXT_SLOT: &str = "{contexto}";
const QUESTION_SLOT: &str = "{pergunta}";

const PROMPT_TEMPLATE: &str = r#"CONTEXTO:
{contexto}

REGRAS:
- Responda somente com base no CONTEXTO.
- Se a informação não estiver explicitamente no CONTEXTO, responda:
  "Não tenho informações necessárias para responder sua pergunta."
- Nunca invente ou use conhecimento externo.
- Nunca produza opiniões ou interpretações além do que está escrito.

EXEMPLOS DE PERGUNTAS FORA DO CONTEXTO:
Pergunta: "Qual é a capital da França?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

Pergunta: "Quantos clientes temos em 2024?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

Pergunta: "Você acha isso bom ou ruim?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

PERGUNTA DO USUÁRIO:
{pergunta}

RESPONDA A "PERGUNTA DO USUÁRIO"
"#;

/// Builder for the grounded answer prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    context_chunks: Vec<RetrievedChunk>,
    question: String,
}

impl PromptBuilder {
    /// Creates an empty prompt builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds retrieved context chunks, in rank order.
    pub fn with_context(mut self, chunks: Vec<RetrievedChunk>) -> Self {
        self.context_chunks = chunks;
        self
    }

    /// Sets the user question.
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    /// Returns the chunk texts joined by a blank line.
    pub fn context(&self) -> String {
        self.context_chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Builds the final prompt.
    pub fn build(&self) -> String {
        // The context slot precedes the question slot, so neither value is re-substituted.
        PROMPT_TEMPLATE
            .replacen(QUESTION_SLOT, &self.question, 1)
            .replacen(CONTEXT_SLOT, &self.context(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::splitter::ChunkMetadata;

    fn chunk(text: &str, score: f64) -> RetrievedChunk {
        RetrievedChunk::new(text, score, ChunkMetadata::default())
    }

    #[test]
    fn context_joined_in_rank_order() {
        let builder = PromptBuilder::new()
            .with_context(vec![chunk("first", 0.9), chunk("second", 0.8)])
            .with_question("Qual o faturamento?");

        assert_eq!(builder.context(), "first\n\nsecond");

        let prompt = builder.build();
        assert!(prompt.starts_with("CONTEXTO:\nfirst\n\nsecond\n\nREGRAS:"));
        assert!(prompt.contains("PERGUNTA DO USUÁRIO:\nQual o faturamento?\n"));
        assert!(prompt.ends_with("RESPONDA A \"PERGUNTA DO USUÁRIO\"\n"));
    }

    #[test]
    fn refusal_sentence_and_examples_present() {
        let prompt = PromptBuilder::new()
            .with_context(vec![chunk("ctx", 1.0)])
            .with_question("q")
            .build();

        assert_eq!(prompt.matches(NO_INFORMATION_ANSWER).count(), 4);
        assert!(prompt.contains("Pergunta: \"Qual é a capital da França?\""));
        assert!(prompt.contains("Pergunta: \"Quantos clientes temos em 2024?\""));
        assert!(prompt.contains("Pergunta: \"Você acha isso bom ou ruim?\""));
    }

    #[test]
    fn slot_text_inside_context_is_kept_verbatim() {
        let prompt = PromptBuilder::new()
            .with_context(vec![chunk("literal {pergunta} here", 1.0)])
            .with_question("real question")
            .build();

        assert!(prompt.contains("literal {pergunta} here"));
        assert!(prompt.contains("PERGUNTA DO USUÁRIO:\nreal question\n"));
    }
}

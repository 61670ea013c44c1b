//! Interactive chat subcommand.

use std::future::Future;

use anyhow::Context;
use docqa_rig::Error;
use docqa_rig::chat::{Answer, ChatInput, ChatService};
use docqa_rig::rag::RagService;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::{chat_service, connect_rag};
use crate::TRACING_TARGET_CHAT;
use crate::config::Cli;

/// Prompt printed before each question.
pub(crate) const PROMPT: &str = "Faça sua pergunta: ";

/// Printed when nothing relevant is stored.
pub(crate) const NO_CONTEXT_HINT: &str =
    "Nenhum contexto encontrado no banco de dados. Realize a ingestão primeiro.";

/// Formats a model answer for display.
pub(crate) fn answer_line(response: &str) -> String {
    format!("RESPOSTA: {response}")
}

/// User-facing message for a failed ingestion.
pub(crate) fn ingest_error_line(err: &Error) -> String {
    if err.is_retryable() {
        format!("Erro temporário na ingestão: {err}. Tente novamente com `docqa ingest --reset`.")
    } else {
        format!("Erro na ingestão: {err}")
    }
}

/// Resolves on the first Ctrl-C.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: TRACING_TARGET_CHAT, error = %err, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let rag = connect_rag(cli).await?;
    ensure_ingested(&rag).await;

    let chat = chat_service(cli, rag)?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    chat_loop(&chat, stdin, &mut stdout, interrupted()).await
}

/// Ingests the PDF when the collection is empty.
///
/// Failures are reported and the chat starts anyway.
async fn ensure_ingested(rag: &RagService) {
    if rag.is_ingested().await {
        println!("Documentos já ingeridos. Pulando a etapa de ingestão...");
        return;
    }

    println!("Executando a ingestão de documentos pela primeira vez...");
    match rag.ingest_pdf().await {
        Ok(report) => println!(
            "Ingestão concluída com sucesso! {} páginas, {} chunks, {} lotes.",
            report.pages, report.chunks, report.batches
        ),
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET_CHAT,
                error = %err,
                retryable = err.is_retryable(),
                "Startup ingestion failed"
            );
            println!("{}", ingest_error_line(&err));
        }
    }
}

/// Reads questions line by line and writes answers until exit or EOF.
///
/// `shutdown` is polled for the whole session, including while an answer is
/// pending; once it resolves the session ends without printing that answer.
pub(crate) async fn chat_loop<R, W, S>(
    chat: &ChatService,
    input: R,
    output: &mut W,
    shutdown: S,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut shutdown = std::pin::pin!(shutdown);

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let line = tokio::select! {
            biased;
            () = &mut shutdown => {
                tracing::info!(target: TRACING_TARGET_CHAT, "Interrupted while waiting for input");
                break;
            }
            line = lines.next_line() => line.context("failed to read input")?,
        };

        let Some(line) = line else {
            break;
        };

        let question = match ChatInput::parse(&line) {
            ChatInput::Exit => break,
            ChatInput::Skip => continue,
            ChatInput::Question(question) => question,
        };

        let answer = tokio::select! {
            biased;
            () = &mut shutdown => {
                tracing::info!(target: TRACING_TARGET_CHAT, "Interrupted while answering");
                break;
            }
            answer = chat.answer(&question) => answer,
        };

        let message = match answer {
            Ok(Answer::NoContext) => NO_CONTEXT_HINT.to_owned(),
            Ok(Answer::Response(response)) => answer_line(&response),
            Err(err) => {
                tracing::warn!(target: TRACING_TARGET_CHAT, error = %err, "Failed to answer question");
                format!("Erro durante a execução do chat: {err}")
            }
        };

        output.write_all(message.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }

    output.write_all(b"\n").await?;
    output.flush().await?;
    tracing::debug!(target: TRACING_TARGET_CHAT, "Chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use docqa_rig::mock::{MemoryStore, MockCompleter, MockEmbedder};
    use docqa_rig::rag::{Document, RagConfig};

    use super::*;

    async fn chat(completer: MockCompleter, ingest: bool) -> ChatService {
        let rag = RagService::new(
            Arc::new(MockEmbedder::default()),
            Arc::new(MemoryStore::default()),
            RagConfig::default(),
        )
        .unwrap();

        if ingest {
            rag.ingest_documents(&[Document::new("A receita foi de 10 milhões.", "doc.pdf", 0)])
                .await
                .unwrap();
        }

        ChatService::new(rag, Arc::new(completer))
    }

    async fn transcript(chat: &ChatService, input: &str) -> String {
        let mut output = Vec::new();
        chat_loop(chat, input.as_bytes(), &mut output, std::future::pending())
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn answers_until_exit() {
        let chat = chat(MockCompleter::new("10 milhões"), true).await;
        let out = transcript(&chat, "Qual a receita?\nSAIR\nnever asked\n").await;

        assert_eq!(out.matches(PROMPT).count(), 2);
        assert!(out.contains("RESPOSTA: 10 milhões\n"));
        assert!(!out.contains("never asked"));
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let completer = MockCompleter::new("ok");
        let chat = chat(completer, true).await;
        let out = transcript(&chat, "\n   \nquit\n").await;

        assert_eq!(out.matches(PROMPT).count(), 3);
        assert!(!out.contains("RESPOSTA"));
    }

    #[tokio::test]
    async fn eof_ends_session() {
        let chat = chat(MockCompleter::new("ok"), true).await;
        let out = transcript(&chat, "Qual a receita?").await;

        assert!(out.contains("RESPOSTA: ok\n"));
        assert_eq!(out.matches(PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn empty_store_prints_hint() {
        let chat = chat(MockCompleter::new("unused"), false).await;
        let out = transcript(&chat, "Qual a receita?\nexit\n").await;

        assert!(out.contains(NO_CONTEXT_HINT));
    }

    #[tokio::test]
    async fn errors_do_not_end_session() {
        let chat = chat(MockCompleter::failing(), true).await;
        let out = transcript(&chat, "primeira?\nsegunda?\n").await;

        assert_eq!(out.matches("Erro durante a execução do chat").count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_while_answering_ends_session() {
        let chat = chat(MockCompleter::stalled(), true).await;
        let shutdown = tokio::time::sleep(Duration::from_secs(1));

        let mut output = Vec::new();
        chat_loop(&chat, "receita?\nsegunda receita?\n".as_bytes(), &mut output, shutdown)
            .await
            .unwrap();
        let out = String::from_utf8(output).unwrap();

        assert_eq!(out.matches(PROMPT).count(), 1);
        assert!(!out.contains("RESPOSTA"));
    }

    #[tokio::test]
    async fn shutdown_before_input_answers_nothing() {
        let completer = Arc::new(MockCompleter::new("ok"));
        let rag = RagService::new(
            Arc::new(MockEmbedder::default()),
            Arc::new(MemoryStore::default()),
            RagConfig::default(),
        )
        .unwrap();
        let chat = ChatService::new(rag, completer.clone());

        let mut output = Vec::new();
        chat_loop(&chat, "receita?\n".as_bytes(), &mut output, std::future::ready(()))
            .await
            .unwrap();

        assert!(completer.prompts().is_empty());
    }

    #[test]
    fn transient_ingestion_errors_suggest_retry() {
        let transient = ingest_error_line(&Error::provider("openai", "429 Too Many Requests"));
        assert!(transient.contains("docqa ingest --reset"));

        let permanent = ingest_error_line(&Error::document("no extractable text"));
        assert!(permanent.starts_with("Erro na ingestão"));
        assert!(!permanent.contains("--reset"));
    }
}

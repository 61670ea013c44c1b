//! Subcommands and the wiring they share.

mod ask;
mod chat;
mod ingest;
mod search;

use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use docqa_postgres::run_pending_migrations;
use docqa_rig::chat::ChatService;
use docqa_rig::rag::{PgVectorStore, RagService};

use crate::TRACING_TARGET_STARTUP;
use crate::config::Cli;

/// Available subcommands.
#[derive(Debug, Clone, Default, Subcommand)]
pub enum Command {
    /// Interactive chat; ingests the PDF first when the collection is empty.
    #[default]
    Chat,

    /// Ingest the PDF, even if the collection already has data.
    Ingest {
        /// Remove stored chunks before ingesting.
        #[arg(long)]
        reset: bool,
    },

    /// Answer a single question and exit.
    Ask {
        /// The question.
        question: String,
    },

    /// Print the chunks retrieved for a query, with scores.
    Search {
        /// The query text.
        query: String,

        /// Number of chunks to return (defaults to SEARCH_TOP_K).
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
}

impl Command {
    /// Runs the command.
    pub async fn run(self, cli: &Cli) -> anyhow::Result<()> {
        match self {
            Self::Chat => chat::run(cli).await,
            Self::Ingest { reset } => ingest::run(cli, reset).await,
            Self::Ask { question } => ask::run(cli, &question).await,
            Self::Search { query, limit } => search::run(cli, &query, limit).await,
        }
    }
}

/// Connects to Postgres, applies migrations and builds the RAG service.
pub(crate) async fn connect_rag(cli: &Cli) -> anyhow::Result<RagService> {
    let pg = cli
        .postgres
        .clone()
        .build()
        .context("failed to create database client")?;

    pg.ping().await.context("database is unreachable")?;

    run_pending_migrations(&pg)
        .await
        .context("failed to run database migrations")?;

    let store = PgVectorStore::open(pg, &cli.rag.collection_name)
        .await
        .context("failed to open vector collection")?;

    let embedder = cli
        .providers
        .embedding_provider()
        .context("failed to create embedding model")?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        provider = embedder.provider_name(),
        model = embedder.model_name(),
        collection = %cli.rag.collection_name,
        "Connected to vector store"
    );

    let rag = RagService::new(Arc::new(embedder), Arc::new(store), cli.rag.clone())?;
    Ok(rag)
}

/// Builds the chat service on top of a RAG service.
pub(crate) fn chat_service(cli: &Cli, rag: RagService) -> anyhow::Result<ChatService> {
    let completer = cli
        .providers
        .completion_provider()
        .context("failed to create chat model")?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        provider = completer.provider_name(),
        model = completer.model_name(),
        "Chat model ready"
    );

    Ok(ChatService::new(rag, Arc::new(completer)))
}

//! `ingest` subcommand.

use anyhow::Context;

use super::connect_rag;
use crate::config::Cli;

pub async fn run(cli: &Cli, reset: bool) -> anyhow::Result<()> {
    let rag = connect_rag(cli).await?;

    if reset {
        let removed = rag.reset().await.context("failed to clear vector collection")?;
        println!("Removidos {removed} chunks da coleção '{}'.", cli.rag.collection_name);
    }

    println!("Carregando documento de: {}", cli.rag.pdf_path.display());
    let report = match rag.ingest_pdf().await {
        Ok(report) => report,
        Err(err) if err.is_retryable() => {
            return Err(anyhow::Error::new(err)
                .context("ingestion failed; rerun with `docqa ingest --reset`"));
        }
        Err(err) => return Err(anyhow::Error::new(err).context("ingestion failed")),
    };
    println!(
        "Ingestão concluída com sucesso! {} páginas, {} chunks, {} lotes.",
        report.pages, report.chunks, report.batches
    );
    Ok(())
}

//! `search` subcommand.

use anyhow::Context;

use super::connect_rag;
use crate::config::Cli;

pub async fn run(cli: &Cli, query: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let rag = connect_rag(cli).await?;
    let k = limit.unwrap_or(cli.rag.search_top_k);

    let results = rag.search(query, k).await.context("search failed")?;
    if results.is_empty() {
        println!("Nenhum resultado encontrado.");
        return Ok(());
    }

    for (rank, chunk) in results.iter().enumerate() {
        println!(
            "[{}] score={:.4} page={} chunk={}",
            rank + 1,
            chunk.score,
            chunk.page(),
            chunk.metadata.chunk_index
        );
        println!("{}\n", chunk.text);
    }
    Ok(())
}

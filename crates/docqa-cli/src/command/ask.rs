//! `ask` subcommand.

use anyhow::Context;
use docqa_rig::chat::Answer;

use super::chat::{NO_CONTEXT_HINT, answer_line};
use super::{chat_service, connect_rag};
use crate::config::Cli;

/// Trims a one-shot question.
///
/// Words that end the interactive chat (`sair`, `exit`, `quit`) are ordinary
/// questions here.
fn one_shot_question(raw: &str) -> Option<&str> {
    let question = raw.trim();
    (!question.is_empty()).then_some(question)
}

pub async fn run(cli: &Cli, question: &str) -> anyhow::Result<()> {
    let Some(question) = one_shot_question(question) else {
        anyhow::bail!("the question must not be empty");
    };

    let rag = connect_rag(cli).await?;
    let chat = chat_service(cli, rag)?;

    match chat.answer(question).await.context("failed to answer")? {
        Answer::NoContext => println!("{NO_CONTEXT_HINT}"),
        Answer::Response(response) => println!("{}", answer_line(&response)),
    }
    Ok(())
}

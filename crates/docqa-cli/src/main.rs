#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;

use std::process;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "docqa_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "docqa_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "docqa_cli::config";
pub const TRACING_TARGET_CHAT: &str = "docqa_cli::chat";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        let error = format!("{error:#}");
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    Cli::init_tracing();

    cli.log();
    cli.validate()?;

    let command = cli.command.clone().unwrap_or_default();
    command.run(&cli).await
}

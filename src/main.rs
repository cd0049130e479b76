//! wsd entry point.
//!
//! Parses flags, runs one session against the configured endpoint and exits
//! with the status implied by how the session ended.

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wsd::cli::Cli;
use wsd::config::ClientConfig;
use wsd::console::StdConsole;
use wsd::session::{Session, SessionOutcome};

#[tokio::main]
async fn main() {
    // Initialize tracing (stderr; stdout carries the session)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config(std::io::stdout().is_terminal());

    let code = match run(config).await {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    };

    // A blocking stdin read cannot be cancelled, so the runtime is not
    // waited on.
    std::process::exit(code);
}

async fn run(config: ClientConfig) -> anyhow::Result<SessionOutcome> {
    Session::new(config, StdConsole)
        .run(tokio::io::stdin(), interrupted())
        .await
        .context("websocket session failed")
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

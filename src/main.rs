//! `anki-mcp`: serves the AnkiConnect tools over stdio.
//!
//! Logs go to stderr; stdout carries the protocol.

use anki_mcp::{AnkiClient, Bridge, Dispatcher};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!("fatal error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let client = AnkiClient::from_env()?;
    tracing::info!(url = %client.options().url, "Anki MCP server running on stdio");

    let bridge = Bridge::new(Dispatcher::new(client));
    let running = bridge.start(rmcp::transport::stdio()).await?;
    running.wait().await?;
    Ok(())
}

//! Gatekeeper Server - Main Entry Point
//!
//! Startup wiring only: the chat command front end and the verification
//! web flow attach to the state built here and live outside this crate.

use anyhow::Result;
use tracing::info;

use gk_server::{config, ledger};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gk_server=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Gatekeeper Server"
    );

    // Open the ledger and force an initial load so a corrupt document is
    // repaired (and reported) at startup rather than on the first command.
    let store = ledger::LedgerStore::open(&config);
    let doc = store.load().await?;

    info!(
        path = %store.path().display(),
        identities = doc.identities.len(),
        codes = doc.codes.len(),
        banned = doc.banned.len(),
        "Ledger ready"
    );

    Ok(())
}

//! # veritas-api: Binary Entry Point
//!
//! Initializes the ledger connection from the environment, then serves the
//! HTTP API. The ledger client is shut down after the server stops.

use veritas_api::middleware::tracing_layer;
use veritas_api::state::{AppConfig, AppState};
use veritas_ledger::{ConfigError, LedgerClient, LedgerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    tracing_layer::init_subscriber(config.json_logs);

    let ledger_config = match LedgerConfig::from_env() {
        Ok(cfg) => Some(cfg),
        Err(ConfigError::MissingSignerKey) => {
            tracing::warn!("LEDGER_SIGNER_KEY not set; ledger unavailable");
            None
        }
        Err(e) => {
            tracing::warn!("ledger unavailable: {e}");
            None
        }
    };
    let ledger = LedgerClient::connect(ledger_config).await;
    tracing::info!(state = %ledger.state(), "ledger client ready");

    let state = AppState::new(config.clone(), ledger.clone());
    let app = veritas_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Veritas API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ledger.shutdown();
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

//! # Ledger Subcommand
//!
//! Runs the same initialization as the API server and reports the
//! resulting connection state.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use veritas_ledger::{ConfigError, ConnectionState, LedgerClient, LedgerConfig};

#[derive(Args, Debug)]
pub struct LedgerArgs {
    #[command(subcommand)]
    pub command: LedgerCommand,
}

#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    /// Connect using LEDGER_* environment variables and print the mode.
    Status,
}

pub fn run_ledger(args: &LedgerArgs) -> Result<u8> {
    match args.command {
        LedgerCommand::Status => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            runtime.block_on(cmd_status())
        }
    }
}

async fn cmd_status() -> Result<u8> {
    let config = match LedgerConfig::from_env() {
        Ok(cfg) => Some(cfg),
        Err(ConfigError::MissingSignerKey) => None,
        Err(e) => {
            tracing::warn!("ledger configuration rejected: {e}");
            None
        }
    };
    let endpoint = config.as_ref().map(|c| c.rpc_url.to_string());

    let client = LedgerClient::connect(config).await;
    let state = client.state();
    println!("ledger: {state}");
    if let Some(endpoint) = endpoint {
        println!("endpoint: {endpoint}");
    }

    if state == ConnectionState::Connected {
        let total = client
            .get_total_requests()
            .await
            .context("failed to read request count")?;
        println!("total requests: {total}");
    }
    client.shutdown();
    Ok(0)
}

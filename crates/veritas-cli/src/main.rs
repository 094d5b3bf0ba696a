//! # veritas CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veritas_cli::hash::{run_hash, HashArgs};
use veritas_cli::ledger::{run_ledger, LedgerArgs};
use veritas_cli::proof::{run_proof, ProofArgs};

/// Veritas operator CLI.
#[derive(Parser, Debug)]
#[command(name = "veritas", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the Keccak-256 prompt hash.
    Hash(HashArgs),

    /// Generate or check proof tokens.
    Proof(ProofArgs),

    /// Ledger connectivity.
    Ledger(LedgerArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Hash(args) => run_hash(&args),
        Commands::Proof(args) => run_proof(&args),
        Commands::Ledger(args) => run_ledger(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

//! # veritas-cli: Operator CLI
//!
//! ## Subcommands
//!
//! - `veritas hash <PROMPT>`: print the prompt hash registered on the ledger.
//! - `veritas proof generate|verify`: produce or structurally check a proof token.
//! - `veritas ledger status`: connect using the environment and report the mode.
//!
//! Handlers return the process exit code.

pub mod hash;
pub mod ledger;
pub mod proof;

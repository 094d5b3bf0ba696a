//! # Proof Subcommand
//!
//! Generates proof tokens and checks their shape. Verification does not
//! recompute the digest; a token passes when prefix and length match.

use anyhow::Result;
use clap::{Args, Subcommand};
use veritas_crypto::{generate_proof, verify_proof, PROOF_PREFIX, PROOF_TOKEN_LEN};

#[derive(Args, Debug)]
pub struct ProofArgs {
    #[command(subcommand)]
    pub command: ProofCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProofCommand {
    /// Produce a fresh token for a prompt/answer pair.
    Generate {
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        answer: String,
    },

    /// Check a token's shape. Exits 1 when it is not well-formed.
    Verify {
        token: String,
        #[arg(long, default_value = "")]
        prompt: String,
        #[arg(long, default_value = "")]
        answer: String,
    },
}

pub fn run_proof(args: &ProofArgs) -> Result<u8> {
    match &args.command {
        ProofCommand::Generate { prompt, answer } => {
            println!("{}", generate_proof(prompt, answer));
            Ok(0)
        }
        ProofCommand::Verify {
            token,
            prompt,
            answer,
        } => {
            let (verdict, code) = check(token, prompt, answer);
            println!("{verdict}");
            if code != 0 {
                tracing::debug!(
                    expected_prefix = PROOF_PREFIX,
                    expected_len = PROOF_TOKEN_LEN,
                    actual_len = token.len(),
                    "token rejected"
                );
            }
            Ok(code)
        }
    }
}

fn check(token: &str, prompt: &str, answer: &str) -> (&'static str, u8) {
    if verify_proof(token, prompt, answer) {
        ("valid", 0)
    } else {
        ("invalid", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_checks_valid() {
        let token = generate_proof("p", "a");
        assert_eq!(check(token.as_str(), "", ""), ("valid", 0));
    }

    #[test]
    fn short_token_is_invalid() {
        assert_eq!(check("0gproof-abc", "", ""), ("invalid", 1));
    }
}

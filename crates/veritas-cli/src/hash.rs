//! `veritas hash`.

use anyhow::Result;
use clap::Args;
use veritas_core::PromptHash;

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Prompt text. Hashed byte-for-byte, no normalization.
    pub prompt: String,
}

pub fn run_hash(args: &HashArgs) -> Result<u8> {
    println!("{}", PromptHash::of(&args.prompt));
    Ok(0)
}

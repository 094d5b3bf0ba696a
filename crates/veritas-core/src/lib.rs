//! # veritas-core: Foundational Types for Veritas
//!
//! Leaf crate of the workspace. Defines the identifiers and digests that
//! flow between the request coordinator, the ledger client, and the proof
//! codec. Every other `veritas-*` crate depends on it; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for ledger primitives.** `RequestId`, `LedgerAddress` and
//!    `PromptHash` are distinct types. A ledger-assigned request id cannot be
//!    confused with a count or a block number.
//!
//! 2. **One prompt digest.** `PromptHash::of()` is the only way to hash a
//!    prompt. It is Keccak-256 over the raw UTF-8 bytes, with no
//!    normalization, so identical prompts always commit to identical hashes.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is always UTC, seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `veritas-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use digest::PromptHash;
pub use error::ValidationError;
pub use identity::{LedgerAddress, RequestId};
pub use temporal::Timestamp;

//! # veritas-crypto: Proof Codec
//!
//! Produces and structurally checks the proof tokens that accompany every
//! generated answer. A token is the literal prefix [`PROOF_PREFIX`]
//! followed by the hex SHA-256 of `prompt || answer || generation time`.
//!
//! ## Limitation
//!
//! Tokens are not bound to the ledger transaction that records them, and
//! [`verify_proof`] checks shape only. Any string with the right prefix and
//! length passes. Callers needing provenance must not rely on this codec.

pub mod proof;

pub use proof::{
    generate_proof, generate_proof_at, verify_proof, ProofError, ProofToken, PROOF_DIGEST_HEX_LEN,
    PROOF_PREFIX, PROOF_TOKEN_LEN,
};

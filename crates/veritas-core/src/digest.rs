//! # Prompt Digest
//!
//! Defines `PromptHash`, the 32-byte commitment to a prompt that is
//! registered on the ledger by `createRequest`.
//!
//! ## Invariant
//!
//! `PromptHash::of()` is a pure function of the prompt's UTF-8 bytes.
//! There is no trimming, case folding, or Unicode normalization: two
//! prompts hash equal if and only if their bytes are equal (modulo
//! Keccak-256 collisions).
//!
//! ## Wire Form
//!
//! Rendered and parsed as `0x` followed by 64 lowercase hex characters,
//! the form the ledger contract expects for a `bytes32` argument.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::error::ValidationError;

/// Width of a prompt hash in bytes.
pub const PROMPT_HASH_LEN: usize = 32;

/// Keccak-256 digest of a prompt.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptHash([u8; PROMPT_HASH_LEN]);

impl PromptHash {
    /// Hash a prompt.
    pub fn of(prompt: &str) -> Self {
        Self(keccak256(prompt.as_bytes()))
    }

    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; PROMPT_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; PROMPT_HASH_LEN] {
        &self.0
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        encode_prefixed_hex(&self.0)
    }

    /// Parse from `0x`-prefixed hex.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let bytes = decode_prefixed_hex(s)?;
        let array: [u8; PROMPT_HASH_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| ValidationError::InvalidLength {
                    expected: PROMPT_HASH_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }
}

impl std::fmt::Display for PromptHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for PromptHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PromptHash({})", self.to_hex())
    }
}

impl TryFrom<String> for PromptHash {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PromptHash> for String {
    fn from(value: PromptHash) -> Self {
        value.to_hex()
    }
}

/// Compute Keccak-256 over arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let hash = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    out
}

/// Encode bytes as `0x`-prefixed lowercase hex.
pub fn encode_prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed hex into bytes.
///
/// The prefix is mandatory. `"0x"` alone decodes to an empty vector.
pub fn decode_prefixed_hex(s: &str) -> Result<Vec<u8>, ValidationError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ValidationError::InvalidHex(s.to_string()))?;
    hex::decode(digits).map_err(|_| ValidationError::InvalidHex(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input_matches_known_vector() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn prompt_hash_is_deterministic() {
        let a = PromptHash::of("How does voting work?");
        let b = PromptHash::of("How does voting work?");
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_hash_does_not_normalize() {
        assert_ne!(PromptHash::of("Treasury status"), PromptHash::of("treasury status"));
        assert_ne!(PromptHash::of("Treasury status"), PromptHash::of("Treasury status "));
    }

    #[test]
    fn hex_form_is_prefixed_and_66_chars() {
        let h = PromptHash::of("Treasury status");
        let s = h.to_hex();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 66);
        assert_eq!(PromptHash::parse(&s).unwrap(), h);
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let s = "ab".repeat(32);
        assert!(matches!(
            PromptHash::parse(&s),
            Err(ValidationError::InvalidHex(_))
        ));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            PromptHash::parse("0xabcd"),
            Err(ValidationError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn serde_uses_hex_string() {
        let h = PromptHash::of("x");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: PromptHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn decode_prefixed_hex_accepts_empty_payload() {
        assert_eq!(decode_prefixed_hex("0x").unwrap(), Vec::<u8>::new());
        assert!(decode_prefixed_hex("0xzz").is_err());
    }
}

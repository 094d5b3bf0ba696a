//! # Error Types
//!
//! Validation failures for the foundational types. All errors use
//! `thiserror` and carry the offending input for diagnostics.

use thiserror::Error;

/// A value failed structural validation at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Prompts must contain at least one byte.
    #[error("prompt must be a non-empty string")]
    EmptyPrompt,

    /// Hex input was not `0x`-prefixed or contained non-hex characters.
    #[error("invalid hex string {0:?}")]
    InvalidHex(String),

    /// Decoded byte length did not match the expected width.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length in bytes.
        expected: usize,
        /// Length actually decoded.
        actual: usize,
    },

    /// Request identifiers are unsigned integers.
    #[error("invalid request id {0:?}")]
    InvalidRequestId(String),

    /// Timestamp could not be represented.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

//! # Ledger Identity Newtypes
//!
//! `RequestId` names a Request record (ledger-assigned or locally drawn in
//! mock mode). `LedgerAddress` names a signing identity on the ledger
//! (requester or submitter).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of a Request record.
///
/// Ledger ids are monotonic `uint256` counters in practice and always fit a
/// `u64`. Mock-mode ids are drawn from `[0, 1_000_000)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl RequestId {
    /// Access the numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Parse a decimal request id, e.g. from a URL path segment.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidRequestId(s.to_string()))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Address of a signing identity on the ledger.
///
/// Kept as the ledger renders it. No checksum validation is performed; the
/// ledger is the authority on address formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerAddress(pub String);

impl LedgerAddress {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Access the address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LedgerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

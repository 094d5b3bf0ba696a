//! Ledger client error types.

/// Errors from ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Read or verify attempted while the client is in mock mode.
    #[error("ledger not connected (mock mode)")]
    NotConnected,

    /// The live backend could not be constructed.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// A mutating call was rejected, reverted, timed out awaiting
    /// confirmation, or produced a malformed receipt.
    #[error("ledger transaction {operation} failed: {reason}")]
    TransactionFailed {
        operation: &'static str,
        reason: String,
    },

    /// HTTP transport error that survived retries.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Gateway returned a non-2xx status on a read.
    #[error("ledger gateway {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response deserialization failed on a read.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The ledger has no record for the requested id.
    #[error("{what} not found on ledger")]
    NotFound { what: String },

    /// Every local request id has been issued.
    #[error("local request id space of {space} exhausted")]
    IdSpaceExhausted { space: u64 },
}

impl LedgerError {
    /// Whether this failure permanently demotes the client to mock mode.
    ///
    /// Only transport failures that exhausted their retries qualify.
    /// Rejections and reverts are specific to one call.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    pub(crate) fn tx(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::TransactionFailed {
            operation,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_failure_display_names_operation() {
        let err = LedgerError::tx("createRequest", "reverted");
        assert_eq!(
            err.to_string(),
            "ledger transaction createRequest failed: reverted"
        );
        assert!(!err.is_unrecoverable());
    }

    #[test]
    fn not_connected_is_not_unrecoverable() {
        assert!(!LedgerError::NotConnected.is_unrecoverable());
        assert!(!LedgerError::IdSpaceExhausted { space: 1 }.is_unrecoverable());
    }
}

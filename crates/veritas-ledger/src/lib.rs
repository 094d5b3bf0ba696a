//! # veritas-ledger: Ledger Client
//!
//! The only path from Veritas to the external ledger. Registers prompt
//! hashes (`createRequest`), records answers with their proof bytes
//! (`submitAnswer`), and exposes the ledger's read and signature
//! verification operations.
//!
//! ## Architecture
//!
//! [`Ledger`] is the operation set. Two backends implement it:
//!
//! - [`LiveLedger`]: HTTP gateway in front of the verifier contract.
//! - [`MockLedger`]: local, non-durable; synthesizes request ids.
//!
//! [`LedgerClient`] owns the process-wide [`ConnectionState`], selects the
//! backend once at initialization, serializes mutations, and demotes
//! permanently to mock mode on unrecoverable failure.

pub mod client;
pub mod config;
pub mod error;
pub mod live;
pub mod mock;
pub(crate) mod retry;
pub mod types;

pub use client::{ConnectionState, LedgerClient, Registration};
pub use config::{ConfigError, LedgerConfig};
pub use error::LedgerError;
pub use live::LiveLedger;
pub use mock::{LocalIdAllocator, MockLedger, MOCK_ID_SPACE};
pub use types::{AnswerRecord, LedgerEvent, RequestRecord, TransactionReceipt, TxStatus};

use async_trait::async_trait;
use veritas_core::{PromptHash, RequestId};

/// Operations offered by the verifier contract.
///
/// Object-safe so the client can hold `Arc<dyn Ledger>` and swap backends
/// on demotion.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Short backend label for diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Register a prompt hash. Returns the id assigned by the confirmed
    /// transaction.
    async fn create_request(&self, prompt_hash: &PromptHash) -> Result<RequestId, LedgerError>;

    /// Record an answer against a request. At most one answer per request.
    async fn submit_answer(
        &self,
        request_id: RequestId,
        answer: &str,
        proof: &[u8],
    ) -> Result<TransactionReceipt, LedgerError>;

    /// Check a signature using the ledger's own verification logic.
    async fn verify_signature(
        &self,
        request_id: RequestId,
        signature: &[u8],
    ) -> Result<bool, LedgerError>;

    async fn get_request(&self, request_id: RequestId) -> Result<RequestRecord, LedgerError>;

    async fn get_answer(&self, request_id: RequestId) -> Result<AnswerRecord, LedgerError>;

    async fn get_total_requests(&self) -> Result<u64, LedgerError>;
}

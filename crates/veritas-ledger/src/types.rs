//! Ledger record and receipt types.
//!
//! Field names follow the gateway's camelCase JSON. Fields use
//! `#[serde(default)]` where the gateway may omit them; unknown fields are
//! ignored so the gateway can evolve without breaking the client.

use serde::{Deserialize, Serialize};
use veritas_core::{LedgerAddress, PromptHash, RequestId};

/// A Request record as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub prompt_hash: PromptHash,
    pub requester: LedgerAddress,
    /// Block timestamp, Unix seconds.
    pub timestamp: u64,
    pub answered: bool,
}

/// An Answer record as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub text: String,
    /// Proof bytes as `0x`-hex.
    pub proof: String,
    pub submitter: LedgerAddress,
    /// Block timestamp, Unix seconds.
    pub timestamp: u64,
    pub verified: bool,
}

/// Lifecycle of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Reverted,
}

/// Notifications emitted by the verifier contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    RequestCreated {
        #[serde(rename = "requestId")]
        request_id: RequestId,
        #[serde(rename = "promptHash")]
        prompt_hash: PromptHash,
        requester: LedgerAddress,
    },
    AnswerSubmitted {
        #[serde(rename = "requestId")]
        request_id: RequestId,
        answer: String,
        proof: String,
        submitter: LedgerAddress,
    },
    /// Any event this client does not model.
    #[serde(other)]
    Unknown,
}

/// Receipt for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub status: TxStatus,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub events: Vec<LedgerEvent>,
}

impl TransactionReceipt {
    /// The request id carried by this receipt's `RequestCreated` event.
    pub fn created_request_id(&self) -> Option<RequestId> {
        self.events.iter().find_map(|e| match e {
            LedgerEvent::RequestCreated { request_id, .. } => Some(*request_id),
            _ => None,
        })
    }
}

// -- Gateway wire bodies ------------------------------------------------------

/// Response to a transaction submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmittedTransaction {
    pub transaction_hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateRequestBody<'a> {
    pub prompt_hash: &'a PromptHash,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitAnswerBody<'a> {
    pub answer: &'a str,
    pub proof: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifySignatureBody {
    pub signature: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifySignatureResponse {
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TotalRequestsResponse {
    pub total: u64,
}

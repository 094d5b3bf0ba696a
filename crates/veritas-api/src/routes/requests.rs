//! # Ledger Record Lookup
//!
//! `GET /api/request/{id}` reads the Request and its Answer from the
//! ledger. Both reads run concurrently and never touch the mutation queue.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use veritas_core::digest::decode_prefixed_hex;
use veritas_core::RequestId;
use veritas_crypto::ProofToken;
use veritas_ledger::{AnswerRecord, LedgerError, RequestRecord};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    pub prompt_hash: String,
    pub requester: String,
    /// Unix seconds.
    pub timestamp: u64,
    pub answered: bool,
}

impl From<RequestRecord> for RequestView {
    fn from(r: RequestRecord) -> Self {
        Self {
            prompt_hash: r.prompt_hash.to_hex(),
            requester: r.requester.0,
            timestamp: r.timestamp,
            answered: r.answered,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub text: String,
    /// Proof bytes as `0x`-hex.
    pub proof: String,
    /// The proof bytes decoded as a token, when they are UTF-8.
    pub proof_token: Option<String>,
    pub submitter: String,
    /// Unix seconds.
    pub timestamp: u64,
    pub verified: bool,
}

impl From<AnswerRecord> for AnswerView {
    fn from(a: AnswerRecord) -> Self {
        let proof_token = decode_prefixed_hex(&a.proof)
            .ok()
            .and_then(|bytes| ProofToken::from_utf8_bytes(&bytes).ok())
            .map(ProofToken::into_string);
        Self {
            text: a.text,
            proof: a.proof,
            proof_token,
            submitter: a.submitter.0,
            timestamp: a.timestamp,
            verified: a.verified,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetailsResponse {
    pub request_id: u64,
    pub request: RequestView,
    /// Absent until an answer has been submitted.
    pub answer: Option<AnswerView>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/request/{request_id}", get(get_request))
}

/// GET /api/request/{request_id}: Read a request and its answer.
#[utoipa::path(
    get,
    path = "/api/request/{request_id}",
    params(("request_id" = u64, Path, description = "Ledger request id")),
    responses(
        (status = 200, description = "Request record", body = RequestDetailsResponse),
        (status = 400, description = "Invalid id or ledger not connected", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown request", body = crate::error::ErrorBody),
        (status = 500, description = "Ledger read failed", body = crate::error::ErrorBody),
    ),
    tag = "ledger"
)]
pub(crate) async fn get_request(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<RequestDetailsResponse>, AppError> {
    let request_id = RequestId::parse(&raw_id)?;
    if !state.ledger.is_connected() {
        return Err(AppError::NotConnected);
    }

    let (request, answer) = tokio::join!(
        state.ledger.get_request(request_id),
        state.ledger.get_answer(request_id),
    );
    let request = request?;
    let answer = match answer {
        Ok(a) => Some(a.into()),
        Err(LedgerError::NotFound { .. }) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Json(RequestDetailsResponse {
        request_id: request_id.value(),
        request: request.into(),
        answer,
    }))
}

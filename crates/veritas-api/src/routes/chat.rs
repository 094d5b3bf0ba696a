//! # Query Submission API
//!
//! `POST /api/chat` runs one query through the [`RequestCoordinator`]
//! and returns the answer with its proof token and commitment status.
//!
//! [`RequestCoordinator`]: crate::coordinator::RequestCoordinator

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use veritas_core::ValidationError;

use crate::coordinator::{Commitment, QueryOutcome, Usage};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Query request. `prompt` must be a non-empty JSON string.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub prompt: String,
}

impl Validate for ChatRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.prompt.is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }
        Ok(())
    }
}

/// Answer with its audit trail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub request_id: u64,
    /// Keccak-256 of the prompt, `0x`-hex.
    pub prompt_hash: String,
    pub text: String,
    pub proof: String,
    pub model: String,
    pub usage: Usage,
    pub timestamp: String,
    /// True only when both the request and the answer are on the ledger.
    pub verifiable: bool,
    pub commitment: Commitment,
}

impl From<QueryOutcome> for ChatResponse {
    fn from(out: QueryOutcome) -> Self {
        let verifiable = out.verifiable();
        Self {
            request_id: out.request_id.value(),
            prompt_hash: out.prompt_hash.to_hex(),
            text: out.text,
            proof: out.proof.into_string(),
            model: out.model,
            usage: out.usage,
            timestamp: out.timestamp.to_iso8601(),
            verifiable,
            commitment: out.commitment,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}

/// POST /api/chat: Answer a prompt and commit it to the ledger.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 201, description = "Answer generated", body = ChatResponse),
        (status = 400, description = "Missing, non-string, or empty prompt", body = crate::error::ErrorBody),
        (status = 500, description = "Generation failed", body = crate::error::ErrorBody),
    ),
    tag = "chat"
)]
pub(crate) async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let outcome = state.coordinator.submit_query(&req.prompt).await?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

//! Signature verification, delegated to the ledger.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use veritas_core::digest::decode_prefixed_hex;
use veritas_core::{RequestId, Timestamp, ValidationError};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub request_id: u64,
    /// Signature bytes as `0x`-hex.
    pub signature: String,
}

impl Validate for VerifyRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        decode_prefixed_hex(&self.signature).map(|_| ())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub request_id: u64,
    pub verified: bool,
    pub timestamp: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/verify", post(verify_signature))
}

/// POST /api/verify: Check a signature against a ledger request.
#[utoipa::path(
    post,
    path = "/api/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification result", body = VerifyResponse),
        (status = 400, description = "Malformed body or ledger not connected", body = crate::error::ErrorBody),
        (status = 500, description = "Ledger call failed", body = crate::error::ErrorBody),
    ),
    tag = "ledger"
)]
pub(crate) async fn verify_signature(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let req = extract_validated_json(body)?;
    if !state.ledger.is_connected() {
        return Err(AppError::NotConnected);
    }

    let signature = decode_prefixed_hex(&req.signature)?;
    let request_id = RequestId(req.request_id);
    let verified = state.ledger.verify_signature(request_id, &signature).await?;

    Ok(Json(VerifyResponse {
        request_id: req.request_id,
        verified,
        timestamp: Timestamp::now().to_iso8601(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_must_be_prefixed_hex() {
        let ok = VerifyRequest {
            request_id: 1,
            signature: "0xdeadbeef".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = VerifyRequest {
            request_id: 1,
            signature: "deadbeef".into(),
        };
        assert!(matches!(
            bad.validate(),
            Err(ValidationError::InvalidHex(s)) if s == "deadbeef"
        ));
    }
}

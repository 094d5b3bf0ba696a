//! Ledger mode and request count.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use veritas_ledger::LedgerError;

use crate::error::AppError;
use crate::routes::health::ledger_label;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub ledger: String,
    /// Requests registered on the ledger. `null` in mock mode.
    pub total_requests: Option<u64>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/stats", get(stats))
}

/// GET /api/stats: Ledger mode and total registered requests.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Ledger statistics", body = StatsResponse),
        (status = 500, description = "Ledger read failed", body = crate::error::ErrorBody),
    ),
    tag = "ledger"
)]
pub(crate) async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let total_requests = match state.ledger.get_total_requests().await {
        Ok(total) => Some(total),
        Err(LedgerError::NotConnected) => None,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(StatsResponse {
        ledger: ledger_label(state.ledger.state()).into(),
        total_requests,
    }))
}

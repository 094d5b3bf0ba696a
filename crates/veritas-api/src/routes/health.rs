//! Liveness and ledger mode.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use veritas_core::Timestamp;
use veritas_ledger::ConnectionState;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// `connected` or `mock`.
    pub ledger: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Health label for a connection state. Anything not connected reports `mock`.
pub fn ledger_label(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connected => "connected",
        ConnectionState::MockMode | ConnectionState::Uninitialized => "mock",
    }
}

/// GET /health: Service status and ledger mode.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "health"
)]
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: Timestamp::now().to_iso8601(),
        ledger: ledger_label(state.ledger.state()).into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_reports_mock() {
        assert_eq!(ledger_label(ConnectionState::Uninitialized), "mock");
        assert_eq!(ledger_label(ConnectionState::Connected), "connected");
    }
}

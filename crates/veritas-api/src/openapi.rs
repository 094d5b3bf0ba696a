//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Veritas API",
        version = "0.1.0",
        description = "Governance assistant with ledger-backed request/answer commitments and proof tokens.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::health::health,
        crate::routes::proposals::list_proposals,
        crate::routes::chat::chat,
        crate::routes::requests::get_request,
        crate::routes::verify::verify_signature,
        crate::routes::stats::stats,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::coordinator::Usage,
        crate::coordinator::Commitment,
        crate::routes::health::HealthResponse,
        crate::routes::proposals::Proposal,
        crate::routes::proposals::ProposalStatus,
        crate::routes::proposals::ProposalsResponse,
        crate::routes::chat::ChatRequest,
        crate::routes::chat::ChatResponse,
        crate::routes::requests::RequestView,
        crate::routes::requests::AnswerView,
        crate::routes::requests::RequestDetailsResponse,
        crate::routes::verify::VerifyRequest,
        crate::routes::verify::VerifyResponse,
        crate::routes::stats::StatsResponse,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "governance", description = "DAO governance proposals"),
        (name = "chat", description = "Query submission"),
        (name = "ledger", description = "Ledger records and verification"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

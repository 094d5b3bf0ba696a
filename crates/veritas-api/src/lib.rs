//! # veritas-api: Axum Service
//!
//! HTTP surface over the [`coordinator::RequestCoordinator`] and the
//! ledger client.
//!
//! ## API Surface
//!
//! | Route                     | Module                    |
//! |---------------------------|---------------------------|
//! | `GET /health`             | [`routes::health`]        |
//! | `GET /api/proposals`      | [`routes::proposals`]     |
//! | `POST /api/chat`          | [`routes::chat`]          |
//! | `GET /api/request/{id}`   | [`routes::requests`]      |
//! | `POST /api/verify`        | [`routes::verify`]        |
//! | `GET /api/stats`          | [`routes::stats`]         |
//! | `GET /metrics`            | [`middleware::metrics`]   |
//! | `GET /openapi.json`       | [`openapi`]               |
//!
//! All errors map to structured JSON bodies via [`AppError`].

pub mod coordinator;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use crate::middleware::metrics::ApiMetrics;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Maximum accepted request body size.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    app_with_metrics(state, ApiMetrics::new())
}

/// Like [`app`], with caller-owned metrics counters.
pub fn app_with_metrics(state: AppState, metrics: ApiMetrics) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::proposals::router())
        .merge(routes::chat::router())
        .merge(routes::requests::router())
        .merge(routes::verify::router())
        .merge(routes::stats::router())
        .merge(middleware::metrics::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(Extension(metrics))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::tracing_layer::layer())
        .layer(cors)
        .with_state(state)
}

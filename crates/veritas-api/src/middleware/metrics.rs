//! # Request Metrics
//!
//! In-process atomic counters, rendered in Prometheus text format at
//! `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};

use crate::state::AppState;

/// Shared metrics state.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    pub request_count: Arc<AtomicU64>,
    pub error_count: Arc<AtomicU64>,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Responses with a 4xx or 5xx status.
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Prometheus text exposition of the counters.
    pub fn render(&self) -> String {
        format!(
            "# HELP veritas_http_requests_total Total HTTP requests served.\n\
             # TYPE veritas_http_requests_total counter\n\
             veritas_http_requests_total {}\n\
             # HELP veritas_http_errors_total HTTP responses with a 4xx or 5xx status.\n\
             # TYPE veritas_http_errors_total counter\n\
             veritas_http_errors_total {}\n",
            self.requests(),
            self.errors()
        )
    }
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.request_count.fetch_add(1, Ordering::Relaxed);
        if response.status().is_server_error() || response.status().is_client_error() {
            m.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}

pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_text))
}

async fn metrics_text(Extension(metrics): Extension<ApiMetrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_counters() {
        let m = ApiMetrics::new();
        m.request_count.fetch_add(3, Ordering::Relaxed);
        m.error_count.fetch_add(1, Ordering::Relaxed);
        let text = m.render();
        assert!(text.contains("veritas_http_requests_total 3\n"));
        assert!(text.contains("veritas_http_errors_total 1\n"));
    }

    #[test]
    fn clones_share_counters() {
        let m = ApiMetrics::new();
        let c = m.clone();
        c.request_count.fetch_add(1, Ordering::Relaxed);
        assert_eq!(m.requests(), 1);
    }
}

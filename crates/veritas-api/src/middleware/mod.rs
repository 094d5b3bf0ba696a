//! # HTTP Middleware
//!
//! ```text
//! CorsLayer → TraceLayer → BodyLimit → MetricsMiddleware → Handler
//! ```

pub mod metrics;
pub mod tracing_layer;

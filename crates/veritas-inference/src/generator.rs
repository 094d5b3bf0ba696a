//! The generation capability consumed by the request coordinator.

use async_trait::async_trait;
use serde::Serialize;

/// Text produced for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub text: String,
    /// Identifier of the model or template set that produced `text`.
    pub model: String,
}

/// Errors raised by a generator. Fatal to the query that triggered them.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generator produced no text")]
    EmptyOutput,

    #[error("generator backend failed: {0}")]
    Backend(String),
}

/// Produces answer text for a prompt.
///
/// Implementations may block for an unbounded time and need not be
/// deterministic. Callers impose no timeout.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;
}

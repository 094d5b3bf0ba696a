//! # Request Coordinator
//!
//! Runs one query end to end:
//!
//! ```text
//! prompt ─▶ PromptHash ─▶ createRequest ──(fail)──▶ local id
//!                              │
//!                              ▼
//!                         generate text ─▶ proof ─▶ submitAnswer (best-effort)
//!                                                         │
//!                                                         ▼
//!                                                   QueryOutcome
//! ```
//!
//! Failures on the ledger path never abort a query once generation has
//! succeeded. [`Commitment`] records how far the ledger commitment got, and
//! `verifiable` is derived from it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use veritas_core::{PromptHash, RequestId, Timestamp, ValidationError};
use veritas_crypto::{generate_proof, ProofToken};
use veritas_inference::{GenerationError, Generator};
use veritas_ledger::{LedgerClient, LedgerError};

/// Approximate token counters. Byte length divided by 4, not a tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    /// Computed over the combined length, so it can differ from the sum.
    pub total_tokens: usize,
}

impl Usage {
    pub fn estimate(prompt: &str, answer: &str) -> Self {
        Self {
            prompt_tokens: prompt.len() / 4,
            completion_tokens: answer.len() / 4,
            total_tokens: (prompt.len() + answer.len()) / 4,
        }
    }
}

/// How much of the query reached the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Commitment {
    /// Request and answer are both confirmed on the ledger.
    Committed,
    /// The request is on the ledger; the answer submission failed.
    RequestOnly,
    /// Nothing durable. Mock mode, or `createRequest` failed.
    Local,
}

/// Result of a successful query.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub request_id: RequestId,
    pub prompt_hash: PromptHash,
    pub text: String,
    pub proof: ProofToken,
    pub model: String,
    pub usage: Usage,
    pub commitment: Commitment,
    pub timestamp: Timestamp,
}

impl QueryOutcome {
    pub fn verifiable(&self) -> bool {
        self.commitment == Commitment::Committed
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    GenerationFailure(#[from] GenerationError),

    /// Registration failed and no local id was left to fall back on.
    #[error("no request id available: {0}")]
    Unassigned(LedgerError),
}

/// Orchestrates queries against a shared ledger client and generator.
#[derive(Clone)]
pub struct RequestCoordinator {
    ledger: LedgerClient,
    generator: Arc<dyn Generator>,
}

impl std::fmt::Debug for RequestCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCoordinator")
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

impl RequestCoordinator {
    pub fn new(ledger: LedgerClient, generator: Arc<dyn Generator>) -> Self {
        Self { ledger, generator }
    }

    pub fn ledger(&self) -> &LedgerClient {
        &self.ledger
    }

    /// Register, answer, and commit one prompt.
    ///
    /// Identical prompts are not deduplicated: every call registers a new
    /// request.
    ///
    /// # Errors
    ///
    /// [`CoordinatorError::InvalidInput`] for an empty prompt, and
    /// [`CoordinatorError::GenerationFailure`] when the generator fails or
    /// returns empty text. Ledger failures are never returned, except
    /// [`CoordinatorError::Unassigned`] when the fallback id space is used up.
    pub async fn submit_query(&self, prompt: &str) -> Result<QueryOutcome, CoordinatorError> {
        if prompt.is_empty() {
            return Err(CoordinatorError::InvalidInput(
                ValidationError::EmptyPrompt.to_string(),
            ));
        }

        let prompt_hash = PromptHash::of(prompt);
        tracing::info!(%prompt_hash, "processing query");

        let (request_id, durable) = match self.ledger.create_request(&prompt_hash).await {
            Ok(reg) => {
                tracing::info!(
                    request_id = %reg.request_id,
                    durable = reg.durable,
                    "request registered"
                );
                (reg.request_id, reg.durable)
            }
            Err(e) => {
                let fallback = self
                    .ledger
                    .local_request_id()
                    .map_err(CoordinatorError::Unassigned)?;
                tracing::warn!(
                    error = %e,
                    request_id = %fallback,
                    "request registration failed; using local id"
                );
                (fallback, false)
            }
        };

        let generation = self.generator.generate(prompt).await?;
        if generation.text.is_empty() {
            return Err(GenerationError::EmptyOutput.into());
        }
        let usage = Usage::estimate(prompt, &generation.text);
        tracing::info!(total_tokens = usage.total_tokens, "answer generated");

        let proof = generate_proof(prompt, &generation.text);

        let commitment = if durable && self.ledger.is_connected() {
            match self
                .ledger
                .submit_answer(request_id, generation.text.clone(), proof.as_bytes().to_vec())
                .await
            {
                Ok(receipt) => {
                    tracing::info!(
                        %request_id,
                        tx = %receipt.transaction_hash,
                        "answer committed"
                    );
                    Commitment::Committed
                }
                Err(e) => {
                    tracing::error!(%request_id, error = %e, "answer submission failed");
                    Commitment::RequestOnly
                }
            }
        } else if durable {
            Commitment::RequestOnly
        } else {
            Commitment::Local
        };

        Ok(QueryOutcome {
            request_id,
            prompt_hash,
            text: generation.text,
            proof,
            model: generation.model,
            usage,
            commitment,
            timestamp: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use veritas_crypto::{verify_proof, PROOF_PREFIX};
    use veritas_inference::{Generation, TemplateGenerator};

    struct BlankGenerator;

    #[async_trait]
    impl Generator for BlankGenerator {
        async fn generate(&self, _prompt: &str) -> Result<Generation, GenerationError> {
            Ok(Generation {
                text: String::new(),
                model: "blank".into(),
            })
        }
    }

    fn mock_coordinator() -> RequestCoordinator {
        RequestCoordinator::new(LedgerClient::mock(), Arc::new(TemplateGenerator::new()))
    }

    #[test]
    fn usage_divides_byte_lengths() {
        let u = Usage::estimate("abcdefg", "abcdefg");
        assert_eq!(u.prompt_tokens, 1);
        assert_eq!(u.completion_tokens, 1);
        assert_eq!(u.total_tokens, 3);
    }

    #[test]
    fn usage_counts_bytes_not_chars() {
        // "é" is two bytes.
        let u = Usage::estimate("éé", "");
        assert_eq!(u.prompt_tokens, 1);
    }

    #[tokio::test]
    async fn empty_prompt_is_invalid() {
        let err = mock_coordinator().submit_query("").await.unwrap_err();
        assert!(matches!(err, CoordinatorError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn mock_mode_is_never_verifiable() {
        let out = mock_coordinator()
            .submit_query("Treasury status")
            .await
            .unwrap();
        assert_eq!(out.commitment, Commitment::Local);
        assert!(!out.verifiable());
        assert!(out.text.contains("Treasury"));
        assert!(out.proof.as_str().starts_with(PROOF_PREFIX));
        assert!(verify_proof(out.proof.as_str(), "Treasury status", &out.text));
    }

    #[tokio::test]
    async fn identical_prompts_get_distinct_ids() {
        let c = mock_coordinator();
        let a = c.submit_query("same").await.unwrap();
        let b = c.submit_query("same").await.unwrap();
        assert_eq!(a.prompt_hash, b.prompt_hash);
        assert_ne!(a.request_id, b.request_id);
    }

    #[tokio::test]
    async fn empty_generation_is_a_failure() {
        let c = RequestCoordinator::new(LedgerClient::mock(), Arc::new(BlankGenerator));
        let err = c.submit_query("hi").await.unwrap_err();
        assert!(matches!(
            err,
            CoordinatorError::GenerationFailure(GenerationError::EmptyOutput)
        ));
    }
}

//! Retry logic with exponential backoff for ledger gateway calls.
//!
//! Reads retry on any transport error. Mutations retry only when the
//! connection could not be established, since any later failure may mean
//! the transaction already reached the gateway.

use std::time::Duration;

/// Maximum number of retry attempts after the initial request.
pub(crate) const MAX_RETRIES: u32 = 3;

/// Base delay between retries (doubles each attempt: 200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Which transport failures are safe to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryOn {
    /// Any `reqwest` transport error. For idempotent reads.
    AnyTransportError,
    /// Only connection-establishment failures. For transaction submission.
    ConnectFailure,
}

impl RetryOn {
    fn should_retry(self, err: &reqwest::Error) -> bool {
        match self {
            Self::AnyTransportError => true,
            Self::ConnectFailure => err.is_connect(),
        }
    }
}

/// Send an HTTP request with exponential backoff retry on transport errors.
///
/// The closure `f` is called at most `MAX_RETRIES + 1` times. Status codes
/// are never retried here; the caller inspects the response.
pub(crate) async fn retry_send<F, Fut>(
    policy: RetryOn,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if policy.should_retry(&e) => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "ledger gateway request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
    f().await
}

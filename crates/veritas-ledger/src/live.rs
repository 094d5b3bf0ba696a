//! HTTP client for the ledger gateway (live mode).
//!
//! | Method | Path (relative to `ledger/v1`) | Operation |
//! |--------|--------------------------------|-----------|
//! | POST   | `/requests`                    | `createRequest` transaction |
//! | POST   | `/requests/{id}/answer`        | `submitAnswer` transaction |
//! | GET    | `/transactions/{hash}`         | Receipt polling |
//! | GET    | `/requests/{id}`               | `getRequest` |
//! | GET    | `/requests/{id}/answer`        | `getAnswer` |
//! | POST   | `/requests/{id}/verify`        | `verifySignature` (view) |
//! | GET    | `/requests/count`              | `getTotalRequests` |
//!
//! Transactions are submitted, then the receipt is polled until it is
//! confirmed, reverted, or the confirmation timeout elapses. The request
//! id of `createRequest` is read from the `RequestCreated` event of its own
//! receipt.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use veritas_core::digest::encode_prefixed_hex;
use veritas_core::{PromptHash, RequestId};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::retry::{retry_send, RetryOn};
use crate::types::{
    AnswerRecord, CreateRequestBody, RequestRecord, SubmitAnswerBody, SubmittedTransaction,
    TotalRequestsResponse, TransactionReceipt, TxStatus, VerifySignatureBody,
    VerifySignatureResponse,
};
use crate::Ledger;

/// API version path segment for the ledger gateway.
const API_PREFIX: &str = "ledger/v1";

/// Header naming the verifier contract on every call.
const CONTRACT_HEADER: &str = "x-contract-address";

/// Ledger backend that talks to the live gateway.
#[derive(Debug, Clone)]
pub struct LiveLedger {
    http: reqwest::Client,
    base_url: url::Url,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl LiveLedger {
    /// Build a live backend from configuration. Performs no I/O.
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.signer_key.as_str()
        ))
        .map_err(|_| LedgerError::Unavailable("invalid signer key characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            CONTRACT_HEADER,
            reqwest::header::HeaderValue::from_str(config.contract_address.as_str())
                .map_err(|_| LedgerError::Unavailable("invalid contract address".into()))?,
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| LedgerError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.rpc_url.clone(),
            confirm_timeout: config.confirm_timeout(),
            poll_interval: config.poll_interval(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}/{path}", self.base_url)
    }

    /// Submit a transaction and block until it is confirmed.
    async fn submit_transaction<B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<TransactionReceipt, LedgerError> {
        let endpoint = format!("POST /{path}");
        let url = self.url(path);

        let resp = retry_send(RetryOn::ConnectFailure, || {
            self.http.post(&url).json(body).send()
        })
        .await
        .map_err(|e| LedgerError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LedgerError::tx(
                operation,
                format!("rejected by gateway with HTTP {status}: {body}"),
            ));
        }

        let submitted: SubmittedTransaction = resp
            .json()
            .await
            .map_err(|e| {
                LedgerError::tx(operation, format!("malformed submission response: {e}"))
            })?;

        tracing::debug!(
            operation,
            tx = %submitted.transaction_hash,
            "transaction submitted, awaiting confirmation"
        );
        self.await_confirmation(operation, &submitted.transaction_hash)
            .await
    }

    async fn await_confirmation(
        &self,
        operation: &'static str,
        tx_hash: &str,
    ) -> Result<TransactionReceipt, LedgerError> {
        let deadline = tokio::time::Instant::now() + self.confirm_timeout;
        let path = format!("transactions/{tx_hash}");

        loop {
            match self.fetch_receipt(operation, &path).await? {
                Some(receipt) if receipt.status == TxStatus::Confirmed => return Ok(receipt),
                Some(receipt) if receipt.status == TxStatus::Reverted => {
                    return Err(LedgerError::tx(
                        operation,
                        format!("transaction {tx_hash} reverted"),
                    ));
                }
                _ => {}
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(LedgerError::tx(
                    operation,
                    format!(
                        "transaction {tx_hash} not confirmed within {:?}",
                        self.confirm_timeout
                    ),
                ));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Fetch a receipt. `None` while the gateway has not indexed it yet.
    async fn fetch_receipt(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<Option<TransactionReceipt>, LedgerError> {
        let url = self.url(path);
        let resp = retry_send(RetryOn::AnyTransportError, || self.http.get(&url).send())
            .await
            .map_err(|e| LedgerError::Http {
                endpoint: format!("GET /{path}"),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LedgerError::tx(
                operation,
                format!("receipt query returned HTTP {status}: {body}"),
            ));
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| LedgerError::tx(operation, format!("malformed receipt: {e}")))
    }

    async fn read<T, B>(
        &self,
        build: B,
        endpoint: String,
        what: impl FnOnce() -> String,
    ) -> Result<T, LedgerError>
    where
        T: DeserializeOwned,
        B: Fn() -> reqwest::RequestBuilder,
    {
        let resp = retry_send(RetryOn::AnyTransportError, || build().send())
            .await
            .map_err(|e| LedgerError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::NotFound { what: what() });
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LedgerError::Api {
                endpoint,
                status,
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| LedgerError::Deserialization {
                endpoint,
                source: e,
            })
    }
}

#[async_trait]
impl Ledger for LiveLedger {
    fn backend_name(&self) -> &'static str {
        "live"
    }

    async fn create_request(&self, prompt_hash: &PromptHash) -> Result<RequestId, LedgerError> {
        let receipt = self
            .submit_transaction("createRequest", "requests", &CreateRequestBody { prompt_hash })
            .await?;
        receipt.created_request_id().ok_or_else(|| {
            LedgerError::tx(
                "createRequest",
                format!(
                    "receipt {} carries no RequestCreated event",
                    receipt.transaction_hash
                ),
            )
        })
    }

    async fn submit_answer(
        &self,
        request_id: RequestId,
        answer: &str,
        proof: &[u8],
    ) -> Result<TransactionReceipt, LedgerError> {
        let body = SubmitAnswerBody {
            answer,
            proof: encode_prefixed_hex(proof),
        };
        self.submit_transaction(
            "submitAnswer",
            &format!("requests/{request_id}/answer"),
            &body,
        )
        .await
    }

    async fn verify_signature(
        &self,
        request_id: RequestId,
        signature: &[u8],
    ) -> Result<bool, LedgerError> {
        let path = format!("requests/{request_id}/verify");
        let body = VerifySignatureBody {
            signature: encode_prefixed_hex(signature),
        };
        let resp: VerifySignatureResponse = self
            .read(
                || self.http.post(self.url(&path)).json(&body),
                format!("POST /{path}"),
                || format!("request {request_id}"),
            )
            .await?;
        Ok(resp.verified)
    }

    async fn get_request(&self, request_id: RequestId) -> Result<RequestRecord, LedgerError> {
        let path = format!("requests/{request_id}");
        self.read(
            || self.http.get(self.url(&path)),
            format!("GET /{path}"),
            || format!("request {request_id}"),
        )
        .await
    }

    async fn get_answer(&self, request_id: RequestId) -> Result<AnswerRecord, LedgerError> {
        let path = format!("requests/{request_id}/answer");
        self.read(
            || self.http.get(self.url(&path)),
            format!("GET /{path}"),
            || format!("answer for request {request_id}"),
        )
        .await
    }

    async fn get_total_requests(&self) -> Result<u64, LedgerError> {
        let resp: TotalRequestsResponse = self
            .read(
                || self.http.get(self.url("requests/count")),
                "GET /requests/count".to_string(),
                || "request count".to_string(),
            )
            .await?;
        Ok(resp.total)
    }
}

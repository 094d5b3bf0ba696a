//! # Ledger Client: Connection State Machine
//!
//! ```text
//! Uninitialized ──initialize(Some(cfg)) + probe ok──▶ Connected
//!       │                                               │
//!       └──initialize(None) / any init error──▶ MockMode ◀┘
//!                                     unrecoverable failure, shutdown
//! ```
//!
//! There is no edge back to `Connected`. The backend is selected when the
//! state changes and is never re-evaluated per call.
//!
//! ## Serialization
//!
//! `createRequest` and `submitAnswer` share one async mutex, so only one
//! mutating call is in flight per signing identity. Each mutation runs in
//! its own spawned task that owns the lock: dropping the caller's future
//! does not withdraw a transaction that has been issued. Reads never take
//! the lock.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use veritas_core::{PromptHash, RequestId};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::live::LiveLedger;
use crate::mock::MockLedger;
use crate::types::{AnswerRecord, RequestRecord, TransactionReceipt};
use crate::Ledger;

/// Process-scoped connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No initialization attempt yet.
    Uninitialized,
    /// Records are durable and externally verifiable.
    Connected,
    /// Records are local and best-effort.
    MockMode,
}

impl ConnectionState {
    /// Label used by health reporting.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Connected => "connected",
            Self::MockMode => "mock",
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of `createRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub request_id: RequestId,
    /// `true` when the id was assigned by a confirmed ledger transaction.
    pub durable: bool,
}

#[derive(Clone)]
struct Active {
    state: ConnectionState,
    backend: Arc<dyn Ledger>,
}

struct Inner {
    active: RwLock<Active>,
    mock: Arc<MockLedger>,
    mutations: tokio::sync::Mutex<()>,
}

impl Inner {
    fn active(&self) -> Active {
        self.active.read().clone()
    }

    fn transition(&self, state: ConnectionState, backend: Arc<dyn Ledger>) {
        *self.active.write() = Active { state, backend };
    }

    fn demote(&self, reason: &str) {
        let mut active = self.active.write();
        if active.state == ConnectionState::MockMode {
            return;
        }
        tracing::error!(
            from = %active.state,
            reason,
            "ledger client permanently demoted to mock mode"
        );
        *active = Active {
            state: ConnectionState::MockMode,
            backend: self.mock.clone(),
        };
    }

    fn observe<T>(&self, operation: &str, result: &Result<T, LedgerError>) {
        if let Err(e) = result {
            if e.is_unrecoverable() {
                self.demote(&format!("{operation}: {e}"));
            }
        }
    }
}

/// Single point of contact with the ledger. Cheap to clone.
#[derive(Clone)]
pub struct LedgerClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let active = self.inner.active();
        f.debug_struct("LedgerClient")
            .field("state", &active.state)
            .field("backend", &active.backend.backend_name())
            .finish()
    }
}

impl LedgerClient {
    fn with_state(state: ConnectionState, backend: Option<Arc<dyn Ledger>>) -> Self {
        let mock = Arc::new(MockLedger::new());
        let backend = backend.unwrap_or_else(|| mock.clone() as Arc<dyn Ledger>);
        Self {
            inner: Arc::new(Inner {
                active: RwLock::new(Active { state, backend }),
                mock,
                mutations: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// A client that has not attempted initialization yet.
    pub fn uninitialized() -> Self {
        Self::with_state(ConnectionState::Uninitialized, None)
    }

    /// A client fixed in mock mode.
    pub fn mock() -> Self {
        Self::with_state(ConnectionState::MockMode, None)
    }

    /// A connected client over an already-constructed backend. No probe.
    pub fn with_backend(backend: Arc<dyn Ledger>) -> Self {
        Self::with_state(ConnectionState::Connected, Some(backend))
    }

    /// Create a client and run the initialization attempt.
    pub async fn connect(config: Option<LedgerConfig>) -> Self {
        let client = Self::uninitialized();
        client.initialize(config).await;
        client
    }

    /// Run the single initialization attempt.
    ///
    /// `None` (no signing credential configured) and every failure select
    /// mock mode. Calling this on an initialized client changes nothing.
    pub async fn initialize(&self, config: Option<LedgerConfig>) -> ConnectionState {
        let current = self.state();
        if current != ConnectionState::Uninitialized {
            tracing::warn!(state = %current, "ledger client already initialized");
            return current;
        }

        let Some(config) = config else {
            tracing::warn!("no ledger signing credential configured; running in mock mode");
            self.inner
                .transition(ConnectionState::MockMode, self.inner.mock.clone());
            return ConnectionState::MockMode;
        };

        let live = match LiveLedger::new(&config) {
            Ok(live) => live,
            Err(e) => {
                tracing::warn!(error = %e, "ledger unavailable; running in mock mode");
                self.inner
                    .transition(ConnectionState::MockMode, self.inner.mock.clone());
                return ConnectionState::MockMode;
            }
        };

        match live.get_total_requests().await {
            Ok(total) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    contract = %config.contract_address,
                    total_requests = total,
                    "ledger connection initialized"
                );
                self.inner
                    .transition(ConnectionState::Connected, Arc::new(live));
                ConnectionState::Connected
            }
            Err(e) => {
                tracing::warn!(
                    rpc_url = %config.rpc_url,
                    error = %e,
                    "ledger probe failed; running in mock mode"
                );
                self.inner
                    .transition(ConnectionState::MockMode, self.inner.mock.clone());
                ConnectionState::MockMode
            }
        }
    }

    /// Release the live backend. The client stays in mock mode afterwards.
    pub fn shutdown(&self) {
        self.inner.demote("client shut down");
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.active.read().state
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Issue a local id, for callers falling back after a failed registration.
    ///
    /// Fails with [`LedgerError::IdSpaceExhausted`] once every local id has
    /// been issued.
    pub fn local_request_id(&self) -> Result<RequestId, LedgerError> {
        self.inner.mock.allocate_local_id()
    }

    /// Register a prompt hash. Blocks until the transaction confirms.
    ///
    /// In mock mode the id is synthesized locally and `durable` is `false`.
    pub async fn create_request(
        &self,
        prompt_hash: &PromptHash,
    ) -> Result<Registration, LedgerError> {
        let inner = Arc::clone(&self.inner);
        let prompt_hash = *prompt_hash;
        let task = tokio::spawn(async move {
            let _serial = inner.mutations.lock().await;
            // Select after acquiring the lock so a demotion by the previous
            // mutation is honored.
            let active = inner.active();
            let result = active.backend.create_request(&prompt_hash).await;
            inner.observe("createRequest", &result);
            result.map(|request_id| Registration {
                request_id,
                durable: active.state.is_connected(),
            })
        });
        join("createRequest", task).await
    }

    /// Submit an answer and its proof bytes. Blocks until confirmed.
    pub async fn submit_answer(
        &self,
        request_id: RequestId,
        answer: String,
        proof: Vec<u8>,
    ) -> Result<TransactionReceipt, LedgerError> {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let _serial = inner.mutations.lock().await;
            let active = inner.active();
            let result = active
                .backend
                .submit_answer(request_id, &answer, &proof)
                .await;
            inner.observe("submitAnswer", &result);
            result
        });
        join("submitAnswer", task).await
    }

    pub async fn get_request(&self, request_id: RequestId) -> Result<RequestRecord, LedgerError> {
        let result = self.inner.active().backend.get_request(request_id).await;
        self.inner.observe("getRequest", &result);
        result
    }

    pub async fn get_answer(&self, request_id: RequestId) -> Result<AnswerRecord, LedgerError> {
        let result = self.inner.active().backend.get_answer(request_id).await;
        self.inner.observe("getAnswer", &result);
        result
    }

    /// Delegate signature verification to the ledger's own logic.
    pub async fn verify_signature(
        &self,
        request_id: RequestId,
        signature: &[u8],
    ) -> Result<bool, LedgerError> {
        let result = self
            .inner
            .active()
            .backend
            .verify_signature(request_id, signature)
            .await;
        self.inner.observe("verifySignature", &result);
        result
    }

    pub async fn get_total_requests(&self) -> Result<u64, LedgerError> {
        let result = self.inner.active().backend.get_total_requests().await;
        self.inner.observe("getTotalRequests", &result);
        result
    }
}

async fn join<T>(
    operation: &'static str,
    task: tokio::task::JoinHandle<Result<T, LedgerError>>,
) -> Result<T, LedgerError> {
    task.await
        .map_err(|e| LedgerError::tx(operation, format!("mutation task failed: {e}")))?
}

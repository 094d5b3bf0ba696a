//! Connection lifecycle, demotion, and mutation serialization of `LedgerClient`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use veritas_core::{LedgerAddress, PromptHash, RequestId};
use veritas_ledger::{
    AnswerRecord, ConnectionState, Ledger, LedgerClient, LedgerConfig, LedgerError, LiveLedger,
    RequestRecord, TransactionReceipt, TxStatus,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Backend that records how many mutations overlap.
#[derive(Debug, Default)]
struct SlowLedger {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    next_id: AtomicUsize,
    completed: AtomicBool,
}

impl SlowLedger {
    async fn mutate(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Ledger for SlowLedger {
    fn backend_name(&self) -> &'static str {
        "slow"
    }

    async fn create_request(&self, _prompt_hash: &PromptHash) -> Result<RequestId, LedgerError> {
        self.mutate().await;
        Ok(RequestId(self.next_id.fetch_add(1, Ordering::SeqCst) as u64))
    }

    async fn submit_answer(
        &self,
        _request_id: RequestId,
        _answer: &str,
        _proof: &[u8],
    ) -> Result<TransactionReceipt, LedgerError> {
        self.mutate().await;
        Ok(TransactionReceipt {
            transaction_hash: "0x1".into(),
            status: TxStatus::Confirmed,
            block_number: Some(1),
            events: vec![],
        })
    }

    async fn verify_signature(&self, _: RequestId, _: &[u8]) -> Result<bool, LedgerError> {
        Ok(true)
    }

    async fn get_request(&self, id: RequestId) -> Result<RequestRecord, LedgerError> {
        Err(LedgerError::NotFound {
            what: format!("request {id}"),
        })
    }

    async fn get_answer(&self, id: RequestId) -> Result<AnswerRecord, LedgerError> {
        Err(LedgerError::NotFound {
            what: format!("answer for request {id}"),
        })
    }

    async fn get_total_requests(&self) -> Result<u64, LedgerError> {
        Ok(self.next_id.load(Ordering::SeqCst) as u64)
    }
}

/// Backend whose `create_request` parks until released.
#[derive(Debug, Default)]
struct ParkedLedger {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl Ledger for ParkedLedger {
    fn backend_name(&self) -> &'static str {
        "parked"
    }

    async fn create_request(&self, _prompt_hash: &PromptHash) -> Result<RequestId, LedgerError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(RequestId(7))
    }

    async fn submit_answer(
        &self,
        _request_id: RequestId,
        _answer: &str,
        _proof: &[u8],
    ) -> Result<TransactionReceipt, LedgerError> {
        Err(LedgerError::NotConnected)
    }

    async fn verify_signature(&self, _: RequestId, _: &[u8]) -> Result<bool, LedgerError> {
        Ok(true)
    }

    async fn get_request(&self, _id: RequestId) -> Result<RequestRecord, LedgerError> {
        Ok(RequestRecord {
            prompt_hash: PromptHash::of("earlier"),
            requester: LedgerAddress::new("0xabc"),
            timestamp: 1,
            answered: false,
        })
    }

    async fn get_answer(&self, id: RequestId) -> Result<AnswerRecord, LedgerError> {
        Err(LedgerError::NotFound {
            what: format!("answer for request {id}"),
        })
    }

    async fn get_total_requests(&self) -> Result<u64, LedgerError> {
        Ok(0)
    }
}

#[tokio::test]
async fn missing_credential_selects_mock_mode() {
    let client = LedgerClient::connect(None).await;
    assert_eq!(client.state(), ConnectionState::MockMode);

    let reg = client.create_request(&PromptHash::of("q")).await.unwrap();
    assert!(!reg.durable);
}

#[tokio::test]
async fn successful_probe_connects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ledger/v1/requests/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"total": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = LedgerConfig::local(&server.uri(), "k").unwrap();
    let client = LedgerClient::connect(Some(cfg)).await;
    assert_eq!(client.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn failed_probe_selects_mock_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ledger/v1/requests/count"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cfg = LedgerConfig::local(&server.uri(), "k").unwrap();
    let client = LedgerClient::connect(Some(cfg)).await;
    assert_eq!(client.state(), ConnectionState::MockMode);
}

#[tokio::test]
async fn transport_failure_demotes_permanently() {
    let cfg = LedgerConfig::local("http://127.0.0.1:1", "k").unwrap();
    let live = LiveLedger::new(&cfg).unwrap();
    let client = LedgerClient::with_backend(Arc::new(live));
    assert!(client.is_connected());

    let err = client.get_total_requests().await.unwrap_err();
    assert!(err.is_unrecoverable());
    assert_eq!(client.state(), ConnectionState::MockMode);

    // Subsequent calls use the mock backend without touching the network.
    let reg = client.create_request(&PromptHash::of("q")).await.unwrap();
    assert!(!reg.durable);
    assert!(matches!(
        client.get_request(RequestId(1)).await,
        Err(LedgerError::NotConnected)
    ));
}

#[tokio::test]
async fn rejected_transaction_does_not_demote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ledger/v1/requests"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let cfg = LedgerConfig::local(&server.uri(), "k").unwrap();
    let client = LedgerClient::with_backend(Arc::new(LiveLedger::new(&cfg).unwrap()));
    let err = client.create_request(&PromptHash::of("q")).await.unwrap_err();
    assert!(matches!(err, LedgerError::TransactionFailed { .. }));
    assert_eq!(client.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn mutations_never_overlap() {
    let backend = Arc::new(SlowLedger::default());
    let client = LedgerClient::with_backend(backend.clone());

    let mut handles = Vec::new();
    for i in 0..4 {
        let c = client.clone();
        handles.push(tokio::spawn(async move {
            c.create_request(&PromptHash::of(&format!("q{i}")))
                .await
                .map(|_| ())
        }));
        let c = client.clone();
        handles.push(tokio::spawn(async move {
            c.submit_answer(RequestId(i), "a".into(), b"p".to_vec())
                .await
                .map(|_| ())
        }));
    }
    for h in handles {
        h.await.unwrap().unwrap();
    }

    assert_eq!(backend.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn registrations_on_connected_client_are_durable() {
    let client = LedgerClient::with_backend(Arc::new(SlowLedger::default()));
    let a = client.create_request(&PromptHash::of("a")).await.unwrap();
    let b = client.create_request(&PromptHash::of("b")).await.unwrap();
    assert!(a.durable && b.durable);
    assert_ne!(a.request_id, b.request_id);
}

#[tokio::test]
async fn dropping_the_caller_does_not_withdraw_a_mutation() {
    let backend = Arc::new(SlowLedger::default());
    let client = LedgerClient::with_backend(backend.clone());

    let abandoned = tokio::time::timeout(
        Duration::from_millis(1),
        client.create_request(&PromptHash::of("q")),
    )
    .await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(backend.completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn shutdown_releases_live_backend() {
    let client = LedgerClient::with_backend(Arc::new(SlowLedger::default()));
    client.shutdown();
    assert_eq!(client.state(), ConnectionState::MockMode);
    let reg = client.create_request(&PromptHash::of("q")).await.unwrap();
    assert!(!reg.durable);
}

#[test]
fn local_ids_are_unique() {
    let client = LedgerClient::mock();
    let ids: HashSet<_> = (0..1_000)
        .map(|_| client.local_request_id().unwrap())
        .collect();
    assert_eq!(ids.len(), 1_000);
}

#[tokio::test]
async fn reads_proceed_while_a_mutation_is_in_flight() {
    let backend = Arc::new(ParkedLedger::default());
    let client = LedgerClient::with_backend(backend.clone());

    let writer = {
        let client = client.clone();
        tokio::spawn(async move { client.create_request(&PromptHash::of("q")).await })
    };
    backend.entered.notified().await;

    let (request, verified) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(
            client.get_request(RequestId(1)),
            client.verify_signature(RequestId(1), b"sig"),
        )
    })
    .await
    .expect("reads waited on the in-flight mutation");
    assert!(!request.unwrap().answered);
    assert!(verified.unwrap());
    assert!(!writer.is_finished());

    backend.release.notify_one();
    let reg = writer.await.unwrap().unwrap();
    assert_eq!(reg.request_id, RequestId(7));
    assert!(reg.durable);
}

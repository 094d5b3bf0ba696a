//! Mock-mode backend.
//!
//! Nothing is durable. `createRequest` synthesizes a local id so the
//! coordinator can still hand one to the caller; every other operation
//! fails with [`LedgerError::NotConnected`].

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use rand::Rng;
use veritas_core::{PromptHash, RequestId};

use crate::error::LedgerError;
use crate::types::{AnswerRecord, RequestRecord, TransactionReceipt};
use crate::Ledger;

/// Size of the local id space. Ids fall in `[0, MOCK_ID_SPACE)`.
pub const MOCK_ID_SPACE: u64 = 1_000_000;

/// Issues request ids that are never reissued within the process.
///
/// Ids walk a full-period affine permutation `offset + stride * n (mod space)`
/// with a random offset and a random stride coprime to the space. Every id in
/// the space is issued exactly once. Draws are non-cryptographic. Local ids
/// are disjoint from ledger ids in practice only: a ledger that has issued
/// more than [`MOCK_ID_SPACE`] requests can overlap.
///
/// Once the space is used up, [`allocate`](Self::allocate) fails with
/// [`LedgerError::IdSpaceExhausted`].
#[derive(Debug)]
pub struct LocalIdAllocator {
    space: u64,
    offset: u64,
    stride: u64,
    next: AtomicU64,
}

impl Default for LocalIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdAllocator {
    pub fn new() -> Self {
        Self::with_space(MOCK_ID_SPACE)
    }

    fn with_space(space: u64) -> Self {
        let space = space.max(1);
        let mut rng = rand::thread_rng();
        let stride = loop {
            let candidate = rng.gen_range(1..=space);
            if gcd(candidate, space) == 1 {
                break candidate;
            }
        };
        Self {
            space,
            offset: rng.gen_range(0..space),
            stride,
            next: AtomicU64::new(0),
        }
    }

    /// Issue a fresh id.
    pub fn allocate(&self) -> Result<RequestId, LedgerError> {
        let n = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < self.space).then_some(n + 1)
            })
            .map_err(|_| LedgerError::IdSpaceExhausted { space: self.space })?;
        // stride <= space and n < space, with space at most MOCK_ID_SPACE: no overflow.
        Ok(RequestId((self.offset + self.stride * n) % self.space))
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> usize {
        self.next.load(Ordering::Relaxed) as usize
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Ledger backend used in mock mode.
#[derive(Debug, Default)]
pub struct MockLedger {
    ids: LocalIdAllocator,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a local request id.
    pub fn allocate_local_id(&self) -> Result<RequestId, LedgerError> {
        self.ids.allocate()
    }

    /// Number of local ids issued so far.
    pub fn issued(&self) -> usize {
        self.ids.issued()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn create_request(&self, prompt_hash: &PromptHash) -> Result<RequestId, LedgerError> {
        let id = self.ids.allocate()?;
        tracing::debug!(request_id = %id, prompt_hash = %prompt_hash, "mock request id issued");
        Ok(id)
    }

    async fn submit_answer(
        &self,
        _request_id: RequestId,
        _answer: &str,
        _proof: &[u8],
    ) -> Result<TransactionReceipt, LedgerError> {
        Err(LedgerError::NotConnected)
    }

    async fn verify_signature(
        &self,
        _request_id: RequestId,
        _signature: &[u8],
    ) -> Result<bool, LedgerError> {
        Err(LedgerError::NotConnected)
    }

    async fn get_request(&self, _request_id: RequestId) -> Result<RequestRecord, LedgerError> {
        Err(LedgerError::NotConnected)
    }

    async fn get_answer(&self, _request_id: RequestId) -> Result<AnswerRecord, LedgerError> {
        Err(LedgerError::NotConnected)
    }

    async fn get_total_requests(&self) -> Result<u64, LedgerError> {
        Err(LedgerError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    #[test]
    fn allocated_ids_are_in_range_and_unique() {
        let alloc = LocalIdAllocator::new();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = alloc.allocate().unwrap();
            assert!(id.value() < MOCK_ID_SPACE);
            assert!(seen.insert(id), "id {id} reissued");
        }
        assert_eq!(alloc.issued(), 10_000);
    }

    #[test]
    fn full_space_is_issued_once_then_exhausted() {
        let alloc = LocalIdAllocator::new();
        let mut seen = vec![false; MOCK_ID_SPACE as usize];
        for _ in 0..MOCK_ID_SPACE {
            let id = alloc.allocate().unwrap().value() as usize;
            assert!(!seen[id], "id {id} reissued");
            seen[id] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert!(matches!(
            alloc.allocate(),
            Err(LedgerError::IdSpaceExhausted { space: MOCK_ID_SPACE })
        ));
        assert_eq!(alloc.issued(), MOCK_ID_SPACE as usize);
    }

    #[test]
    fn exhaustion_is_sticky() {
        let alloc = LocalIdAllocator::with_space(3);
        let ids: HashSet<_> = (0..3).map(|_| alloc.allocate().unwrap().value()).collect();
        assert_eq!(ids, HashSet::from([0, 1, 2]));
        for _ in 0..5 {
            assert!(alloc.allocate().is_err());
        }
        assert_eq!(alloc.issued(), 3);
    }

    #[test]
    fn allocators_draw_independent_sequences() {
        let a = LocalIdAllocator::new();
        let b = LocalIdAllocator::new();
        let first_a: Vec<_> = (0..8).map(|_| a.allocate().unwrap()).collect();
        let first_b: Vec<_> = (0..8).map(|_| b.allocate().unwrap()).collect();
        assert_ne!(first_a, first_b);
    }

    #[tokio::test]
    async fn exhausted_mock_fails_create_request() {
        let ledger = MockLedger {
            ids: LocalIdAllocator::with_space(1),
        };
        assert!(ledger.create_request(&PromptHash::of("q")).await.is_ok());
        assert!(matches!(
            ledger.create_request(&PromptHash::of("q")).await,
            Err(LedgerError::IdSpaceExhausted { space: 1 })
        ));
    }

    #[tokio::test]
    async fn mock_synthesizes_request_ids() {
        let ledger = MockLedger::new();
        let a = ledger.create_request(&PromptHash::of("q")).await.unwrap();
        let b = ledger.create_request(&PromptHash::of("q")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(ledger.issued(), 2);
    }

    #[tokio::test]
    async fn mock_reads_are_not_connected() {
        let ledger = MockLedger::new();
        assert!(matches!(
            ledger.get_request(RequestId(1)).await,
            Err(LedgerError::NotConnected)
        ));
        assert!(matches!(
            ledger.get_answer(RequestId(1)).await,
            Err(LedgerError::NotConnected)
        ));
        assert!(matches!(
            ledger.verify_signature(RequestId(1), b"sig").await,
            Err(LedgerError::NotConnected)
        ));
        assert!(matches!(
            ledger.submit_answer(RequestId(1), "a", b"p").await,
            Err(LedgerError::NotConnected)
        ));
        assert!(matches!(
            ledger.get_total_requests().await,
            Err(LedgerError::NotConnected)
        ));
    }
}

//! In-memory implementations of the storage ports.
//!
//! Used by tests and by the `memory` backend. Clones share the same storage,
//! so a test can keep a handle and inspect what a session wrote.

use crate::ai::MoveNetwork;
use crate::error::{BoundaryError, BoundaryErrorKind};
use crate::leaderboard::{GameResult, Leaderboard};
use crate::ports::{Backends, HistorySink, LeaderboardStore, PredictorHandle, PredictorStore};
use crate::records::TrainingRecord;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn injected(kind: BoundaryErrorKind, what: &str) -> BoundaryError {
    BoundaryError::new(kind, format!("injected failure: {}", what))
}

/// Move history held in a shared vector.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    records: Arc<Mutex<Vec<TrainingRecord>>>,
    fail: Arc<AtomicBool>,
}

impl MemoryHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history pre-filled with `records`.
    pub fn with_records(records: Vec<TrainingRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            fail: Arc::default(),
        }
    }

    /// Makes every subsequent call fail with an I/O error.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<TrainingRecord> {
        lock(&self.records).clone()
    }
}

#[async_trait]
impl HistorySink for MemoryHistory {
    async fn read_history(&self) -> Result<Vec<TrainingRecord>, BoundaryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected(BoundaryErrorKind::Io, "read history"));
        }
        Ok(self.records())
    }

    #[instrument(skip(self, record), fields(position = record.position()))]
    async fn append_record(&self, record: &TrainingRecord) -> Result<(), BoundaryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected(BoundaryErrorKind::Io, "append record"));
        }
        lock(&self.records).push(record.clone());
        debug!("Record appended in memory");
        Ok(())
    }
}

/// Leaderboard held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLeaderboard {
    board: Arc<Mutex<Leaderboard>>,
    fail: Arc<AtomicBool>,
}

impl MemoryLeaderboard {
    /// Creates an empty leaderboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `board`.
    pub fn with_leaderboard(board: Leaderboard) -> Self {
        Self {
            board: Arc::new(Mutex::new(board)),
            fail: Arc::default(),
        }
    }

    /// Makes every subsequent call fail with an I/O error.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the current leaderboard.
    pub fn snapshot(&self) -> Leaderboard {
        lock(&self.board).clone()
    }
}

#[async_trait]
impl LeaderboardStore for MemoryLeaderboard {
    async fn read_leaderboard(&self) -> Result<Leaderboard, BoundaryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected(BoundaryErrorKind::Io, "read leaderboard"));
        }
        Ok(self.snapshot())
    }

    #[instrument(skip(self))]
    async fn update_leaderboard(
        &self,
        nickname: &str,
        result: GameResult,
    ) -> Result<(), BoundaryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected(BoundaryErrorKind::Io, "update leaderboard"));
        }
        lock(&self.board).apply(nickname, result);
        Ok(())
    }
}

const MEMORY_HANDLE: &str = "memory";

/// Predictor storage holding the serialised bytes of at most one network.
#[derive(Debug, Clone, Default)]
pub struct MemoryPredictorStore {
    stored: Arc<Mutex<Option<Vec<u8>>>>,
    persist_calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MemoryPredictorStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding raw bytes (which need not decode).
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            stored: Arc::new(Mutex::new(Some(bytes))),
            ..Self::default()
        }
    }

    /// Creates a store already holding `network`.
    pub fn with_network(network: &MoveNetwork) -> Result<Self, BoundaryError> {
        Ok(Self::with_bytes(network.to_bytes()?))
    }

    /// Makes every subsequent call fail with an HTTP error.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of persist attempts so far, failed ones included.
    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }

    /// Decodes the stored network, if any.
    pub fn stored(&self) -> Option<MoveNetwork> {
        lock(&self.stored)
            .as_deref()
            .and_then(|bytes| MoveNetwork::from_bytes(bytes).ok())
    }
}

#[async_trait]
impl PredictorStore for MemoryPredictorStore {
    async fn find_predictor(&self) -> Result<Option<PredictorHandle>, BoundaryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected(BoundaryErrorKind::Http, "find predictor"));
        }
        Ok(lock(&self.stored)
            .as_ref()
            .map(|_| PredictorHandle(MEMORY_HANDLE.to_string())))
    }

    async fn download_predictor(
        &self,
        handle: &PredictorHandle,
    ) -> Result<MoveNetwork, BoundaryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected(BoundaryErrorKind::Http, "download predictor"));
        }
        let guard = lock(&self.stored);
        let bytes = guard
            .as_deref()
            .ok_or_else(|| BoundaryError::not_found(format!("no predictor at {}", handle)))?;
        Ok(MoveNetwork::from_bytes(bytes)?)
    }

    async fn persist_predictor(&self, predictor: &MoveNetwork) -> Result<(), BoundaryError> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(injected(BoundaryErrorKind::Http, "persist predictor"));
        }
        *lock(&self.stored) = Some(predictor.to_bytes()?);
        Ok(())
    }
}

/// Fresh in-memory backends; nothing survives the process.
pub fn memory_backends() -> Backends {
    Backends {
        history: Box::new(MemoryHistory::new()),
        leaderboard: Box::new(MemoryLeaderboard::new()),
        predictors: Box::new(MemoryPredictorStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_history() {
        let history = MemoryHistory::new();
        let handle = history.clone();
        history
            .append_record(&TrainingRecord::new([0; 9], 4))
            .await
            .unwrap();
        assert_eq!(handle.records().len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_bytes_fail_download() {
        let store = MemoryPredictorStore::with_bytes(b"not a model".to_vec());
        let handle = store.find_predictor().await.unwrap().unwrap();
        let err = store.download_predictor(&handle).await.unwrap_err();
        assert_eq!(err.kind, BoundaryErrorKind::Decode);
    }
}

//! In-memory [`Store`] for tests.
//!
//! `MemoryStore` records every committed batch as JSON rows and can be told to
//! fail pings or a specific stage of a specific batch, which is enough to
//! exercise the probe and batch-writer error paths without a server.

use crate::error::{RemoteException, StoreError, WriteStage};
use crate::store::{Record, Store, Transaction};
use async_trait::async_trait;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A batch committed to a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct CommittedBatch {
    pub table: &'static str,
    /// Wire rows, encoded as JSON objects keyed by column.
    pub rows: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Copy)]
struct InjectedFailure {
    table: &'static str,
    batch: usize,
    stage: WriteStage,
}

#[derive(Default)]
struct MemoryState {
    failing_pings: u32,
    /// Failing pings report a transport error instead of a server exception.
    pings_unavailable: bool,
    pings: u32,
    /// Transactions begun so far, per table.
    begun: HashMap<&'static str, usize>,
    failure: Option<InjectedFailure>,
    committed: Vec<CommittedBatch>,
}

/// Store that keeps committed rows in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `count` pings fail with a server exception.
    pub fn fail_pings(&self, count: u32) {
        let mut state = self.lock();
        state.failing_pings = count;
        state.pings_unavailable = false;
    }

    /// Make the next `count` pings fail without a server exception, as when
    /// the server cannot be reached at all.
    pub fn fail_pings_unavailable(&self, count: u32) {
        let mut state = self.lock();
        state.failing_pings = count;
        state.pings_unavailable = true;
    }

    /// Fail `stage` of the `batch`-th (0-based) transaction on `table`.
    pub fn fail_at(&self, table: &'static str, batch: usize, stage: WriteStage) {
        self.lock().failure = Some(InjectedFailure {
            table,
            batch,
            stage,
        });
    }

    /// Number of pings received.
    pub fn ping_count(&self) -> u32 {
        self.lock().pings
    }

    /// Number of transactions begun, across all tables.
    pub fn begin_count(&self) -> usize {
        self.lock().begun.values().sum()
    }

    /// Every committed batch, in commit order.
    pub fn committed(&self) -> Vec<CommittedBatch> {
        self.lock().committed.clone()
    }

    /// Sizes of the batches committed to `table`, in commit order.
    pub fn batch_sizes(&self, table: &str) -> Vec<usize> {
        self.lock()
            .committed
            .iter()
            .filter(|batch| batch.table == table)
            .map(|batch| batch.rows.len())
            .collect()
    }
}

fn injected(stage: WriteStage) -> StoreError {
    StoreError::Unavailable(format!("injected failure: {stage}"))
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.pings += 1;

        if state.failing_pings > 0 {
            state.failing_pings -= 1;
            if state.pings_unavailable {
                return Err(StoreError::Unavailable(
                    "connection refused (localhost:8123)".to_string(),
                ));
            }
            return Err(StoreError::Remote(RemoteException {
                code: 210,
                message: "Connection refused (localhost:8123)".to_string(),
                stack_trace: String::new(),
            }));
        }
        Ok(())
    }

    async fn begin<R: Record>(&self) -> Result<Box<dyn Transaction<R>>, StoreError> {
        let mut state = self.lock();
        let begun = state.begun.entry(R::TABLE).or_insert(0);
        let batch = *begun;
        *begun += 1;

        let failure = state
            .failure
            .filter(|f| f.table == R::TABLE && f.batch == batch)
            .map(|f| f.stage);

        if failure == Some(WriteStage::Begin) {
            return Err(injected(WriteStage::Begin));
        }

        Ok(Box::new(MemoryTransaction::<R> {
            state: Arc::clone(&self.state),
            failure,
            prepared: false,
            rows: Vec::new(),
            _record: PhantomData,
        }))
    }
}

struct MemoryTransaction<R> {
    state: Arc<Mutex<MemoryState>>,
    failure: Option<WriteStage>,
    prepared: bool,
    rows: Vec<serde_json::Value>,
    _record: PhantomData<fn() -> R>,
}

#[async_trait]
impl<R: Record> Transaction<R> for MemoryTransaction<R> {
    async fn prepare(&mut self) -> Result<(), StoreError> {
        if self.failure == Some(WriteStage::Prepare) {
            return Err(injected(WriteStage::Prepare));
        }
        self.prepared = true;
        Ok(())
    }

    async fn execute(&mut self, row: R::Row) -> Result<(), StoreError> {
        if !self.prepared {
            return Err(StoreError::NotPrepared);
        }

        let stage = WriteStage::Execute {
            row: self.rows.len(),
        };
        if self.failure == Some(stage) {
            return Err(injected(stage));
        }

        let value = serde_json::to_value(&row).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.rows.push(value);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        if !self.prepared {
            return Err(StoreError::NotPrepared);
        }
        if self.failure == Some(WriteStage::Commit) {
            return Err(injected(WriteStage::Commit));
        }

        let MemoryTransaction { state, rows, .. } = *self;
        state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .committed
            .push(CommittedBatch {
                table: R::TABLE,
                rows,
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biometric_generator::{BiometricGenerator, ControlObject};

    #[tokio::test]
    async fn test_execute_requires_prepare() {
        let store = MemoryStore::new();
        let object = BiometricGenerator::new(1).control_object(chrono::Utc::now());

        let mut transaction = store.begin::<ControlObject>().await.unwrap();
        let err = transaction.execute(object.to_row()).await.unwrap_err();

        assert!(matches!(err, StoreError::NotPrepared));
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_rows() {
        let store = MemoryStore::new();
        let object = BiometricGenerator::new(1).control_object(chrono::Utc::now());

        {
            let mut transaction = store.begin::<ControlObject>().await.unwrap();
            transaction.prepare().await.unwrap();
            transaction.execute(object.to_row()).await.unwrap();
        }

        assert!(store.committed().is_empty());
        assert_eq!(store.begin_count(), 1);
    }
}

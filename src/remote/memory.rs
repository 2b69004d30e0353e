//! In-memory remote store
//!
//! Reference backend for tests and development. Implements the full
//! [`RemoteStore`] contract, including compare-and-swap `update`
//! semantics, plus deterministic failure injection so callers can
//! exercise transient-failure paths without a real network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::errors::{StoreError, StoreResult};
use super::record::StoredRecord;
use super::{RemoteStore, UpdateFn};

/// In-memory [`RemoteStore`] with failure injection
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, StoredRecord>>,

    // Injected failure budgets, decremented per call
    fail_gets: AtomicU32,
    fail_updates: AtomicU32,
    fail_removes: AtomicU32,

    /// When set, update transforms run twice per call to simulate
    /// contention-driven re-invocation
    reinvoke_transforms: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` `get` calls with a transient error
    pub fn fail_next_gets(&self, n: u32) {
        self.fail_gets.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` `update` calls with a transient error
    pub fn fail_next_updates(&self, n: u32) {
        self.fail_updates.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` `remove` calls with a transient error
    pub fn fail_next_removes(&self, n: u32) {
        self.fail_removes.store(n, Ordering::SeqCst);
    }

    /// Run every update transform twice, as a contended store would
    pub fn set_reinvoke_transforms(&self, enabled: bool) {
        self.reinvoke_transforms.store(enabled, Ordering::SeqCst);
    }

    /// Inspect the record currently stored under `key`
    pub fn stored(&self, key: &str) -> Option<StoredRecord> {
        self.records.lock().expect("memory store poisoned").get(key).cloned()
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.lock().expect("memory store poisoned").len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn consume_failure(budget: &AtomicU32, op: &str) -> StoreResult<()> {
        let drawn = budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if drawn {
            Err(StoreError::Transient(format!("injected {} failure", op)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoredRecord>> {
        Self::consume_failure(&self.fail_gets, "get")?;
        Ok(self.stored(key))
    }

    async fn update(
        &self,
        key: &str,
        transform: UpdateFn<'_>,
    ) -> StoreResult<Option<StoredRecord>> {
        Self::consume_failure(&self.fail_updates, "update")?;

        let mut records = self.records.lock().expect("memory store poisoned");
        let current = records.get(key);

        if self.reinvoke_transforms.load(Ordering::SeqCst) {
            // First invocation discarded, as if another writer won the race
            let _ = transform(current);
        }

        match transform(current) {
            super::UpdateOutcome::Write(record) => {
                records.insert(key.to_string(), record.clone());
                Ok(Some(record))
            }
            super::UpdateOutcome::Cancel => Ok(None),
        }
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        Self::consume_failure(&self.fail_removes, "remove")?;
        self.records.lock().expect("memory store poisoned").remove(key);
        Ok(())
    }
}

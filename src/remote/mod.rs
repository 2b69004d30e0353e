//! Remote key-value store contract
//!
//! The document layer drives a remote store through three primitives:
//! point reads, atomic read-modify-write updates, and removal. Everything
//! else (locking, migrations, caching) is built on top of these.
//!
//! # Contract
//!
//! - `update` has compare-and-swap semantics: the transform may be invoked
//!   more than once on contention and must be a pure function of its input.
//! - The transform may cancel the write by returning [`UpdateOutcome::Cancel`];
//!   a cancelled update leaves the record untouched.
//! - Any call may fail with a transient error kind.

mod errors;
mod memory;
mod record;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use record::{LockInfo, StoredRecord};

use async_trait::async_trait;

/// Decision returned by an update transform
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// Replace the record with this value
    Write(StoredRecord),
    /// Leave the record untouched and abort the update
    Cancel,
}

/// Transform applied inside an atomic update
pub type UpdateFn<'a> = &'a (dyn Fn(Option<&StoredRecord>) -> UpdateOutcome + Send + Sync);

/// Backend-agnostic handle to one remote collection
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the record stored under `key`, if any
    async fn get(&self, key: &str) -> StoreResult<Option<StoredRecord>>;

    /// Atomically read-modify-write the record under `key`
    ///
    /// Returns the written record, or `None` if the transform cancelled.
    async fn update(&self, key: &str, transform: UpdateFn<'_>)
        -> StoreResult<Option<StoredRecord>>;

    /// Delete the record under `key` outright
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

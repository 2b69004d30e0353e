//! Session Lock Invariant Tests
//!
//! - At most one session holds a key open at a time
//! - Lock contention surfaces as SessionLocked, resolved by steal + reopen
//! - A lost lock fails writes immediately and keeps the document open
//! - Close releases the lock atomically with the final save

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use docstore::{
    CheckFn, DocumentConfig, DocumentStore, DocumentStoreProps, FailReason, MemoryStore,
    RetryPolicy,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PlayerData {
    coins: u64,
}

fn check() -> CheckFn<PlayerData> {
    Arc::new(|value| serde_json::from_value(value).map_err(|e| e.to_string()))
}

fn store(remote: Arc<MemoryStore>) -> DocumentStore<PlayerData> {
    DocumentStore::new(DocumentStoreProps {
        remote,
        check: check(),
        default: PlayerData { coins: 0 },
        migrations: Vec::new(),
        lock_sessions: true,
        config: DocumentConfig {
            autosave_interval: Duration::from_secs(3600),
            retry: RetryPolicy::immediate(),
        },
    })
}

#[tokio::test]
async fn test_second_session_cannot_open_locked_key() {
    let remote = Arc::new(MemoryStore::new());
    let session_a = store(Arc::clone(&remote));
    let session_b = store(Arc::clone(&remote));

    let doc_a = session_a.get_document("k");
    let doc_b = session_b.get_document("k");

    doc_a.open().await.unwrap();

    let err = doc_b.open().await.unwrap_err();
    assert_eq!(err.reason(), FailReason::SessionLocked);
    assert!(!doc_b.is_open());
    assert!(doc_a.is_open());
}

#[tokio::test]
async fn test_lock_is_released_by_close() {
    let remote = Arc::new(MemoryStore::new());
    let session_a = store(Arc::clone(&remote));
    let session_b = store(Arc::clone(&remote));

    let doc_a = session_a.get_document("k");
    doc_a.open().await.unwrap();
    assert!(remote.stored("k").unwrap().session_lock.is_some());

    doc_a.close().await.unwrap();
    assert!(remote.stored("k").unwrap().session_lock.is_none());

    // Second session can now open
    session_b.get_document("k").open().await.unwrap();
}

#[tokio::test]
async fn test_steal_lets_next_open_take_the_lock() {
    let remote = Arc::new(MemoryStore::new());
    let session_a = store(Arc::clone(&remote));
    let session_b = store(Arc::clone(&remote));

    let doc_a = session_a.get_document("k");
    let doc_b = session_b.get_document("k");

    doc_a.open().await.unwrap();
    assert_eq!(
        doc_b.open().await.unwrap_err().reason(),
        FailReason::SessionLocked
    );

    doc_b.steal().await;
    doc_b.open().await.unwrap();
    assert!(doc_b.is_open());
}

#[tokio::test]
async fn test_lost_lock_fails_writes_immediately_and_close_keeps_document_open() {
    let remote = Arc::new(MemoryStore::new());
    let session_a = store(Arc::clone(&remote));
    let session_b = store(Arc::clone(&remote));

    let doc_a = session_a.get_document("k");
    doc_a.open().await.unwrap();

    let doc_b = session_b.get_document("k");
    doc_b.steal().await;
    doc_b.open().await.unwrap();

    // The first session's lock is gone: a save must not clobber the thief
    let err = doc_a.save().await.unwrap_err();
    assert_eq!(err.reason(), FailReason::SessionLocked);

    // Close cannot persist either, so the document stays open
    let err = doc_a.close().await.unwrap_err();
    assert_eq!(err.reason(), FailReason::SessionLocked);
    assert!(doc_a.is_open());
    assert!(!doc_a.is_closing());
}

#[tokio::test]
async fn test_steal_flag_is_consumed_by_one_open() {
    let remote = Arc::new(MemoryStore::new());
    let session_a = store(Arc::clone(&remote));
    let session_b = store(Arc::clone(&remote));

    let doc_b = session_b.get_document("k");
    doc_b.steal().await;
    doc_b.open().await.unwrap();
    doc_b.close().await.unwrap();

    // A re-lock by another session must block the next plain open
    session_a.get_document("k").open().await.unwrap();
    assert_eq!(
        doc_b.open().await.unwrap_err().reason(),
        FailReason::SessionLocked
    );
}

#[tokio::test]
async fn test_transient_failure_during_open_is_not_retried_as_lock_contention() {
    let remote = Arc::new(MemoryStore::new());
    let session = store(Arc::clone(&remote));
    remote.fail_next_updates(1);

    let doc = session.get_document("k");
    let err = doc.open().await.unwrap_err();
    assert_eq!(err.reason(), FailReason::RemoteApiFail);
    assert!(!doc.is_open());

    // Nothing was written
    assert!(remote.stored("k").is_none());
}

#[tokio::test]
async fn test_is_open_available_tracks_local_and_remote_locks() {
    let remote = Arc::new(MemoryStore::new());
    let session_a = store(Arc::clone(&remote));
    let session_b = store(Arc::clone(&remote));

    let doc_a = session_a.get_document("k");
    let doc_b = session_b.get_document("k");

    assert!(doc_a.is_open_available().await.unwrap());

    doc_a.open().await.unwrap();
    // Locally open
    assert!(!doc_a.is_open_available().await.unwrap());
    // Remotely locked
    assert!(!doc_b.is_open_available().await.unwrap());

    doc_a.close().await.unwrap();
    assert!(doc_b.is_open_available().await.unwrap());
}

#[tokio::test]
async fn test_reopen_after_close_acquires_a_fresh_lock() {
    let remote = Arc::new(MemoryStore::new());
    let session = store(Arc::clone(&remote));

    let doc = session.get_document("k");
    doc.open().await.unwrap();
    let first_owner = remote.stored("k").unwrap().session_lock.unwrap().owner;
    doc.close().await.unwrap();

    doc.open().await.unwrap();
    let second_owner = remote.stored("k").unwrap().session_lock.unwrap().owner;
    assert_ne!(first_owner, second_owner);
}

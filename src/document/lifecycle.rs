//! The per-key document state machine
//!
//! A `Document` coordinates a remote store offering only primitive
//! get/compare-and-swap operations into a safe multi-operation protocol:
//! versioned migration on open, optional session locking with retries,
//! background autosave, and hook/signal dispatch around every operation.
//!
//! # Concurrency
//!
//! All state transitions happen under one `tokio::sync::Mutex`, so
//! overlapping calls from different tasks serialize instead of
//! interleaving. `is_open`/`is_closing` read an atomic state cell and
//! never block. Operations on one document complete in the order issued
//! by a caller that awaits each before issuing the next.
//!
//! # Usage errors
//!
//! Calling an operation in the wrong state, or producing data that fails
//! the check function from a transform, is a programming error and
//! panics. Environment and data failures come back as `Err` results and
//! are also broadcast through hooks and signals.

use std::fmt;
use std::sync::{Arc, Mutex as StdMutex, Weak};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::events::{HookEvent, HookRegistry, Signal};
use crate::lock;
use crate::migration::{self, CheckFn, Migration};
use crate::observability::Logger;
use crate::remote::{LockInfo, RemoteStore, StoredRecord, UpdateOutcome};

use super::config::DocumentConfig;
use super::errors::{CloseResult, DocumentError, OpenResult, ReadResult, WriteResult};
use super::state::{DocumentState, StateCell};

/// Mutable session state, guarded by the operation mutex
struct Inner<T> {
    cache: Option<Arc<T>>,
    lock_token: Option<Uuid>,
    steal_next_open: bool,
    autosave: Option<JoinHandle<()>>,
}

/// Client-side state machine over one record in the remote store
///
/// Created by [`DocumentStore::get_document`](crate::store::DocumentStore);
/// at most one `Document` exists per key per store. Callers drive
/// `open → {read | update | save | cache access} → close`.
pub struct Document<T> {
    key: String,
    remote: Arc<dyn RemoteStore>,
    check: CheckFn<T>,
    default: Value,
    migrations: Arc<Vec<Migration>>,
    lock_sessions: bool,
    config: DocumentConfig,

    state: StateCell,
    hooks: HookRegistry,
    opened: Signal<OpenResult<T>>,
    closed: Signal<CloseResult<T>>,
    updated: Signal<WriteResult<T>>,
    read: Signal<ReadResult<T>>,
    cache_changed: Signal<Arc<T>>,

    inner: Mutex<Inner<T>>,
    weak_self: Weak<Document<T>>,
}

impl<T> Document<T>
where
    T: Serialize + Send + Sync + 'static,
{
    pub(crate) fn new(
        key: String,
        remote: Arc<dyn RemoteStore>,
        check: CheckFn<T>,
        default: Value,
        migrations: Arc<Vec<Migration>>,
        lock_sessions: bool,
        config: DocumentConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            key,
            remote,
            check,
            default,
            migrations,
            lock_sessions,
            config,
            state: StateCell::new(),
            hooks: HookRegistry::new(),
            opened: Signal::new(),
            closed: Signal::new(),
            updated: Signal::new(),
            read: Signal::new(),
            cache_changed: Signal::new(),
            inner: Mutex::new(Inner {
                cache: None,
                lock_token: None,
                steal_next_open: false,
                autosave: None,
            }),
            weak_self: weak_self.clone(),
        })
    }

    /// The key this document is bound to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current lifecycle state; never blocks
    pub fn state(&self) -> DocumentState {
        self.state.get()
    }

    /// Whether the document is open
    pub fn is_open(&self) -> bool {
        self.state.get() == DocumentState::Open
    }

    /// Whether a close is in flight
    pub fn is_closing(&self) -> bool {
        self.state.get() == DocumentState::Closing
    }

    // ==================
    // Lifecycle
    // ==================

    /// Open the document
    ///
    /// Migrates and validates existing data, or creates the default if
    /// the key is empty, and persists the result; with session locking
    /// the lock is acquired in the same atomic write. If another session
    /// holds the lock this retries on a backoff (≈16s total by default)
    /// before returning `SessionLocked` — the library never steals on
    /// its own, call [`steal`](Self::steal) and reopen to take over.
    ///
    /// Opening a session-locked document enables periodic autosaves
    /// until it is closed.
    ///
    /// # Panics
    ///
    /// Panics if the document is not closed.
    pub async fn open(&self) -> OpenResult<T> {
        let mut inner = self.inner.lock().await;
        let state = self.state.get();
        if state != DocumentState::Closed {
            panic!("cannot open document '{}' in state {}", self.key, state);
        }
        self.state.set(DocumentState::Opening);
        let steal = inner.steal_next_open;
        inner.steal_next_open = false;

        self.hooks.fire_before(HookEvent::Open);
        let attempt = self.open_with_retries(steal).await;

        let result = match attempt {
            Ok((data, token)) => {
                if self.lock_sessions {
                    inner.cache = Some(Arc::clone(&data));
                }
                inner.lock_token = token;
                self.state.set(DocumentState::Open);
                if self.lock_sessions {
                    self.spawn_autosave(&mut inner);
                }
                self.hooks.fire_after(HookEvent::Open);
                Logger::info("DOCUMENT_OPENED", &[("key", &self.key)]);
                Ok(data)
            }
            Err(error) => {
                self.state.set(DocumentState::Closed);
                inner.cache = None;
                inner.lock_token = None;
                self.hooks.fire_fail(HookEvent::Open);
                Logger::warn(
                    "DOCUMENT_OPEN_FAILED",
                    &[("key", &self.key), ("reason", error.reason().as_str())],
                );
                Err(error)
            }
        };
        drop(inner);

        self.opened.fire(result.clone());
        result
    }

    /// Open, then run `transform` through the update path
    ///
    /// Useful for one-off updates to non-session-locked shared records.
    /// Runs both Open and Update hooks and signals, including fail hooks.
    /// The update only runs if the open succeeded.
    pub async fn open_and_update<F>(&self, transform: F) -> OpenResult<T>
    where
        F: Fn(&T) -> T + Send + Sync,
    {
        self.open().await?;
        self.update(transform).await
    }

    /// Close the document
    ///
    /// If session-locked, persists the cache and releases the lock in
    /// one atomic write, then cancels autosaves; the result carries the
    /// saved data. On failure the lock is kept and the document remains
    /// open so the caller can retry. Non-locking documents close without
    /// writing.
    ///
    /// # Panics
    ///
    /// Panics if the document is not open.
    pub async fn close(&self) -> CloseResult<T> {
        let mut inner = self.inner.lock().await;
        let state = self.state.get();
        if state != DocumentState::Open {
            panic!("cannot close document '{}' in state {}", self.key, state);
        }
        self.state.set(DocumentState::Closing);
        self.hooks.fire_before(HookEvent::Close);

        let result: CloseResult<T> = if self.lock_sessions {
            self.release_and_save(&mut inner).await.map(Some)
        } else {
            Ok(None)
        };

        match &result {
            Ok(_) => {
                if let Some(handle) = inner.autosave.take() {
                    handle.abort();
                }
                inner.cache = None;
                inner.lock_token = None;
                self.state.set(DocumentState::Closed);
                self.hooks.fire_after(HookEvent::Close);
                Logger::info("DOCUMENT_CLOSED", &[("key", &self.key)]);
            }
            Err(error) => {
                // Lock retained, autosaves keep running, caller may retry
                self.state.set(DocumentState::Open);
                self.hooks.fire_fail(HookEvent::Close);
                Logger::warn(
                    "DOCUMENT_CLOSE_FAILED",
                    &[("key", &self.key), ("reason", error.reason().as_str())],
                );
            }
        }
        drop(inner);

        self.closed.fire(result.clone());
        result
    }

    /// Mark any existing lock as stolen
    ///
    /// The next [`open`](Self::open) skips the staleness check and
    /// overwrites the lock unconditionally. Does not touch the remote
    /// store itself. Use only when the previous session is known dead,
    /// or data loss can result.
    ///
    /// # Panics
    ///
    /// Panics on documents without session locking.
    pub async fn steal(&self) {
        if !self.lock_sessions {
            panic!("steal is only meaningful for session-locked documents");
        }
        let mut inner = self.inner.lock().await;
        inner.steal_next_open = true;
        Logger::info("DOCUMENT_STEAL_ARMED", &[("key", &self.key)]);
    }

    /// Delete the remote record outright
    ///
    /// Bypasses hooks and signals. The caller is responsible for
    /// confirming no other session holds the key open.
    ///
    /// # Panics
    ///
    /// Panics unless the document is closed.
    pub async fn erase(&self) -> Result<(), DocumentError> {
        let _inner = self.inner.lock().await;
        let state = self.state.get();
        if state != DocumentState::Closed {
            panic!("cannot erase document '{}' in state {}", self.key, state);
        }
        self.remote.remove(&self.key).await.map_err(DocumentError::from)
    }

    // ==================
    // Reads and writes
    // ==================

    /// Fetch and validate the latest stored data without opening
    ///
    /// Runs migrations and the check function but never persists, and
    /// never touches the cache. Returns `SchemaError` when the key holds
    /// no data: an empty key is indistinguishable from one this library
    /// has never managed, so open the document first to materialize the
    /// default.
    pub async fn read(&self) -> ReadResult<T> {
        self.hooks.fire_before(HookEvent::Read);
        let result = self.read_inner().await;
        match &result {
            Ok(_) => self.hooks.fire_after(HookEvent::Read),
            Err(_) => self.hooks.fire_fail(HookEvent::Read),
        }
        self.read.fire(result.clone());
        result
    }

    /// Run `transform` over the document and persist the result
    ///
    /// Session-locked: equivalent to transforming the cache, firing
    /// CacheChanged, then saving under the held lock as one
    /// non-interruptible sequence. If the save fails the cache keeps the
    /// transformed value (a later save or autosave retries the write);
    /// loss of the lock is surfaced immediately as `SessionLocked`,
    /// never retried.
    ///
    /// Non-session-locked: `transform` runs inside the remote store's
    /// compare-and-swap, so it may execute several times on contention
    /// and must be a pure function of its input.
    ///
    /// # Panics
    ///
    /// Panics if the document is not open, or if the transform produces
    /// data that fails the check function or cannot be serialized.
    pub async fn update<F>(&self, transform: F) -> WriteResult<T>
    where
        F: Fn(&T) -> T + Send + Sync,
    {
        let mut inner = self.inner.lock().await;
        let state = self.state.get();
        if state != DocumentState::Open {
            panic!("cannot update document '{}' in state {}", self.key, state);
        }

        let result = if self.lock_sessions {
            let current = Arc::clone(
                inner
                    .cache
                    .as_ref()
                    .expect("open session-locked document always has a cache"),
            );
            let next = self.validate_transformed(transform(&current));
            inner.cache = Some(Arc::clone(&next));
            self.cache_changed.fire(Arc::clone(&next));
            self.persist_cache(&mut inner).await
        } else {
            self.cas_update(&transform).await
        };
        drop(inner);

        self.updated.fire(result.clone());
        result
    }

    /// Persist the cache under the held lock
    ///
    /// Equivalent to [`update`](Self::update) with the identity
    /// transform.
    ///
    /// # Panics
    ///
    /// Panics if the document is not open and session-locked.
    pub async fn save(&self) -> WriteResult<T> {
        if !self.lock_sessions {
            panic!("save requires a session-locked document");
        }
        let mut inner = self.inner.lock().await;
        let state = self.state.get();
        if state != DocumentState::Open {
            panic!("cannot save document '{}' in state {}", self.key, state);
        }
        let result = self.persist_cache(&mut inner).await;
        drop(inner);

        self.updated.fire(result.clone());
        result
    }

    // ==================
    // Cache access
    // ==================

    /// Replace the cache with `data` and fire CacheChanged
    ///
    /// The stored value is immutable from this point: edits require a
    /// fresh value through another `set_cache` or a transform. Returns
    /// the shared handle now held as the cache. The data is not written
    /// remotely until the next save, autosave or update.
    ///
    /// # Panics
    ///
    /// Panics if the document is not open and session-locked.
    pub async fn set_cache(&self, data: T) -> Arc<T> {
        let mut inner = self.inner.lock().await;
        self.assert_cache_access("set_cache");
        let data = Arc::new(data);
        inner.cache = Some(Arc::clone(&data));
        self.cache_changed.fire(Arc::clone(&data));
        data
    }

    /// The current cache
    ///
    /// # Panics
    ///
    /// Panics if the document is not open and session-locked.
    pub async fn get_cache(&self) -> Arc<T> {
        let inner = self.inner.lock().await;
        self.assert_cache_access("get_cache");
        Arc::clone(
            inner
                .cache
                .as_ref()
                .expect("open session-locked document always has a cache"),
        )
    }

    // ==================
    // Availability
    // ==================

    /// Whether an open would find the key unlocked
    ///
    /// `false` while open locally or while another session holds the
    /// lock remotely; always `true` for non-locking documents. Useful to
    /// check whether another server is still editing before stealing.
    pub async fn is_open_available(&self) -> Result<bool, DocumentError> {
        if !self.lock_sessions {
            return Ok(true);
        }
        if self.state.get() != DocumentState::Closed {
            return Ok(false);
        }
        let record = self.remote.get(&self.key).await.map_err(DocumentError::from)?;
        Ok(record.map_or(true, |r| r.session_lock.is_none()))
    }

    // ==================
    // Hooks and signals
    // ==================

    /// Attach a hook running before the event's remote call
    pub fn hook_before(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.hooks.hook_before(event, callback);
    }

    /// Attach a hook running after the event succeeds, before the caller
    /// receives the result
    pub fn hook_after(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.hooks.hook_after(event, callback);
    }

    /// Attach a hook running when the event returns a failure result
    ///
    /// Fail hooks do not run on usage-error panics.
    pub fn hook_fail(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.hooks.hook_fail(event, callback);
    }

    /// Single-use [`hook_before`](Self::hook_before)
    pub fn once_before(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.hooks.once_before(event, callback);
    }

    /// Single-use [`hook_after`](Self::hook_after)
    pub fn once_after(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.hooks.once_after(event, callback);
    }

    /// Single-use [`hook_fail`](Self::hook_fail)
    pub fn once_fail(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.hooks.once_fail(event, callback);
    }

    /// Fired on completion of any open, success or failure
    pub fn opened_signal(&self) -> &Signal<OpenResult<T>> {
        &self.opened
    }

    /// Fired on completion of any close, success or failure
    pub fn closed_signal(&self) -> &Signal<CloseResult<T>> {
        &self.closed
    }

    /// Fired on completion of any persisting operation, including saves
    /// and autosaves, success or failure
    pub fn updated_signal(&self) -> &Signal<WriteResult<T>> {
        &self.updated
    }

    /// Fired on completion of any read, success or failure
    pub fn read_signal(&self) -> &Signal<ReadResult<T>> {
        &self.read
    }

    /// Fired whenever the cache is set
    pub fn cache_changed_signal(&self) -> &Signal<Arc<T>> {
        &self.cache_changed
    }

    // ==================
    // Internals
    // ==================

    async fn open_with_retries(
        &self,
        steal: bool,
    ) -> Result<(Arc<T>, Option<Uuid>), DocumentError> {
        let mut attempt = 0;
        loop {
            match self.try_open_once(steal).await {
                Err(DocumentError::SessionLocked)
                    if attempt + 1 < self.config.retry.attempts =>
                {
                    Logger::debug(
                        "DOCUMENT_OPEN_RETRY",
                        &[("key", &self.key), ("attempt", &(attempt + 1).to_string())],
                    );
                    tokio::time::sleep(self.config.retry.delay(attempt)).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn try_open_once(
        &self,
        steal: bool,
    ) -> Result<(Arc<T>, Option<Uuid>), DocumentError> {
        let token = lock::new_token();
        let lock_sessions = self.lock_sessions;
        let migrations = Arc::clone(&self.migrations);
        let check = Arc::clone(&self.check);
        let default = self.default.clone();

        // Side channels out of the transform; it may run several times,
        // so each invocation resets them and the committed run wins
        let failure: StdMutex<Option<DocumentError>> = StdMutex::new(None);
        let opened: StdMutex<Option<Arc<T>>> = StdMutex::new(None);

        let transform = |raw: Option<&StoredRecord>| -> UpdateOutcome {
            *failure.lock().expect("open transform poisoned") = None;
            *opened.lock().expect("open transform poisoned") = None;

            let existing = raw.and_then(|r| r.session_lock.as_ref());
            if lock_sessions && !lock::can_acquire(existing, steal) {
                *failure.lock().expect("open transform poisoned") =
                    Some(DocumentError::SessionLocked);
                return UpdateOutcome::Cancel;
            }

            match migration::run(raw, &migrations, &check, &default) {
                Err(error) => {
                    *failure.lock().expect("open transform poisoned") = Some(error.into());
                    UpdateOutcome::Cancel
                }
                Ok(migrated) => {
                    *opened.lock().expect("open transform poisoned") =
                        Some(Arc::new(migrated.data));
                    let session_lock = if lock_sessions {
                        Some(LockInfo::new(token))
                    } else {
                        existing.cloned()
                    };
                    UpdateOutcome::Write(StoredRecord {
                        data: migrated.value,
                        migration_version: migrated.migration_version,
                        min_compatible_version: migrated.min_compatible_version,
                        session_lock,
                    })
                }
            }
        };

        match self.remote.update(&self.key, &transform).await {
            Err(error) => Err(error.into()),
            Ok(None) => Err(failure
                .lock()
                .expect("open transform poisoned")
                .take()
                .unwrap_or(DocumentError::SessionLocked)),
            Ok(Some(_)) => {
                let data = opened
                    .lock()
                    .expect("open transform poisoned")
                    .take()
                    .expect("committed open always produces data");
                Ok((data, lock_sessions.then_some(token)))
            }
        }
    }

    /// Write the cache under the held lock, firing Update hooks
    async fn persist_cache(&self, inner: &mut Inner<T>) -> WriteResult<T> {
        self.hooks.fire_before(HookEvent::Update);
        let result = self
            .write_locked(inner, /* release_lock = */ false)
            .await;
        match &result {
            Ok(_) => self.hooks.fire_after(HookEvent::Update),
            Err(_) => self.hooks.fire_fail(HookEvent::Update),
        }
        result
    }

    /// Write the cache and clear the lock; Close hooks cover this path
    async fn release_and_save(&self, inner: &mut Inner<T>) -> WriteResult<T> {
        self.write_locked(inner, /* release_lock = */ true).await
    }

    async fn write_locked(&self, inner: &mut Inner<T>, release_lock: bool) -> WriteResult<T> {
        let token = inner
            .lock_token
            .expect("open session-locked document always holds a token");
        let cache = Arc::clone(
            inner
                .cache
                .as_ref()
                .expect("open session-locked document always has a cache"),
        );
        let value =
            serde_json::to_value(&*cache).expect("document data must serialize to JSON");

        // The only cancel cause here is a lost lock, so no side channel
        // is needed to classify Ok(None)
        let transform = |raw: Option<&StoredRecord>| -> UpdateOutcome {
            let existing = raw.and_then(|r| r.session_lock.as_ref());
            if !lock::is_held_by(existing, token) {
                return UpdateOutcome::Cancel;
            }
            let record = raw.expect("a held lock implies a record");
            UpdateOutcome::Write(StoredRecord {
                data: value.clone(),
                migration_version: record.migration_version,
                min_compatible_version: record.min_compatible_version,
                session_lock: if release_lock { None } else { record.session_lock.clone() },
            })
        };

        match self.remote.update(&self.key, &transform).await {
            Err(error) => Err(error.into()),
            Ok(None) => Err(DocumentError::SessionLocked),
            Ok(Some(_)) => Ok(cache),
        }
    }

    /// Transform inside the remote compare-and-swap, for documents
    /// without session locking
    async fn cas_update<F>(&self, transform: &F) -> WriteResult<T>
    where
        F: Fn(&T) -> T + Send + Sync,
    {
        self.hooks.fire_before(HookEvent::Update);

        let migrations = Arc::clone(&self.migrations);
        let check = Arc::clone(&self.check);
        let default = self.default.clone();
        let failure: StdMutex<Option<DocumentError>> = StdMutex::new(None);
        let produced: StdMutex<Option<Arc<T>>> = StdMutex::new(None);

        let closure = |raw: Option<&StoredRecord>| -> UpdateOutcome {
            *failure.lock().expect("update transform poisoned") = None;
            *produced.lock().expect("update transform poisoned") = None;

            match migration::run(raw, &migrations, &check, &default) {
                Err(error) => {
                    *failure.lock().expect("update transform poisoned") = Some(error.into());
                    UpdateOutcome::Cancel
                }
                Ok(migrated) => {
                    let next = self.validate_transformed(transform(&migrated.data));
                    let value = serde_json::to_value(&*next)
                        .expect("document data must serialize to JSON");
                    *produced.lock().expect("update transform poisoned") = Some(next);
                    UpdateOutcome::Write(StoredRecord {
                        data: value,
                        migration_version: migrated.migration_version,
                        min_compatible_version: migrated.min_compatible_version,
                        session_lock: raw.and_then(|r| r.session_lock.clone()),
                    })
                }
            }
        };

        let result = match self.remote.update(&self.key, &closure).await {
            Err(error) => Err(error.into()),
            Ok(None) => Err(failure
                .lock()
                .expect("update transform poisoned")
                .take()
                .unwrap_or(DocumentError::SessionLocked)),
            Ok(Some(_)) => Ok(produced
                .lock()
                .expect("update transform poisoned")
                .take()
                .expect("committed update always produces data")),
        };

        match &result {
            Ok(_) => self.hooks.fire_after(HookEvent::Update),
            Err(_) => self.hooks.fire_fail(HookEvent::Update),
        }
        result
    }

    async fn read_inner(&self) -> ReadResult<T> {
        let raw = self.remote.get(&self.key).await.map_err(DocumentError::from)?;
        let Some(record) = raw else {
            return Err(DocumentError::SchemaError);
        };
        let migrated = migration::run(Some(&record), &self.migrations, &self.check, &self.default)?;
        Ok(Arc::new(migrated.data))
    }

    /// Check-validate locally transformed data; panics on violation
    /// because the transform, not the environment, is at fault
    fn validate_transformed(&self, next: T) -> Arc<T> {
        let value = serde_json::to_value(&next)
            .unwrap_or_else(|e| panic!("transform produced unserializable data: {}", e));
        match (self.check)(value) {
            Ok(checked) => Arc::new(checked),
            Err(message) => {
                panic!("transform produced data that fails the check function: {}", message)
            }
        }
    }

    fn spawn_autosave(&self, inner: &mut Inner<T>) {
        let weak = self.weak_self.clone();
        let period = self.config.autosave_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await; // first tick completes immediately
            loop {
                ticker.tick().await;
                let Some(document) = weak.upgrade() else { break };
                document.autosave_tick().await;
            }
        });
        inner.autosave = Some(handle);
    }

    async fn autosave_tick(&self) {
        let mut inner = self.inner.lock().await;
        if self.state.get() != DocumentState::Open {
            return;
        }
        let result = self.persist_cache(&mut inner).await;
        if let Err(error) = &result {
            Logger::warn(
                "DOCUMENT_AUTOSAVE_FAILED",
                &[("key", &self.key), ("reason", error.reason().as_str())],
            );
        }
        drop(inner);

        self.updated.fire(result);
    }

    fn assert_cache_access(&self, operation: &str) {
        if !self.lock_sessions {
            panic!("{} requires a session-locked document", operation);
        }
        let state = self.state.get();
        if state != DocumentState::Open {
            panic!(
                "cannot {} on document '{}' in state {}",
                operation, self.key, state
            );
        }
    }
}

impl<T> Drop for Document<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.get_mut().autosave.take() {
            handle.abort();
        }
    }
}

impl<T> fmt::Display for Document<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document({})", self.key)
    }
}

impl<T> fmt::Debug for Document<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("key", &self.key)
            .field("state", &self.state.get())
            .field("lock_sessions", &self.lock_sessions)
            .finish_non_exhaustive()
    }
}

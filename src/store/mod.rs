//! Document registry
//!
//! A [`DocumentStore`] owns every [`Document`] for one remote collection
//! and guarantees at most one live document per key per process: repeat
//! lookups return the same shared instance. Two documents for one key
//! would be two divergent, unsynchronized sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;

use crate::document::{Document, DocumentConfig, DocumentState};
use crate::migration::{self, CheckFn, Migration};
use crate::observability::Logger;
use crate::remote::RemoteStore;

/// Construction properties for a [`DocumentStore`]
pub struct DocumentStoreProps<T> {
    /// Handle to the remote collection
    pub remote: Arc<dyn RemoteStore>,

    /// Type check for the data; must accept `default` and the output of
    /// every migration chain head
    pub check: CheckFn<T>,

    /// Default data, materialized when a key is empty
    pub default: T,

    /// Ordered migration chain; its length is the current schema version
    pub migrations: Vec<Migration>,

    /// Whether documents take an exclusive session lock while open
    pub lock_sessions: bool,

    /// Shared tunables (autosave interval, lock retry policy)
    pub config: DocumentConfig,
}

/// Registry and factory for the documents of one remote collection
pub struct DocumentStore<T> {
    remote: Arc<dyn RemoteStore>,
    check: CheckFn<T>,
    default: Value,
    migrations: Arc<Vec<Migration>>,
    lock_sessions: bool,
    config: DocumentConfig,
    registry: Mutex<HashMap<String, Arc<Document<T>>>>,
}

impl<T> DocumentStore<T>
where
    T: Serialize + Send + Sync + 'static,
{
    /// Create a store over one remote collection
    ///
    /// # Panics
    ///
    /// Panics if `default` does not serialize or fails the check
    /// function: defaults that violate the schema are a programming
    /// error that would otherwise surface on every fresh key.
    pub fn new(props: DocumentStoreProps<T>) -> Self {
        let default = serde_json::to_value(&props.default)
            .expect("default data must serialize to JSON");
        if let Err(message) = (props.check)(default.clone()) {
            panic!("default data must pass the check function: {}", message);
        }

        Self {
            remote: props.remote,
            check: props.check,
            default,
            migrations: Arc::new(props.migrations),
            lock_sessions: props.lock_sessions,
            config: props.config,
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Current schema version of this store's migration chain
    pub fn current_version(&self) -> u32 {
        migration::current_version(&self.migrations)
    }

    /// Get the document for `key`, creating one if absent
    ///
    /// Creation is lazy: no remote call happens until the document is
    /// opened or read.
    pub fn get_document(&self, key: &str) -> Arc<Document<T>> {
        let mut registry = self.registry.lock().expect("document registry poisoned");
        if let Some(document) = registry.get(key) {
            return Arc::clone(document);
        }

        let document = Document::new(
            key.to_string(),
            Arc::clone(&self.remote),
            Arc::clone(&self.check),
            self.default.clone(),
            Arc::clone(&self.migrations),
            self.lock_sessions,
            self.config.clone(),
        );
        registry.insert(key.to_string(), Arc::clone(&document));
        document
    }

    /// Close every open document, best-effort
    ///
    /// Failures are logged and skipped so one stuck document cannot
    /// prevent the rest from closing. Returns the number of documents
    /// that failed to close.
    pub async fn close_all_documents(&self) -> usize {
        let documents: Vec<Arc<Document<T>>> = {
            let registry = self.registry.lock().expect("document registry poisoned");
            registry.values().map(Arc::clone).collect()
        };

        let mut failed = 0;
        for document in documents {
            if !document.is_open() {
                continue;
            }
            if document.close().await.is_err() {
                failed += 1;
            }
        }
        if failed > 0 {
            Logger::warn(
                "STORE_CLOSE_ALL_INCOMPLETE",
                &[("failed", &failed.to_string())],
            );
        }
        failed
    }

    /// Drop the registry entry for `key` if its document is closed
    ///
    /// Returns whether an entry was removed. Open documents are never
    /// forcibly removed; outstanding `Arc` handles stay valid either
    /// way.
    pub fn release_document(&self, key: &str) -> bool {
        let mut registry = self.registry.lock().expect("document registry poisoned");
        match registry.get(key) {
            Some(document) if document.state() == DocumentState::Closed => {
                registry.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Number of documents currently registered
    pub fn document_count(&self) -> usize {
        self.registry.lock().expect("document registry poisoned").len()
    }
}

impl<T> std::fmt::Debug for DocumentStore<T>
where
    T: Serialize + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("lock_sessions", &self.lock_sessions)
            .field("current_version", &migration::current_version(&self.migrations))
            .field("documents", &self.document_count())
            .finish_non_exhaustive()
    }
}

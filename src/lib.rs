//! docstore - a session-locking, migration-aware document layer over
//! remote key-value stores
//!
//! The remote store offers only primitive operations: point `get`,
//! atomic read-modify-write `update`, and `remove`. This crate builds a
//! safe multi-operation protocol on top: per-key [`Document`] state
//! machines with versioned data migration, optional single-writer
//! session locking with retries and background autosave, and an
//! observability layer of hooks and signals around every lifecycle
//! event.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde::{Deserialize, Serialize};
//! use docstore::{DocumentConfig, DocumentStore, DocumentStoreProps, MemoryStore};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct PlayerData {
//!     coins: u64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(DocumentStoreProps {
//!         remote: Arc::new(MemoryStore::new()),
//!         check: Arc::new(|value| {
//!             serde_json::from_value::<PlayerData>(value).map_err(|e| e.to_string())
//!         }),
//!         default: PlayerData { coins: 0 },
//!         migrations: Vec::new(),
//!         lock_sessions: true,
//!         config: DocumentConfig::default(),
//!     });
//!
//!     let document = store.get_document("player_1");
//!     let data = document.open().await?;
//!     println!("coins: {}", data.coins);
//!
//!     document.update(|data| PlayerData { coins: data.coins + 100 }).await?;
//!     document.close().await?;
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod events;
pub mod lock;
pub mod migration;
pub mod observability;
pub mod remote;
pub mod store;

pub use document::{
    CloseResult, Document, DocumentConfig, DocumentError, DocumentState, FailReason, OpenResult,
    ReadResult, WriteResult,
};
pub use events::{HookEvent, Signal, SignalConnection};
pub use lock::RetryPolicy;
pub use migration::{CheckFn, Migration};
pub use remote::{LockInfo, MemoryStore, RemoteStore, StoreError, StoredRecord, UpdateOutcome};
pub use store::{DocumentStore, DocumentStoreProps};

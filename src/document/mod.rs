//! Per-key document state machine
//!
//! A [`Document`] is the client-side lifecycle manager for one record in
//! a remote key-value store: open with migration and optional session
//! locking, cached in-memory edits, background autosave, atomic updates,
//! and hook/signal dispatch around every operation.
//!
//! # Invariants Enforced
//!
//! - Lifecycle is strictly `Closed → Opening → Open → Closing → Closed`
//! - A failed open retains no partial state
//! - A failed close keeps the lock and leaves the document open
//! - The cache is immutable once set; edits are copy-on-write
//! - Operations never silently lose data

mod config;
mod errors;
mod lifecycle;
mod state;

pub use config::DocumentConfig;
pub use lifecycle::Document;
pub use errors::{CloseResult, DocumentError, FailReason, OpenResult, ReadResult, WriteResult};
pub use state::DocumentState;

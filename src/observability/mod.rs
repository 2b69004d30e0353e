//! Observability for docstore
//!
//! Structured logging for document lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on document operations
//! 3. One log line = one event
//! 4. Deterministic field ordering

mod logger;

pub use logger::{Logger, Severity};

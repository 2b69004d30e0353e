//! Remote store errors

use thiserror::Error;

/// Result type for remote store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Remote store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Transient failure (throttling, network); retryable by the caller
    #[error("transient remote store failure: {0}")]
    Transient(String),

    /// The store rejected the payload (too large, unserializable)
    #[error("remote store rejected the payload: {0}")]
    Rejected(String),
}

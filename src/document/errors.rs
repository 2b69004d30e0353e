//! Document operation errors
//!
//! Environment and data failures are returned as `Err` values (and also
//! broadcast via hooks and signals). Usage errors — calling an operation
//! in the wrong state, or a transform producing invalid data — are
//! programming errors and panic instead.

use std::sync::Arc;

use thiserror::Error;

use crate::migration::MigrationError;
use crate::remote::StoreError;

/// Result of an open
pub type OpenResult<T> = Result<Arc<T>, DocumentError>;

/// Result of an operation that persists the document
pub type WriteResult<T> = Result<Arc<T>, DocumentError>;

/// Result of a close; carries the data saved, if a save was performed
pub type CloseResult<T> = Result<Option<Arc<T>>, DocumentError>;

/// Result of a read
pub type ReadResult<T> = Result<Arc<T>, DocumentError>;

/// Failure classes surfaced by document operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// Transient remote store failure; retryable by the caller
    RemoteApiFail,
    /// Another session holds the lock; resolve via steal + reopen
    SessionLocked,
    /// A migration step failed; fix the code or the data
    MigrationFailed,
    /// The record was written by newer, incompatible code
    BackwardsIncompatible,
    /// Data failed the check function after migration
    InvalidDataNotHandled,
    /// The key holds no data and was never opened by this library
    SchemaError,
}

impl FailReason {
    /// Stable string form, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            FailReason::RemoteApiFail => "REMOTE_API_FAIL",
            FailReason::SessionLocked => "SESSION_LOCKED",
            FailReason::MigrationFailed => "MIGRATION_FAILED",
            FailReason::BackwardsIncompatible => "BACKWARDS_INCOMPATIBLE",
            FailReason::InvalidDataNotHandled => "INVALID_DATA_NOT_HANDLED",
            FailReason::SchemaError => "SCHEMA_ERROR",
        }
    }
}

/// Document operation errors
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    /// A remote store call failed
    #[error("remote store call failed: {0}")]
    Remote(#[from] StoreError),

    /// The document is locked by another session
    #[error("document is locked by another session")]
    SessionLocked,

    /// Migration or compatibility failure
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// No data exists for this key and it was never opened
    #[error("no data exists for this key and the document has never been opened")]
    SchemaError,
}

impl DocumentError {
    /// Classify this error for retry and reporting decisions
    pub fn reason(&self) -> FailReason {
        match self {
            DocumentError::Remote(_) => FailReason::RemoteApiFail,
            DocumentError::SessionLocked => FailReason::SessionLocked,
            DocumentError::Migration(MigrationError::StepFailed { .. }) => {
                FailReason::MigrationFailed
            }
            DocumentError::Migration(MigrationError::BackwardsIncompatible { .. }) => {
                FailReason::BackwardsIncompatible
            }
            DocumentError::Migration(MigrationError::CheckFailed(_)) => {
                FailReason::InvalidDataNotHandled
            }
            DocumentError::SchemaError => FailReason::SchemaError,
        }
    }
}

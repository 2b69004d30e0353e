//! Persisted record shapes
//!
//! One [`StoredRecord`] per key. The payload is schema-free JSON; the
//! version fields drive the migration runner and the optional
//! [`LockInfo`] marks the current exclusive editor.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Session lock embedded in a stored record
///
/// Written only by the session that holds the lock; read by any session
/// attempting to open. There is no authoritative distributed clock, so
/// `acquired_at` is informational: staleness is decided by an explicit
/// steal, never by elapsed time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Opaque token identifying the holding session
    pub owner: Uuid,

    /// Unix timestamp (seconds) at acquisition
    pub acquired_at: i64,
}

impl LockInfo {
    /// Create a lock owned by `owner`, acquired now
    pub fn new(owner: Uuid) -> Self {
        Self {
            owner,
            acquired_at: Utc::now().timestamp(),
        }
    }
}

/// The value persisted in the remote store for one key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Schema-free document payload
    pub data: Value,

    /// Version the payload was last written at; monotonically
    /// non-decreasing across writes to the same key
    pub migration_version: u32,

    /// Lowest code version that may safely load `data`, computed by the
    /// writer from the `backwards_compatible` flags of its migration chain
    pub min_compatible_version: u32,

    /// Present only while some session holds the document open with
    /// session locking enabled
    pub session_lock: Option<LockInfo>,
}

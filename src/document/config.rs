//! Document configuration

use std::time::Duration;

use crate::lock::RetryPolicy;

/// Tunables shared by every document of one store
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Interval between background autosaves of open, session-locked
    /// documents
    pub autosave_interval: Duration,

    /// Backoff policy for lock-contended open attempts
    pub retry: RetryPolicy,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            autosave_interval: Duration::from_secs(300),
            retry: RetryPolicy::default(),
        }
    }
}

//! Session lock protocol
//!
//! A session lock is a token embedded in the stored record marking one
//! session as the exclusive current editor. This module owns the
//! acquisition decision and the retry policy used while a lock is
//! contended; the atomic write itself happens inside the remote store's
//! read-modify-write primitive.
//!
//! There is no automatic expiry: a lock is considered stale only when the
//! caller explicitly steals it.

use std::time::Duration;

use rand::Rng;
use uuid::Uuid;

use crate::remote::LockInfo;

/// Generate a fresh opaque session token
pub fn new_token() -> Uuid {
    Uuid::new_v4()
}

/// Whether an open attempt may take the lock
///
/// Acquisition succeeds when no lock is present or the caller has marked
/// the existing lock as stolen.
pub fn can_acquire(existing: Option<&LockInfo>, steal: bool) -> bool {
    steal || existing.is_none()
}

/// Whether `token` currently holds the lock
pub fn is_held_by(existing: Option<&LockInfo>, token: Uuid) -> bool {
    existing.map_or(false, |lock| lock.owner == token)
}

/// Backoff policy for lock-contended open attempts
///
/// Defaults give 5 attempts with delays of 1s, 2s, 4s and 8s plus up to
/// 250ms of jitter each: roughly a 16 second worst-case wait before the
/// caller is told the document is session-locked.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,

    /// Delay before the first retry; doubles each retry after that
    pub base_delay: Duration,

    /// Upper bound on the random jitter added to each delay
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            base_delay: Duration::from_secs(1),
            max_jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Policy with no waiting between attempts (tests)
    pub fn immediate() -> Self {
        Self {
            attempts: 5,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Delay to sleep after the given failed attempt (0-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = self.base_delay * 2u32.saturating_pow(attempt);
        exp + self.jitter()
    }

    fn jitter(&self) -> Duration {
        let bound = self.max_jitter.as_millis() as u64;
        if bound == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..bound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_when_unlocked() {
        assert!(can_acquire(None, false));
    }

    #[test]
    fn test_held_lock_blocks_acquisition() {
        let lock = LockInfo::new(new_token());
        assert!(!can_acquire(Some(&lock), false));
    }

    #[test]
    fn test_steal_overrides_held_lock() {
        let lock = LockInfo::new(new_token());
        assert!(can_acquire(Some(&lock), true));
    }

    #[test]
    fn test_is_held_by_matches_owner_only() {
        let token = new_token();
        let lock = LockInfo::new(token);
        assert!(is_held_by(Some(&lock), token));
        assert!(!is_held_by(Some(&lock), new_token()));
        assert!(!is_held_by(None, token));
    }

    #[test]
    fn test_default_policy_budget_is_bounded() {
        let policy = RetryPolicy::default();
        let total: Duration = (0..policy.attempts - 1).map(|n| policy.delay(n)).sum();

        // 1 + 2 + 4 + 8 seconds plus at most a second of jitter
        assert!(total >= Duration::from_secs(15));
        assert!(total < Duration::from_secs(17));
    }

    #[test]
    fn test_immediate_policy_never_sleeps() {
        let policy = RetryPolicy::immediate();
        assert_eq!(policy.delay(0), Duration::ZERO);
        assert_eq!(policy.delay(4), Duration::ZERO);
    }
}

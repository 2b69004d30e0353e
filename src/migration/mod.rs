//! Migration runner
//!
//! Applies an ordered chain of version-upgrade functions to raw stored
//! data and validates backwards-compatibility constraints.
//!
//! Data format versions start at 0; the first migration upgrades 0 to 1.
//! Data that exists under a key before this library ever opened it is
//! considered version 0. The current version is the length of the chain.
//!
//! # Invariants
//!
//! - Migrations are immutable once published
//! - A record at version `v < current` passes through migrations
//!   `v, v+1, .., current-1` in order, each exactly once
//! - A record at version `v > current` loads only if the writer marked
//!   every migration in `[current, v)` backwards-compatible, which the
//!   writer encodes as `min_compatible_version`
//! - A failed step aborts the run; the runner never writes

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::remote::StoredRecord;

/// Result type for migration runs
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Migration errors
#[derive(Debug, Clone, Error)]
pub enum MigrationError {
    /// A migration step returned an error; nothing was written
    #[error("migration step {index} failed: {message}")]
    StepFailed { index: u32, message: String },

    /// The record was written by newer code and cannot be loaded here
    #[error(
        "record at version {stored} requires code version {required} or later, \
         this process is at {current}"
    )]
    BackwardsIncompatible {
        stored: u32,
        required: u32,
        current: u32,
    },

    /// Migrated data failed the caller-supplied check function
    #[error("migrated data failed the check function: {0}")]
    CheckFailed(String),
}

/// One step upgrading data from version N to N+1
pub type MigrateFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Caller-supplied validator/normalizer run on data after migration
pub type CheckFn<T> = Arc<dyn Fn(Value) -> Result<T, String> + Send + Sync>;

/// A versioned upgrade of the stored data format
#[derive(Clone)]
pub struct Migration {
    /// Whether data written *after* this migration is still loadable by
    /// code that does not know about it
    pub backwards_compatible: bool,

    /// Pure transform from the previous format to the next
    pub migrate: MigrateFn,
}

impl Migration {
    /// Create a migration step
    pub fn new(
        backwards_compatible: bool,
        migrate: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            backwards_compatible,
            migrate: Arc::new(migrate),
        }
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("backwards_compatible", &self.backwards_compatible)
            .finish_non_exhaustive()
    }
}

/// Output of a successful migration run
#[derive(Debug)]
pub struct Migrated<T> {
    /// Checked, typed data
    pub data: T,

    /// Raw value to persist (the migrated payload)
    pub value: Value,

    /// Version to write back; never lower than the stored version
    pub migration_version: u32,

    /// Compatibility floor to write back
    pub min_compatible_version: u32,
}

/// Current schema version for a chain
pub fn current_version(migrations: &[Migration]) -> u32 {
    migrations.len() as u32
}

/// Lowest code version that can load data written at the chain's head
///
/// Walks back from the end of the chain while steps are marked
/// backwards-compatible.
pub fn min_compatible_version(migrations: &[Migration]) -> u32 {
    let mut min = migrations.len() as u32;
    for migration in migrations.iter().rev() {
        if !migration.backwards_compatible {
            break;
        }
        min -= 1;
    }
    min
}

/// Run the chain over a raw record and validate the result
///
/// With no record, yields `default` at the current version without running
/// any migrations. The returned versions are what a subsequent write must
/// persist: a compatible newer record keeps its own (higher) version.
pub fn run<T>(
    raw: Option<&StoredRecord>,
    migrations: &[Migration],
    check: &CheckFn<T>,
    default: &Value,
) -> MigrationResult<Migrated<T>> {
    let current = current_version(migrations);

    let (mut value, stored_version, stored_floor) = match raw {
        None => (default.clone(), current, min_compatible_version(migrations)),
        Some(record) => (
            record.data.clone(),
            record.migration_version,
            record.min_compatible_version,
        ),
    };

    if stored_version > current {
        if current < stored_floor {
            return Err(MigrationError::BackwardsIncompatible {
                stored: stored_version,
                required: stored_floor,
                current,
            });
        }
    } else {
        for index in stored_version..current {
            let step = &migrations[index as usize];
            value = (step.migrate)(value).map_err(|message| MigrationError::StepFailed {
                index,
                message,
            })?;
        }
    }

    let migration_version = stored_version.max(current);
    let min_compatible = if stored_version > current {
        // Newer data passes through untouched; keep the writer's floor
        stored_floor
    } else {
        min_compatible_version(migrations)
    };

    let data = check(value.clone()).map_err(MigrationError::CheckFailed)?;

    Ok(Migrated {
        data,
        value,
        migration_version,
        min_compatible_version: min_compatible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity_check() -> CheckFn<Value> {
        Arc::new(|value| Ok(value))
    }

    fn bump(field: &'static str) -> Migration {
        Migration::new(true, move |mut value| {
            value[field] = json!(true);
            Ok(value)
        })
    }

    fn record(version: u32, floor: u32, data: Value) -> StoredRecord {
        StoredRecord {
            data,
            migration_version: version,
            min_compatible_version: floor,
            session_lock: None,
        }
    }

    #[test]
    fn test_absent_record_yields_default_at_current_version() {
        let chain = vec![bump("a"), bump("b")];
        let out = run(None, &chain, &identity_check(), &json!({"fresh": true})).unwrap();

        assert_eq!(out.value, json!({"fresh": true}));
        assert_eq!(out.migration_version, 2);
    }

    #[test]
    fn test_forward_migrations_run_in_order_exactly_once() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let step = |n: u32| {
            let order = Arc::clone(&order);
            Migration::new(true, move |value| {
                order.lock().unwrap().push(n);
                Ok(value)
            })
        };
        let chain = vec![step(0), step(1), step(2)];

        let raw = record(1, 0, json!({}));
        let out = run(Some(&raw), &chain, &identity_check(), &json!({})).unwrap();

        assert_eq!(out.migration_version, 3);
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_step_error_aborts_with_index() {
        let chain = vec![
            bump("a"),
            Migration::new(true, |_| Err("boom".to_string())),
        ];
        let raw = record(0, 0, json!({}));
        let err = run(Some(&raw), &chain, &identity_check(), &json!({})).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::StepFailed { index: 1, .. }
        ));
    }

    #[test]
    fn test_newer_compatible_record_loads_and_keeps_version() {
        // Local chain knows 2 versions; record written at 3 with floor 2
        let chain = vec![bump("a"), bump("b")];
        let raw = record(3, 2, json!({"future": 1}));
        let out = run(Some(&raw), &chain, &identity_check(), &json!({})).unwrap();

        assert_eq!(out.migration_version, 3);
        assert_eq!(out.min_compatible_version, 2);
        assert_eq!(out.value, json!({"future": 1}));
    }

    #[test]
    fn test_newer_incompatible_record_is_rejected() {
        let chain = vec![bump("a"), bump("b")];
        let raw = record(3, 3, json!({}));
        let err = run(Some(&raw), &chain, &identity_check(), &json!({})).unwrap_err();

        assert!(matches!(
            err,
            MigrationError::BackwardsIncompatible {
                stored: 3,
                required: 3,
                current: 2,
            }
        ));
    }

    #[test]
    fn test_check_failure_is_distinct_from_migration_failure() {
        let check: CheckFn<Value> = Arc::new(|_| Err("wrong shape".to_string()));
        let chain = vec![bump("a")];
        let raw = record(0, 0, json!({}));
        let err = run(Some(&raw), &chain, &check, &json!({})).unwrap_err();

        assert!(matches!(err, MigrationError::CheckFailed(_)));
    }

    #[test]
    fn test_min_compatible_version_walks_back_from_head() {
        let chain = vec![
            Migration::new(false, |v| Ok(v)),
            Migration::new(true, |v| Ok(v)),
            Migration::new(true, |v| Ok(v)),
        ];
        assert_eq!(min_compatible_version(&chain), 1);

        let all_compatible = vec![
            Migration::new(true, |v| Ok(v)),
            Migration::new(true, |v| Ok(v)),
        ];
        assert_eq!(min_compatible_version(&all_compatible), 0);

        let none: Vec<Migration> = Vec::new();
        assert_eq!(min_compatible_version(&none), 0);
    }
}

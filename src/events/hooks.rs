//! Ordered hook chains
//!
//! Hooks are the synchronous half of the dispatcher: plain callbacks
//! invoked in registration order on the task driving the operation.
//! Once a firing begins the listener list for that firing is fixed:
//! registrations and removals during dispatch affect later firings only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Lifecycle events hooks can attach to
///
/// `Update` fires for any operation that persists the document,
/// including saves and autosaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    Open,
    Close,
    Update,
    Read,
}

/// Hook phases relative to the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Phase {
    Before,
    After,
    Fail,
}

type Callback = Arc<dyn Fn() + Send + Sync>;

struct Hook {
    once: bool,
    callback: Callback,
}

/// Per-document registry of hook chains
#[derive(Default)]
pub struct HookRegistry {
    chains: Mutex<HashMap<(HookEvent, Phase), Vec<Hook>>>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a hook running before the event
    pub fn hook_before(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.attach(event, Phase::Before, false, callback);
    }

    /// Attach a hook running after the event succeeds
    pub fn hook_after(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.attach(event, Phase::After, false, callback);
    }

    /// Attach a hook running when the event fails
    pub fn hook_fail(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.attach(event, Phase::Fail, false, callback);
    }

    /// Attach a single-use before hook
    pub fn once_before(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.attach(event, Phase::Before, true, callback);
    }

    /// Attach a single-use after hook
    pub fn once_after(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.attach(event, Phase::After, true, callback);
    }

    /// Attach a single-use fail hook
    pub fn once_fail(&self, event: HookEvent, callback: impl Fn() + Send + Sync + 'static) {
        self.attach(event, Phase::Fail, true, callback);
    }

    /// Run the before chain for an event
    pub fn fire_before(&self, event: HookEvent) {
        self.fire(event, Phase::Before);
    }

    /// Run the after chain for an event
    pub fn fire_after(&self, event: HookEvent) {
        self.fire(event, Phase::After);
    }

    /// Run the fail chain for an event
    pub fn fire_fail(&self, event: HookEvent) {
        self.fire(event, Phase::Fail);
    }

    fn attach(
        &self,
        event: HookEvent,
        phase: Phase,
        once: bool,
        callback: impl Fn() + Send + Sync + 'static,
    ) {
        let mut chains = self.chains.lock().expect("hook registry poisoned");
        chains.entry((event, phase)).or_default().push(Hook {
            once,
            callback: Arc::new(callback),
        });
    }

    fn fire(&self, event: HookEvent, phase: Phase) {
        // Snapshot under the lock, call outside it: a hook body may
        // register or remove hooks without deadlocking
        let snapshot: Vec<Callback> = {
            let mut chains = self.chains.lock().expect("hook registry poisoned");
            match chains.get_mut(&(event, phase)) {
                None => Vec::new(),
                Some(chain) => {
                    let snapshot = chain.iter().map(|h| Arc::clone(&h.callback)).collect();
                    chain.retain(|h| !h.once);
                    snapshot
                }
            }
        };

        for callback in snapshot {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Callback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_for_make = Arc::clone(&log);
        let make = move |name: &'static str| -> Callback {
            let log = Arc::clone(&log_for_make);
            Arc::new(move || log.lock().unwrap().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_before_hooks_fire_in_registration_order() {
        let registry = HookRegistry::new();
        let (log, make) = recorder();

        for name in ["a", "b", "c"] {
            let hook = make(name);
            registry.hook_before(HookEvent::Update, move || hook());
        }

        registry.fire_before(HookEvent::Update);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_phases_are_independent() {
        let registry = HookRegistry::new();
        let (log, make) = recorder();

        let after = make("after");
        let fail = make("fail");
        registry.hook_after(HookEvent::Open, move || after());
        registry.hook_fail(HookEvent::Open, move || fail());

        registry.fire_after(HookEvent::Open);
        assert_eq!(*log.lock().unwrap(), vec!["after"]);

        registry.fire_fail(HookEvent::Open);
        assert_eq!(*log.lock().unwrap(), vec!["after", "fail"]);
    }

    #[test]
    fn test_once_hooks_deregister_after_one_firing() {
        let registry = HookRegistry::new();
        let (log, make) = recorder();

        let hook = make("once");
        registry.once_before(HookEvent::Close, move || hook());

        registry.fire_before(HookEvent::Close);
        registry.fire_before(HookEvent::Close);
        assert_eq!(*log.lock().unwrap(), vec!["once"]);
    }

    #[test]
    fn test_registration_during_firing_affects_later_firings_only() {
        let registry = Arc::new(HookRegistry::new());
        let (log, make) = recorder();

        let registry_inner = Arc::clone(&registry);
        let late = make("late");
        let first = make("first");
        registry.hook_before(HookEvent::Read, move || {
            first();
            let late = late.clone();
            registry_inner.hook_before(HookEvent::Read, move || late());
        });

        registry.fire_before(HookEvent::Read);
        assert_eq!(*log.lock().unwrap(), vec!["first"]);

        registry.fire_before(HookEvent::Read);
        assert_eq!(*log.lock().unwrap(), vec!["first", "first", "late"]);
    }
}

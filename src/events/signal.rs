//! Fire-and-continue signals
//!
//! Each lifecycle event carries one [`Signal`]. Listeners are spawned as
//! independent tasks when the signal fires, so a listener may suspend
//! without blocking the emitting operation or its sibling listeners.
//! Listeners start in reverse registration order.

use std::sync::{Arc, Mutex, Weak};

type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

struct Listener<A> {
    id: u64,
    once: bool,
    callback: Callback<A>,
}

struct Inner<A> {
    next_id: u64,
    listeners: Vec<Listener<A>>,
}

/// A multi-listener event channel for one lifecycle event
pub struct Signal<A> {
    inner: Arc<Mutex<Inner<A>>>,
}

impl<A: Clone + Send + 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone + Send + 'static> Signal<A> {
    /// Create a signal with no listeners
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Attach a listener; fires on every emission until disconnected
    pub fn connect(&self, callback: impl Fn(A) + Send + Sync + 'static) -> SignalConnection {
        self.attach(false, callback)
    }

    /// Attach a listener that auto-disconnects after one emission
    pub fn once(&self, callback: impl Fn(A) + Send + Sync + 'static) -> SignalConnection {
        self.attach(true, callback)
    }

    /// Number of currently attached listeners
    pub fn listener_count(&self) -> usize {
        self.inner.lock().expect("signal poisoned").listeners.len()
    }

    /// Emit `payload` to every listener
    ///
    /// Each listener runs in its own spawned task; the emitting call does
    /// not wait for any of them. Must be called from within a tokio
    /// runtime.
    pub fn fire(&self, payload: A) {
        let snapshot: Vec<Callback<A>> = {
            let mut inner = self.inner.lock().expect("signal poisoned");
            let snapshot = inner
                .listeners
                .iter()
                .rev()
                .map(|l| Arc::clone(&l.callback))
                .collect();
            inner.listeners.retain(|l| !l.once);
            snapshot
        };

        for callback in snapshot {
            let payload = payload.clone();
            tokio::spawn(async move {
                callback(payload);
            });
        }
    }

    fn attach(&self, once: bool, callback: impl Fn(A) + Send + Sync + 'static) -> SignalConnection {
        let id = {
            let mut inner = self.inner.lock().expect("signal poisoned");
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push(Listener {
                id,
                once,
                callback: Arc::new(callback),
            });
            id
        };

        let weak: Weak<Mutex<Inner<A>>> = Arc::downgrade(&self.inner);
        SignalConnection {
            disconnect: Mutex::new(Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .lock()
                        .expect("signal poisoned")
                        .listeners
                        .retain(|l| l.id != id);
                }
            }))),
        }
    }
}

/// Handle for detaching a signal listener
///
/// Dropping the connection does NOT disconnect; call
/// [`SignalConnection::disconnect`] explicitly.
pub struct SignalConnection {
    disconnect: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl SignalConnection {
    /// Remove the listener; further emissions will not reach it
    pub fn disconnect(&self) {
        if let Some(disconnect) = self
            .disconnect
            .lock()
            .expect("signal connection poisoned")
            .take()
        {
            disconnect();
        }
    }
}

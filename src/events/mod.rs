//! Lifecycle event dispatch
//!
//! Two parallel mechanisms over the same lifecycle events:
//!
//! - **Hooks**: ordered before/after/fail listener chains, invoked
//!   sequentially on the calling task. Before-hooks run prior to the
//!   remote call, after-hooks only on success, fail-hooks only when an
//!   operation returns an error result.
//! - **Signals**: per-event listener lists whose callbacks are spawned
//!   as independent tasks in reverse registration order; they fire on
//!   success and failure alike, carrying the full result.

mod hooks;
mod signal;

pub use hooks::{HookEvent, HookRegistry};
pub use signal::{Signal, SignalConnection};

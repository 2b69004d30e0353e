//! Document lifecycle states
//!
//! `Closed → Opening → Open → Closing → Closed`, strictly linear. The
//! state is readable without taking the document's operation mutex so
//! `is_open`/`is_closing` stay non-blocking while an operation is in
//! flight; transitions happen only under that mutex.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Closed,
    Opening,
    Open,
    Closing,
}

impl DocumentState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => DocumentState::Closed,
            1 => DocumentState::Opening,
            2 => DocumentState::Open,
            3 => DocumentState::Closing,
            _ => unreachable!("invalid document state tag"),
        }
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentState::Closed => "Closed",
            DocumentState::Opening => "Opening",
            DocumentState::Open => "Open",
            DocumentState::Closing => "Closing",
        };
        write!(f, "{}", name)
    }
}

/// Atomically readable state cell
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    /// New cell starting at `Closed`
    pub fn new() -> Self {
        Self(AtomicU8::new(DocumentState::Closed as u8))
    }

    /// Current state
    pub fn get(&self) -> DocumentState {
        DocumentState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Transition to `state`; caller must hold the document mutex
    pub fn set(&self, state: DocumentState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_starts_closed() {
        assert_eq!(StateCell::new().get(), DocumentState::Closed);
    }

    #[test]
    fn test_cell_round_trips_every_state() {
        let cell = StateCell::new();
        for state in [
            DocumentState::Opening,
            DocumentState::Open,
            DocumentState::Closing,
            DocumentState::Closed,
        ] {
            cell.set(state);
            assert_eq!(cell.get(), state);
        }
    }
}

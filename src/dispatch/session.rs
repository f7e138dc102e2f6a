//! Per-connection session state

use std::collections::VecDeque;

/// Mutable state scoped to one client connection: the transaction flag,
/// the queue of raw command lines, and the deferred-abort flag set when an
/// unknown command is queued. Database selection is not per-session; it
/// lives on the shared database under the single-writer contract.
#[derive(Debug, Default)]
pub struct Session {
    pub in_transaction: bool,
    pub queued: VecDeque<String>,
    pub fallback: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a transaction with an empty queue.
    pub fn begin(&mut self) {
        self.in_transaction = true;
        self.fallback = false;
        self.queued.clear();
    }

    /// Returns to normal mode, dropping any queued commands.
    pub fn reset(&mut self) {
        self.in_transaction = false;
        self.fallback = false;
        self.queued.clear();
    }
}

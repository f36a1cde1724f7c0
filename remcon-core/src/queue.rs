//! The outbound send queue.
//!
//! An ordered FIFO of pending message strings. A message stays at the front
//! until a send attempt reports it fully handed to the OS, so a would-block
//! frame retries the same message next poll. Enqueueing never blocks and
//! never fails; callers that need backpressure watch `depth()` and throttle
//! themselves.

use std::collections::VecDeque;

/// FIFO of messages awaiting transmission.
#[derive(Debug, Default)]
pub struct SendQueue {
    pending: VecDeque<String>,
}

impl SendQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the tail.
    pub fn push(&mut self, message: String) {
        self.pending.push_back(message);
    }

    /// The message that the next send attempt should carry.
    pub fn front(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    /// Remove the front message after it has been fully transmitted.
    pub fn pop(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// Number of messages waiting.
    pub fn depth(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything still queued (shutdown path).
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

// ── Tests ────────────────────────────────────────────────────────

//! Client connection lifecycle.
//!
//! ```text
//!  Disconnected ──(connect readiness succeeded)──► Connected
//!       ▲                                              │
//!       └───────(Disconnect-class error)───────────────┘
//!
//!  Disabled: inert, never transitions elsewhere.
//! ```
//!
//! The state is owned by the client role and mutated only by the frame
//! pump. Transitions report whether they performed an edge so the pump can
//! emit its connect/disconnect notice exactly once per edge, not every
//! frame. There is no terminal state while the process runs.

use std::fmt;

/// The current state of the client-side connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No live connection; a connect attempt is (re)issued each poll.
    #[default]
    Disconnected,

    /// The connection is established and exchanging messages.
    Connected,

    /// The transport is deliberately inert.
    Disabled,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
            Self::Disabled => write!(f, "Disabled"),
        }
    }
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected)
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Transition to `Connected`.
    ///
    /// Returns `true` when this call performed the edge. A `Disabled`
    /// transport never leaves `Disabled`.
    pub fn set_connected(&mut self) -> bool {
        match self {
            Self::Disconnected => {
                *self = Self::Connected;
                true
            }
            _ => false,
        }
    }

    /// Transition to `Disconnected`.
    ///
    /// Returns `true` when this call performed the edge.
    pub fn set_disconnected(&mut self) -> bool {
        match self {
            Self::Connected => {
                *self = Self::Disconnected;
                true
            }
            _ => false,
        }
    }

    /// Make the transport inert. There is no way back.
    pub fn disable(&mut self) {
        *self = Self::Disabled;
    }
}

// ── Tests ────────────────────────────────────────────────────────

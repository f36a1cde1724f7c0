//! Error types for the remcon transport.
//!
//! Two layers live here. `NetError` covers fatal setup failures: a server
//! that cannot bind or a client that cannot allocate a socket cannot provide
//! the feature at all, so `start_up` returns these as hard errors. Socket
//! failures *inside* a poll are a different species — they never propagate
//! out of `begin_frame` and are instead classified into `ErrorClass` and
//! handled in place.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

// ── NetError ─────────────────────────────────────────────────────

/// The canonical error type for transport setup.
#[derive(Debug, Error)]
pub enum NetError {
    /// The configured host address string could not be parsed.
    #[error("invalid host address `{addr}`: {reason}")]
    InvalidAddress {
        addr: String,
        reason: &'static str,
    },

    /// The configured role string did not name a known role.
    #[error("invalid role `{0}`: expected Client, Server or None")]
    InvalidRole(String),

    /// A listening socket could not be bound.
    #[error("failed to bind listen socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: io::Error,
    },

    /// Socket creation or readiness-selector setup failed.
    #[error("socket setup failed: {0}")]
    Setup(#[from] io::Error),
}

// ── Socket failure classification ────────────────────────────────

/// How a socket failure observed during a poll is reacted to.
///
/// Applied uniformly to send, receive, and accept failures:
///
/// | Class        | Policy                                               |
/// |--------------|------------------------------------------------------|
/// | `Retryable`  | No state change; retry on the next poll.             |
/// | `Disconnect` | Tear down the peer connection.                       |
/// | `Other`      | Log the numeric code; keep the connection alive.     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient: would-block or interrupted. Nothing is wrong.
    Retryable,
    /// The peer is gone: reset, aborted, or the pipe broke.
    Disconnect,
    /// Anything else. Surfaced in the log, survived on a best-effort basis.
    Other,
}

/// Classify an I/O error reported by a non-blocking socket operation.
///
/// An orderly close (a zero-length read) carries no `io::Error` and is
/// mapped to `Disconnect` at the read call site instead.
pub fn classify(err: &io::Error) -> ErrorClass {
    use io::ErrorKind::*;
    match err.kind() {
        WouldBlock | Interrupted => ErrorClass::Retryable,
        ConnectionReset | ConnectionAborted | BrokenPipe | NotConnected | UnexpectedEof => {
            ErrorClass::Disconnect
        }
        _ => ErrorClass::Other,
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn err(kind: io::ErrorKind) -> io::Error {
        io::Error::new(kind, "test")
    }

    #[test]
    fn would_block_is_retryable() {
        assert_eq!(classify(&err(io::ErrorKind::WouldBlock)), ErrorClass::Retryable);
        assert_eq!(classify(&err(io::ErrorKind::Interrupted)), ErrorClass::Retryable);
    }

    #[test]
    fn peer_loss_is_disconnect() {
        for kind in [
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::BrokenPipe,
            io::ErrorKind::NotConnected,
            io::ErrorKind::UnexpectedEof,
        ] {
            assert_eq!(classify(&err(kind)), ErrorClass::Disconnect);
        }
    }

    #[test]
    fn unknown_codes_are_other() {
        assert_eq!(classify(&err(io::ErrorKind::PermissionDenied)), ErrorClass::Other);
        assert_eq!(classify(&err(io::ErrorKind::OutOfMemory)), ErrorClass::Other);
    }

    #[test]
    fn error_display_messages() {
        let e = NetError::InvalidAddress {
            addr: "localhost".into(),
            reason: "missing port segment",
        };
        assert!(e.to_string().contains("localhost"));
        assert!(e.to_string().contains("missing port"));

        let e = NetError::InvalidRole("observer".into());
        assert!(e.to_string().contains("observer"));
    }

    #[test]
    fn from_io() {
        let io_err = io::Error::new(io::ErrorKind::AddrInUse, "in use");
        let e: NetError = io_err.into();
        assert!(matches!(e, NetError::Setup(_)));
    }
}

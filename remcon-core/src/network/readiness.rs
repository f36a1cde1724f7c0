//! Zero-timeout socket readiness polling.
//!
//! One shared primitive answers "is this socket ready for {read, write, or
//! did it error}" without ever blocking, so the connect state machine and
//! the exchange routine stay decoupled from the OS selector API. The frame
//! pump calls it once per tick with a zero timeout; a socket that is not
//! ready simply reports nothing and is asked again next frame.

use std::io;
use std::time::Duration;

use mio::event::Source;
use mio::{Events, Interest, Poll, Token};

// ── Readiness ────────────────────────────────────────────────────

/// Readiness flags reported for one endpoint by a single zero-timeout poll.
///
/// Mirrors the read / write / exception selector sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    pub readable: bool,
    pub writable: bool,
    pub error: bool,
}

impl Readiness {
    pub fn any(&self) -> bool {
        self.readable || self.writable || self.error
    }
}

/// Progress of a pending non-blocking connect, derived from the write and
/// exception sets of a zero-timeout readiness check.
#[derive(Debug)]
pub enum ConnectProgress {
    /// The handshake has not finished yet; ask again next poll.
    Pending,
    /// Writable with no pending socket error: the connection is up.
    Established,
    /// The exception set armed or the socket holds a pending error. The
    /// endpoint must be discarded and recreated.
    Failed(io::Error),
}

// ── Selector ─────────────────────────────────────────────────────

/// Owns the OS selector and its event buffer.
///
/// At most one source is ever registered at a time (the pending client
/// connect), so a small event buffer is plenty.
#[derive(Debug)]
pub struct Selector {
    poll: Poll,
    events: Events,
}

impl Selector {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            poll: Poll::new()?,
            events: Events::with_capacity(8),
        })
    }

    /// Register `source` for the given interest under `token`.
    pub fn register<S: Source>(
        &mut self,
        source: &mut S,
        token: Token,
        interest: Interest,
    ) -> io::Result<()> {
        self.poll.registry().register(source, token, interest)
    }

    /// Remove a previously registered source.
    pub fn deregister<S: Source>(&mut self, source: &mut S) -> io::Result<()> {
        self.poll.registry().deregister(source)
    }

    /// One zero-timeout poll, aggregating the readiness observed for
    /// `token`. Returns the default (nothing ready) when no event fired.
    pub fn check(&mut self, token: Token) -> io::Result<Readiness> {
        self.poll.poll(&mut self.events, Some(Duration::ZERO))?;

        let mut ready = Readiness::default();
        for event in self.events.iter() {
            if event.token() != token {
                continue;
            }
            ready.readable |= event.is_readable();
            ready.writable |= event.is_writable();
            ready.error |= event.is_error() || event.is_write_closed();
        }
        Ok(ready)
    }
}

// ── Tests ────────────────────────────────────────────────────────

//! Socket endpoints owned by the connection manager.
//!
//! `Endpoint` holds exactly one peer socket, created in non-blocking mode
//! and torn down by dropping it. It is recreated, never repaired: the only
//! way a client recovers from a failure is a fresh socket toward the
//! configured host. `ListenEndpoint` is the server's listening socket,
//! bound once at startup and never recreated.

use std::io::{self, Read, Write};
use std::net::SocketAddr;

use mio::net::{TcpListener, TcpStream};
use mio::{Interest, Token};
use tracing::warn;

use crate::error::NetError;
use crate::network::readiness::{ConnectProgress, Selector};

/// Token under which a pending client connect is registered. The subsystem
/// holds at most one connecting socket, so one token suffices.
pub(crate) const CONNECT_TOKEN: Token = Token(0);

// ── Endpoint ─────────────────────────────────────────────────────

/// One non-blocking peer socket: a client's connecting/connected stream, or
/// a stream the server accepted.
#[derive(Debug)]
pub struct Endpoint {
    stream: TcpStream,
    peer_addr: SocketAddr,
    registered: bool,
}

impl Endpoint {
    /// Begin a non-blocking connect toward `addr` and register the socket
    /// for write/error readiness so the pump can watch the handshake.
    pub fn connect(selector: &mut Selector, addr: SocketAddr) -> Result<Self, NetError> {
        let mut stream = TcpStream::connect(addr)?;
        selector.register(&mut stream, CONNECT_TOKEN, Interest::WRITABLE)?;
        Ok(Self {
            stream,
            peer_addr: addr,
            registered: true,
        })
    }

    /// Wrap a socket returned by `accept`. Already connected, already
    /// non-blocking, and never registered with the selector.
    pub fn accepted(stream: TcpStream, peer_addr: SocketAddr) -> Self {
        Self {
            stream,
            peer_addr,
            registered: false,
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Zero-timeout check of a pending connect against the write and
    /// exception sets.
    ///
    /// Writable with no queued socket error means the connection is up;
    /// an armed exception or a queued error means the attempt failed and
    /// the endpoint must be recreated; anything else is still pending.
    pub fn check_connect(&mut self, selector: &mut Selector) -> ConnectProgress {
        let ready = match selector.check(CONNECT_TOKEN) {
            Ok(ready) => ready,
            Err(err) => {
                self.detach(selector);
                return ConnectProgress::Failed(err);
            }
        };
        if !ready.writable && !ready.error {
            return ConnectProgress::Pending;
        }

        // The selector fired; the socket itself holds the verdict.
        match self.stream.take_error() {
            Ok(Some(err)) | Err(err) => {
                self.detach(selector);
                ConnectProgress::Failed(err)
            }
            Ok(None) => match self.stream.peer_addr() {
                Ok(_) => {
                    // Connected; events are no longer needed on this socket.
                    self.detach(selector);
                    ConnectProgress::Established
                }
                Err(err) if err.kind() == io::ErrorKind::NotConnected => ConnectProgress::Pending,
                Err(err) => {
                    self.detach(selector);
                    ConnectProgress::Failed(err)
                }
            },
        }
    }

    /// One non-blocking read into `buf`. `Ok(0)` is an orderly close.
    pub fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }

    /// One non-blocking attempt to hand the whole frame to the OS.
    pub fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        self.stream.write(frame)
    }

    /// Drop the selector registration, if any. The socket may already be
    /// gone; a deregistration failure is logged and ignored.
    pub fn detach(&mut self, selector: &mut Selector) {
        if self.registered {
            self.registered = false;
            if let Err(err) = selector.deregister(&mut self.stream) {
                warn!(%err, "failed to deregister endpoint");
            }
        }
    }
}

// ── ListenEndpoint ───────────────────────────────────────────────

/// The server's listening socket. Bound and put into non-blocking listen
/// mode at startup; never recreated.
#[derive(Debug)]
pub struct ListenEndpoint {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl ListenEndpoint {
    /// Bind and listen. A bind failure is fatal: a server with no listen
    /// socket cannot provide the feature at all.
    pub fn bind(addr: SocketAddr) -> Result<Self, NetError> {
        let listener = TcpListener::bind(addr).map_err(|source| NetError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// The actual bound address (resolves an ephemeral port request).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Non-blocking accept. `Ok(None)` when no connection is pending this
    /// frame.
    pub fn accept(&self) -> io::Result<Option<Endpoint>> {
        match self.listener.accept() {
            Ok((stream, peer_addr)) => Ok(Some(Endpoint::accepted(stream, peer_addr))),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(err) => Err(err),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

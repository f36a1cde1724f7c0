//! The transport itself: connection manager and frame pump.
//!
//! `NetSystem` owns every socket handle, the send queue, and the receive
//! assembly buffer. The host application creates one per transport (no
//! process-wide singleton), calls `begin_frame` once per simulation tick,
//! and receives completed inbound messages through its `MessageHandler`.
//! `begin_frame` never blocks and never fails; every socket outcome is
//! classified and handled inside the poll.

use std::net::SocketAddr;

use bytes::BytesMut;
use tracing::{debug, info, warn};

use crate::config::{NetConfig, Role};
use crate::error::{ErrorClass, NetError, classify};
use crate::framer::MessageFramer;
use crate::network::endpoint::{Endpoint, ListenEndpoint};
use crate::network::readiness::{ConnectProgress, Selector};
use crate::queue::SendQueue;
use crate::state::ConnectionState;

// ── MessageHandler ───────────────────────────────────────────────

/// External collaborator invoked once per completed inbound message, in
/// arrival order, with the exact message text.
pub trait MessageHandler {
    fn on_message(&mut self, message: &str);
}

/// Any `FnMut(&str)` closure works as a handler.
impl<F: FnMut(&str)> MessageHandler for F {
    fn on_message(&mut self, message: &str) {
        self(message)
    }
}

// ── NetSystem ────────────────────────────────────────────────────

/// Outcome of one message-exchange pass over an established connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exchange {
    Continue,
    Disconnected,
}

/// The frame-polled console transport.
#[derive(Debug)]
pub struct NetSystem {
    role: Role,
    state: ConnectionState,
    host_addr: Option<SocketAddr>,
    selector: Selector,
    listener: Option<ListenEndpoint>,
    peer: Option<Endpoint>,
    send_queue: SendQueue,
    framer: MessageFramer,
    recv_buf: Vec<u8>,
    send_scratch: BytesMut,
}

impl NetSystem {
    // ── Startup / shutdown ───────────────────────────────────────

    /// Perform role-specific startup.
    ///
    /// Fatal errors: malformed role or host address, listen-socket bind
    /// failure, socket or selector creation failure. A `none` role yields
    /// a deliberately inert transport whose `begin_frame` is a no-op.
    pub fn start_up(config: &NetConfig) -> Result<Self, NetError> {
        let role = config.role()?;
        let mut selector = Selector::new()?;
        let mut state = ConnectionState::default();
        let mut host_addr = None;
        let mut listener = None;
        let mut peer = None;

        match role {
            Role::None => {
                state.disable();
                debug!("console transport disabled");
            }
            Role::Server => {
                let addr = config.host_addr()?;
                let listen = ListenEndpoint::bind(addr)?;
                info!(addr = %listen.local_addr(), "console server listening");
                host_addr = Some(addr);
                listener = Some(listen);
            }
            Role::Client => {
                let addr = config.host_addr()?;
                peer = Some(Endpoint::connect(&mut selector, addr)?);
                info!(%addr, "console client connecting");
                host_addr = Some(addr);
            }
        }

        Ok(Self {
            role,
            state,
            host_addr,
            selector,
            listener,
            peer,
            send_queue: SendQueue::new(),
            framer: MessageFramer::new(),
            recv_buf: vec![0; config.recv_buffer_capacity.max(1)],
            send_scratch: BytesMut::with_capacity(config.send_buffer_capacity),
        })
    }

    /// Drain one final poll, then close every owned handle and release the
    /// buffers. Safe to call before any connection was ever established,
    /// and safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.is_enabled() {
            // Best-effort flush of whatever one last poll can move.
            self.begin_frame(&mut |_: &str| {});
            info!("console transport shut down");
        }
        if let Some(mut peer) = self.peer.take() {
            peer.detach(&mut self.selector);
        }
        self.listener = None;
        self.framer.clear();
        self.send_queue.clear();
        self.recv_buf = Vec::new();
        self.state.disable();
    }

    // ── Frame pump ───────────────────────────────────────────────

    /// The single per-tick entry point. Drives accept/connect/send/receive
    /// for whichever role is active. Never blocks; always returns.
    pub fn begin_frame(&mut self, handler: &mut dyn MessageHandler) {
        match self.role {
            Role::None => {}
            Role::Server => self.pump_server(handler),
            Role::Client => self.pump_client(handler),
        }
    }

    fn pump_server(&mut self, handler: &mut dyn MessageHandler) {
        if self.peer.is_none() {
            let Some(listener) = self.listener.as_ref() else {
                return;
            };
            match listener.accept() {
                Ok(Some(endpoint)) => {
                    info!(peer = %endpoint.peer_addr(), "console client connected");
                    self.peer = Some(endpoint);
                }
                // No pending connection this frame.
                Ok(None) => return,
                Err(err) => {
                    if classify(&err) != ErrorClass::Retryable {
                        warn!(code = err.raw_os_error().unwrap_or(-1), %err, "accept failed");
                    }
                    return;
                }
            }
        }

        if self.exchange(handler) == Exchange::Disconnected {
            self.drop_peer();
            info!("console client disconnected; resuming accept");
        }
    }

    fn pump_client(&mut self, handler: &mut dyn MessageHandler) {
        if self.state.is_disabled() {
            return;
        }
        if self.peer.is_none() {
            self.recreate_endpoint();
        }

        if self.state.is_disconnected() {
            let Some(peer) = self.peer.as_mut() else {
                return;
            };
            let peer_addr = peer.peer_addr();
            match peer.check_connect(&mut self.selector) {
                ConnectProgress::Pending => return,
                ConnectProgress::Failed(err) => {
                    // Re-attempt with a fresh socket, without a state change.
                    debug!(%err, "connect attempt failed; retrying");
                    self.drop_peer();
                    self.recreate_endpoint();
                    return;
                }
                ConnectProgress::Established => {
                    if self.state.set_connected() {
                        info!(addr = %peer_addr, "connected to console server");
                    }
                }
            }
        }

        // Exchange in the same frame the connect completed.
        if self.state.is_connected() && self.exchange(handler) == Exchange::Disconnected {
            if self.state.set_disconnected() {
                info!("connection to console server lost; reconnecting");
            }
            self.drop_peer();
            self.recreate_endpoint();
        }
    }

    /// Drain the send queue and pull inbound bytes over the live peer
    /// connection, reporting whether the connection survived this poll.
    fn exchange(&mut self, handler: &mut dyn MessageHandler) -> Exchange {
        let Some(peer) = self.peer.as_mut() else {
            return Exchange::Continue;
        };

        // Send path: one attempt per queued message, front first. A message
        // either fully enqueues to the OS in one attempt or is retried whole
        // next poll; there are no cross-poll partial sends.
        while let Some(message) = self.send_queue.front() {
            MessageFramer::encode_into(message, &mut self.send_scratch);
            match peer.send(&self.send_scratch) {
                Ok(n) if n > 0 => {
                    self.send_queue.pop();
                }
                Ok(_) => break,
                Err(err) => match classify(&err) {
                    ErrorClass::Retryable => break,
                    ErrorClass::Disconnect => return Exchange::Disconnected,
                    ErrorClass::Other => {
                        warn!(code = err.raw_os_error().unwrap_or(-1), %err, "unclassified send error");
                        break;
                    }
                },
            }
        }

        // Receive path: one non-blocking read into the fixed buffer.
        match peer.recv(&mut self.recv_buf) {
            // Orderly close: zero-length read with no underlying error.
            Ok(0) => return Exchange::Disconnected,
            Ok(n) => {
                for message in self.framer.ingest(&self.recv_buf[..n]) {
                    handler.on_message(&message);
                }
            }
            Err(err) => match classify(&err) {
                ErrorClass::Retryable => {}
                ErrorClass::Disconnect => return Exchange::Disconnected,
                ErrorClass::Other => {
                    warn!(code = err.raw_os_error().unwrap_or(-1), %err, "unclassified receive error");
                }
            },
        }

        Exchange::Continue
    }

    // ── Connection management ────────────────────────────────────

    /// Tear down the live peer connection after a Disconnect-class error.
    /// The assembly buffer is cleared so a fragment from the dead
    /// connection is never stitched onto bytes from its replacement.
    fn drop_peer(&mut self) {
        if let Some(mut peer) = self.peer.take() {
            peer.detach(&mut self.selector);
        }
        self.framer.clear();
    }

    /// Discard-and-recreate is the only client recovery path: allocate a
    /// fresh non-blocking socket toward the configured host. A creation
    /// failure here (e.g. fd exhaustion) is logged and retried next poll.
    fn recreate_endpoint(&mut self) {
        let Some(addr) = self.host_addr else {
            return;
        };
        match Endpoint::connect(&mut self.selector, addr) {
            Ok(endpoint) => self.peer = Some(endpoint),
            Err(err) => warn!(%err, "failed to recreate client endpoint; retrying next poll"),
        }
    }

    // ── Outbound API ─────────────────────────────────────────────

    /// Queue a message for delivery. Never blocks, never fails; ordering
    /// across calls is FIFO. The message must not contain the `0x00`
    /// delimiter byte.
    pub fn send(&mut self, message: impl Into<String>) {
        self.send_queue.push(message.into());
    }

    /// Number of messages waiting to be transmitted. There is no built-in
    /// backpressure; callers that need it watch this and throttle.
    pub fn queue_depth(&self) -> usize {
        self.send_queue.depth()
    }

    // ── State queries ────────────────────────────────────────────

    pub fn is_connected(&self) -> bool {
        match self.role {
            Role::None => false,
            Role::Server => self.peer.is_some(),
            Role::Client => self.state.is_connected(),
        }
    }

    pub fn is_server(&self) -> bool {
        self.role == Role::Server
    }

    pub fn is_client(&self) -> bool {
        self.role == Role::Client
    }

    pub fn is_enabled(&self) -> bool {
        self.role != Role::None && !self.state.is_disabled()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The actual bound listen address (server role only). Lets callers
    /// bind port 0 and discover the assigned port.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(ListenEndpoint::local_addr)
    }
}

// ── Tests ────────────────────────────────────────────────────────

//! # remcon-core
//!
//! Frame-polled TCP transport for driving a running application's command
//! console from an external tool.
//!
//! This crate contains:
//! - **Config**: `NetConfig` and `Role` — TOML-loadable transport settings
//! - **Framer**: `MessageFramer` — zero-byte-delimited message reassembly
//! - **Queue**: `SendQueue` — FIFO of pending outbound messages
//! - **State**: `ConnectionState` — client connection lifecycle
//! - **Network**: `NetSystem` — the per-tick frame pump over non-blocking
//!   sockets, plus the endpoint and readiness plumbing beneath it
//! - **Error**: `NetError` — typed, `thiserror`-based error hierarchy, and
//!   the Retryable / Disconnect / Other socket failure classification
//!
//! The whole subsystem is single-threaded and cooperative: every socket
//! operation happens inside the caller's `begin_frame` call and either
//! completes immediately or is retried on the next tick. There are no
//! background threads, locks, or blocking system calls.

pub mod config;
pub mod error;
pub mod framer;
pub mod network;
pub mod queue;
pub mod state;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use config::{DEFAULT_BUFFER_CAPACITY, NetConfig, Role, parse_host_address};
pub use error::{ErrorClass, NetError, classify};
pub use framer::{DELIMITER, MessageFramer};
pub use network::{ConnectProgress, Endpoint, ListenEndpoint, MessageHandler, NetSystem, Readiness};
pub use queue::SendQueue;
pub use state::ConnectionState;

//! Transport configuration.
//!
//! `NetConfig` is the section the host application embeds in its own TOML
//! config. The role and host address are kept as plain strings so the file
//! stays hand-editable; they are validated once at startup, where any
//! malformed value is a fatal setup error.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NetError;

/// Default capacity for the send and receive buffers, in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 2048;

// ── Role ─────────────────────────────────────────────────────────

/// Which side of the console channel this process plays.
///
/// Fixed for the lifetime of the process once configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// The transport is deliberately inert.
    #[default]
    None,
    /// Connects to one server.
    Client,
    /// Accepts one client.
    Server,
}

impl FromStr for Role {
    type Err = NetError;

    /// Case-insensitive: `"client"`, `"Server"`, `"NONE"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Role::None),
            "client" => Ok(Role::Client),
            "server" => Ok(Role::Server),
            _ => Err(NetError::InvalidRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::None => write!(f, "None"),
            Role::Client => write!(f, "Client"),
            Role::Server => write!(f, "Server"),
        }
    }
}

// ── NetConfig ────────────────────────────────────────────────────

/// Transport settings consumed once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Transport role: `"client"`, `"server"`, or `"none"` (inert).
    pub role: String,

    /// Peer address (client) or bind address (server) as `"A.B.C.D:PORT"`.
    pub host_address: String,

    /// Scratch capacity for outbound frame encoding, in bytes.
    pub send_buffer_capacity: usize,

    /// Capacity of the fixed per-poll receive buffer, in bytes.
    pub recv_buffer_capacity: usize,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            role: "none".into(),
            host_address: "127.0.0.1:23456".into(),
            send_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            recv_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl NetConfig {
    /// Parse the configured role string.
    pub fn role(&self) -> Result<Role, NetError> {
        self.role.parse()
    }

    /// Parse the configured host address string.
    pub fn host_addr(&self) -> Result<SocketAddr, NetError> {
        parse_host_address(&self.host_address)
    }
}

// ── Address parsing ──────────────────────────────────────────────

/// Parse an `"A.B.C.D:PORT"` host address.
///
/// A missing or malformed port segment, or a malformed IPv4 address, is a
/// fatal setup error with a distinct message for each case.
pub fn parse_host_address(addr: &str) -> Result<SocketAddr, NetError> {
    let invalid = |reason| NetError::InvalidAddress {
        addr: addr.to_string(),
        reason,
    };

    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| invalid("missing port segment"))?;
    let host: Ipv4Addr = host.parse().map_err(|_| invalid("malformed IPv4 address"))?;
    let port: u16 = port.parse().map_err(|_| invalid("malformed port segment"))?;

    Ok(SocketAddr::V4(SocketAddrV4::new(host, port)))
}

// ── Tests ────────────────────────────────────────────────────────

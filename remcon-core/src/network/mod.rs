//! Non-blocking socket plumbing and the frame pump.

pub mod endpoint;
pub mod readiness;
pub mod system;

pub use endpoint::{Endpoint, ListenEndpoint};
pub use readiness::{ConnectProgress, Readiness, Selector};
pub use system::{MessageHandler, NetSystem};

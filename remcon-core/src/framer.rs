//! Message framing over the raw byte stream.
//!
//! The wire format is a stream of UTF-8 text messages, each terminated by a
//! single zero byte. TCP delivers that stream in arbitrary chunks: one read
//! may contain a partial message, several messages, or boundaries that land
//! exactly on a delimiter. `MessageFramer` turns those chunks back into
//! discrete messages, carrying an unterminated tail fragment from one poll
//! to the next.

use bytes::BytesMut;

/// The message terminator byte. A message must not contain it.
pub const DELIMITER: u8 = 0x00;

/// Reassembles delimiter-terminated messages from arbitrarily-chunked reads.
#[derive(Debug, Default)]
pub struct MessageFramer {
    /// Carried-over fragment of a not-yet-terminated message.
    carry: BytesMut,
}

impl MessageFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one filled read region and return the messages it completes,
    /// in arrival order.
    ///
    /// If a fragment was carried over from a previous poll, the first
    /// delimiter found completes *that* message. Bytes after the last
    /// delimiter become the new carried-over fragment. Two consecutive
    /// delimiters yield one empty message.
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut completed = Vec::new();
        let mut rest = chunk;

        while let Some(at) = rest.iter().position(|&b| b == DELIMITER) {
            self.carry.extend_from_slice(&rest[..at]);
            completed.push(String::from_utf8_lossy(&self.carry).into_owned());
            self.carry.clear();
            rest = &rest[at + 1..];
        }
        self.carry.extend_from_slice(rest);

        completed
    }

    /// Discard any carried-over fragment.
    ///
    /// Called on every disconnect so that bytes split across a dropped
    /// connection and its replacement are never stitched together.
    pub fn clear(&mut self) {
        self.carry.clear();
    }

    /// Number of carried-over fragment bytes awaiting a delimiter.
    pub fn pending_len(&self) -> usize {
        self.carry.len()
    }

    /// Encode one message into `dst` as a wire frame: the message bytes
    /// followed by the delimiter. `dst` is cleared first.
    pub fn encode_into(message: &str, dst: &mut BytesMut) {
        dst.clear();
        dst.extend_from_slice(message.as_bytes());
        dst.extend_from_slice(&[DELIMITER]);
    }
}

// ── Tests ────────────────────────────────────────────────────────

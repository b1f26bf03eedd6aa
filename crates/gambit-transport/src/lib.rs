//! Transport layer for Gambit.
//!
//! Provides the [`Connection`] trait that the client pipeline drives, and
//! [`LineConnection`], which turns any async byte stream into a sequence of
//! newline-terminated frames.
//!
//! # Feature Flags
//!
//! - `tcp` (default): [`TcpConnection`] and [`connect`] for dialing a relay
//!   server over TCP.

mod error;
mod line;

pub use error::TransportError;
pub use line::{read_frame, LineConnection};
#[cfg(feature = "tcp")]
pub use line::{connect, TcpConnection};

use std::fmt;
use std::future::Future;

/// Byte that ends every frame on the wire.
pub const FRAME_TERMINATOR: u8 = b'\n';

/// Default upper bound for a single inbound frame.
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single framed connection to the relay server.
///
/// The reader and writer loops run as separate Tokio tasks over the same
/// connection, so sending and receiving must be usable concurrently from
/// `&self`. The returned futures are `Send` so generic callers can spawn
/// them.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes one already-framed message to the peer.
    fn send(
        &self,
        frame: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Reads the next frame, without its terminator.
    ///
    /// Returns `Ok(None)` at end of stream.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    /// Closes the connection. Closing twice is a no-op.
    ///
    /// Must not wait on the peer: a `send` blocked on a peer that stopped
    /// reading is aborted rather than waited for.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

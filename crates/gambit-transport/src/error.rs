/// Errors that can occur in the transport layer.
///
/// Every variant is connection-fatal: nothing in Gambit retries a failed
/// read or write.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection was already closed locally.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Writing a frame failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Dialing the relay server failed.
    #[error("connect to {addr} failed: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A peer sent more bytes than the frame limit without a terminator.
    #[error("frame exceeds {0} bytes")]
    FrameTooLarge(usize),
}

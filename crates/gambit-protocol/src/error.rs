//! Error types for the protocol layer.

use crate::MessageType;

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed. Payload shapes are fixed at compile time, so
    /// seeing this means a bug rather than bad input.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed bytes, missing fields, or a
    /// payload that doesn't match its envelope tag.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The envelope carries a tag this build doesn't know.
    #[error("unknown message type (envelope version {version})")]
    UnknownMessageType { version: u32 },

    /// The payload was expected to carry a different tag.
    #[error("expected {expected} payload, envelope says {actual}")]
    TypeMismatch {
        expected: MessageType,
        actual: MessageType,
    },

    /// The message is well-formed but not allowed here, e.g. a client
    /// trying to send a terminal game result.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

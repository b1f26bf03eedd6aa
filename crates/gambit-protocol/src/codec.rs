//! Codec trait and implementations for serializing messages.
//!
//! The envelope layer only needs "value to bytes" and "bytes to value";
//! which format does the work is a [`Codec`] choice. [`JsonCodec`] is the
//! one the relay server speaks.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes Rust values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because the codec is shared by the reader and
/// writer tasks for the whole life of a connection.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// `serde_json` never emits a raw newline inside a compact document, so a
/// JSON envelope can safely be terminated by `\n`. Envelopes embed their
/// payload as raw JSON, so this is the codec sealing expects.
///
/// ```rust
/// use gambit_protocol::{Codec, JsonCodec, MoveMessage};
///
/// let codec = JsonCodec;
/// let msg = MoveMessage { algebraic: "e2e4".into() };
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded: MoveMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

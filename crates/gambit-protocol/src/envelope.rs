//! Sealing messages into envelopes and frames, and opening them again.
//!
//! Outbound: [`Message`] → [`seal`] → [`Envelope`] → [`encode_frame`] →
//! bytes ending in exactly one terminator.
//!
//! Inbound: frame → [`decode_frame`] → [`Envelope`] → [`open`] →
//! [`Message`]. The two inbound steps fail separately on purpose: a bad
//! envelope means framing can no longer be trusted, a bad payload only
//! means one message is lost.

use gambit_transport::FRAME_TERMINATOR;
use serde::Serialize;
use serde_json::value::RawValue;

use crate::{
    ChatMessage, Codec, ConnectInfo, Envelope, GameAction, GameUpdate,
    LobbyCommand, Message, MessageType, MoveMessage, Payload, ProtocolError,
    StatusMessage, PROTOCOL_VERSION,
};

/// Wraps a message in an envelope tagged with its type.
pub fn seal<C: Codec>(
    codec: &C,
    message: &Message,
) -> Result<Envelope, ProtocolError> {
    let payload = match message {
        Message::GameUpdate(m) => embed(codec, m)?,
        Message::ConnectInfo(m) => embed(codec, m)?,
        Message::Move(m) => embed(codec, m)?,
        Message::Chat(m) => embed(codec, m)?,
        Message::GameAction(m) => embed(codec, m)?,
        Message::LobbyCommand(m) => embed(codec, m)?,
        Message::Status(m) => embed(codec, m)?,
    };
    Ok(Envelope {
        version: PROTOCOL_VERSION,
        msg_type: message.msg_type(),
        payload: Some(payload),
    })
}

/// Encodes one payload for embedding in a JSON envelope.
fn embed<C: Codec, T: Serialize>(
    codec: &C,
    value: &T,
) -> Result<Box<RawValue>, ProtocolError> {
    let bytes = codec.encode(value)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| ProtocolError::InvalidMessage(e.to_string()))?;
    RawValue::from_string(text).map_err(ProtocolError::Encode)
}

/// Decodes an envelope's payload as `T`.
///
/// # Errors
/// [`ProtocolError::TypeMismatch`] if the envelope is tagged with a
/// different type, [`ProtocolError::Decode`] if the payload is missing or
/// doesn't fit `T` exactly.
pub fn decode_payload<T: Payload, C: Codec>(
    codec: &C,
    envelope: &Envelope,
) -> Result<T, ProtocolError> {
    let expected = T::TYPE;
    if envelope.msg_type != expected {
        tracing::trace!(%expected, actual = %envelope.msg_type, "payload tag mismatch");
        return Err(ProtocolError::TypeMismatch {
            expected,
            actual: envelope.msg_type,
        });
    }
    let raw = envelope.payload.as_deref().map_or("null", RawValue::get);
    codec.decode(raw.as_bytes())
}

/// Decodes an envelope's payload into the variant its tag names.
pub fn open<C: Codec>(
    codec: &C,
    envelope: &Envelope,
) -> Result<Message, ProtocolError> {
    fn typed<T: Payload, C: Codec>(
        codec: &C,
        envelope: &Envelope,
    ) -> Result<Message, ProtocolError> {
        decode_payload::<T, C>(codec, envelope).map(Into::into)
    }

    match envelope.msg_type {
        MessageType::GameUpdate => typed::<GameUpdate, _>(codec, envelope),
        MessageType::ConnectInfo => typed::<ConnectInfo, _>(codec, envelope),
        MessageType::Move => typed::<MoveMessage, _>(codec, envelope),
        MessageType::Chat => typed::<ChatMessage, _>(codec, envelope),
        MessageType::GameAction => typed::<GameAction, _>(codec, envelope),
        MessageType::LobbyCommand => {
            typed::<LobbyCommand, _>(codec, envelope)
        }
        MessageType::Status => typed::<StatusMessage, _>(codec, envelope),
        MessageType::Unknown => Err(ProtocolError::UnknownMessageType {
            version: envelope.version,
        }),
    }
}

/// Seals and serializes a message into one wire frame.
///
/// The result always ends with exactly one [`FRAME_TERMINATOR`].
pub fn encode_frame<C: Codec>(
    codec: &C,
    message: &Message,
) -> Result<Vec<u8>, ProtocolError> {
    let envelope = seal(codec, message)?;
    let mut frame = codec.encode(&envelope)?;
    if frame.last() != Some(&FRAME_TERMINATOR) {
        frame.push(FRAME_TERMINATOR);
    }
    Ok(frame)
}

/// Parses one wire frame into an envelope. A trailing terminator is
/// optional.
pub fn decode_frame<C: Codec>(
    codec: &C,
    frame: &[u8],
) -> Result<Envelope, ProtocolError> {
    let body = frame
        .strip_suffix(&[FRAME_TERMINATOR][..])
        .unwrap_or(frame);
    tracing::trace!(len = body.len(), "decoding frame");
    codec.decode(body)
}

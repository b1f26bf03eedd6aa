//! Wire protocol for Gambit.
//!
//! This crate defines what a client and the relay server say to each other:
//!
//! - **Types** ([`Envelope`], [`Message`], [`MessageType`], the payload
//!   structs and [`ActionKind`]): the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those structures
//!   become bytes.
//! - **Framing** ([`encode_frame`], [`decode_frame`], [`open`]): one
//!   envelope per newline-terminated frame.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (frames) → Protocol (Envelope → Message) → Session (state)
//! ```

mod codec;
mod envelope;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use envelope::{decode_frame, decode_payload, encode_frame, open, seal};
pub use error::ProtocolError;
pub use types::{
    ActionKind, ChatMessage, ConnectInfo, Envelope, GameAction, GameUpdate,
    LobbyCommand, LobbyCommandKind, Message, MessageType, MoveMessage,
    Payload, Role, StatusMessage, PROTOCOL_VERSION,
};

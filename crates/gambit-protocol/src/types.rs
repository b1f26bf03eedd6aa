//! Core protocol types for Gambit's wire format.
//!
//! Every frame on the wire is one [`Envelope`]. The envelope names the
//! payload's [`MessageType`] and carries the payload itself as embedded
//! JSON that stays undecoded until the tag has been read. Only then is it
//! decoded into the matching concrete struct.
//!
//! Payload structs reject fields they don't declare. Several shapes are
//! supersets of others (`ConnectInfo` of `GameUpdate`, `ChatMessage` of
//! `StatusMessage`), so a lenient decoder would accept a payload under the
//! wrong tag.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// The protocol revision this build speaks.
///
/// Carried in every [`Envelope`]. Peers that omit the field decode as
/// version 0.
pub const PROTOCOL_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Which side the local participant plays.
///
/// Fixed by [`ConnectInfo`] for the lifetime of one game, and the only
/// input besides the cell coordinates that board orientation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    White,
    Black,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "White"),
            Self::Black => write!(f, "Black"),
        }
    }
}

// ---------------------------------------------------------------------------
// MessageType
// ---------------------------------------------------------------------------

/// The tag that tells a receiver how to decode an envelope's payload.
///
/// Variants are serialized by name, so reordering them never changes the
/// wire format. A tag this build doesn't know decodes as
/// [`MessageType::Unknown`] instead of failing the whole envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    GameUpdate,
    ConnectInfo,
    Move,
    Chat,
    GameAction,
    LobbyCommand,
    Status,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GameUpdate => "GameUpdate",
            Self::ConnectInfo => "ConnectInfo",
            Self::Move => "Move",
            Self::Chat => "Chat",
            Self::GameAction => "GameAction",
            Self::LobbyCommand => "LobbyCommand",
            Self::Status => "Status",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A concrete message body with a fixed [`MessageType`].
///
/// The associated constant ties each struct to exactly one tag, which is
/// what lets the envelope codec refuse a payload whose tag doesn't match.
pub trait Payload: Serialize + DeserializeOwned + Into<Message> {
    /// The tag written into the envelope for this payload.
    const TYPE: MessageType;
}

/// Server → Client: full position refresh after a move or a (re)start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameUpdate {
    pub fen: String,
    pub is_local_turn: bool,
}

/// Server → Client: sent once per game start. Fixes the local role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectInfo {
    pub role: Role,
    pub fen: String,
    pub is_local_turn: bool,
}

/// Client → Server: a committed move in long algebraic form (`e2e4`,
/// `e7e8q`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveMessage {
    pub algebraic: String,
}

/// Either direction: one chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatMessage {
    pub text: String,
    #[serde(default)]
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Server → Client: free-form status line ("Opponent left", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusMessage {
    pub text: String,
}

/// Either direction: a resign/draw/rematch negotiation step or a
/// terminal result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameAction {
    pub action: ActionKind,
    /// Extra context, e.g. "checkmate" on a [`ActionKind::Win`].
    #[serde(default)]
    pub detail: String,
}

impl GameAction {
    /// Creates an action with an empty detail.
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            detail: String::new(),
        }
    }
}

/// Lobby operations. Client → Server except [`LobbyCommandKind::RawText`],
/// which the server also uses for free-text replies shown in the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LobbyCommand {
    pub command: LobbyCommandKind,
    #[serde(default)]
    pub argument: String,
}

/// The lobby operation carried by a [`LobbyCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LobbyCommandKind {
    /// List open games.
    List,
    /// Join a game by code, or a random one when the argument is empty.
    Join,
    /// Create a game with the given code.
    Create,
    /// Set the display name.
    SetName,
    /// Free text.
    RawText,
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Every step of the resign, draw and rematch negotiations, plus the
/// terminal outcomes the server announces.
///
/// The `*Prompt`, `ResignCancel` and `Exit` kinds name local buttons and
/// never travel on the wire. `Win`, `Lose` and `DrawResult` are only ever
/// received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    DrawPrompt,
    DrawOffer,
    DrawAccept,
    DrawReject,
    ResignPrompt,
    ResignConfirm,
    ResignCancel,
    RematchPrompt,
    RematchOffer,
    RematchAccept,
    RematchReject,
    Win,
    Lose,
    DrawResult,
    Exit,
}

impl ActionKind {
    /// Returns `true` for outcomes that end a game.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Lose | Self::DrawResult)
    }

    /// Returns `true` if a client is allowed to put this kind on the wire.
    pub fn is_client_sendable(self) -> bool {
        matches!(
            self,
            Self::DrawOffer
                | Self::DrawAccept
                | Self::DrawReject
                | Self::ResignConfirm
                | Self::RematchOffer
                | Self::RematchAccept
                | Self::RematchReject
        )
    }

    /// The text shown on a button or status line for this kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::DrawPrompt => "Draw",
            Self::DrawOffer => "Draw offer",
            Self::DrawAccept | Self::RematchAccept => "Accept",
            Self::DrawReject | Self::RematchReject => "Reject",
            Self::ResignPrompt => "Resign",
            Self::ResignConfirm => "Yes",
            Self::ResignCancel => "No",
            Self::RematchPrompt => "New game",
            Self::RematchOffer => "Rematch offer",
            Self::Win => "You win",
            Self::Lose => "You lose",
            Self::DrawResult => "Draw",
            Self::Exit => "Exit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Any decoded payload. One variant per [`MessageType`] except `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    GameUpdate(GameUpdate),
    ConnectInfo(ConnectInfo),
    Move(MoveMessage),
    Chat(ChatMessage),
    GameAction(GameAction),
    LobbyCommand(LobbyCommand),
    Status(StatusMessage),
}

impl Message {
    /// The tag this message is sealed with.
    pub fn msg_type(&self) -> MessageType {
        match self {
            Self::GameUpdate(_) => MessageType::GameUpdate,
            Self::ConnectInfo(_) => MessageType::ConnectInfo,
            Self::Move(_) => MessageType::Move,
            Self::Chat(_) => MessageType::Chat,
            Self::GameAction(_) => MessageType::GameAction,
            Self::LobbyCommand(_) => MessageType::LobbyCommand,
            Self::Status(_) => MessageType::Status,
        }
    }
}

macro_rules! payload {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl Payload for $ty {
                const TYPE: MessageType = MessageType::$variant;
            }

            impl From<$ty> for Message {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

payload! {
    GameUpdate => GameUpdate,
    ConnectInfo => ConnectInfo,
    MoveMessage => Move,
    ChatMessage => Chat,
    GameAction => GameAction,
    LobbyCommand => LobbyCommand,
    StatusMessage => Status,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level wire wrapper. Every frame is one envelope.
///
/// ```text
/// {"version":1,"msg_type":"Move","payload":{"algebraic":"e2e4"}}\n
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Sender's [`PROTOCOL_VERSION`]; 0 when the peer omits it.
    #[serde(default)]
    pub version: u32,

    /// How to decode `payload`.
    pub msg_type: MessageType,

    /// The payload as raw JSON; `None` when the peer omits it.
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

// =========================================================================
// Tests
// =========================================================================

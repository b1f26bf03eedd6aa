//! Client-side game state for Gambit.
//!
//! Everything here is synchronous and I/O-free. The client pipeline feeds
//! it messages and clicks, and carries out the [`Effect`]s it returns.
//!
//! - [`GameSession`]: role, position, turn, and the move gesture.
//! - [`Negotiation`]: resign / draw / rematch offers and results.
//! - [`parse_lobby_input`]: the lobby prompt.
//!
//! ```text
//! Protocol Layer (Message) → Session Layer (this crate) → Effects → Client
//! ```

mod error;
mod lobby;
mod negotiation;
mod session;

pub use error::SessionError;
pub use lobby::{
    parse_lobby_input, LobbyInput, ABOUT_TEXT, HELP_TEXT, INVALID_TEXT,
    MISSING_NAME_TEXT, WELCOME_TEXT,
};
pub use negotiation::{
    Effect, Negotiation, NegotiationState, Offer, OptionButton,
};
pub use session::{turn_status, GameSession};

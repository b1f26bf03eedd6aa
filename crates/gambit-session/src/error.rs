//! Error types for the session layer.

use gambit_board::BoardError;

/// Errors raised while applying server data to the local game.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A game-only message or UI action arrived before any `ConnectInfo`
    /// (or after teardown dropped the session).
    #[error("no active game")]
    NoActiveGame,

    /// The server sent a position the rules engine couldn't load.
    #[error(transparent)]
    Board(#[from] BoardError),
}

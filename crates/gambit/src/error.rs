//! Unified error type for the Gambit client.

use gambit_board::BoardError;
use gambit_protocol::ProtocolError;
use gambit_session::SessionError;
use gambit_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapping variant lets `?` convert
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GambitError {
    /// Connect, send or receive failed, or the connection is gone.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A message couldn't be encoded, decoded or sent.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The rules engine rejected server data.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// A game-only operation with no game in progress.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// [`GameClient::run`](crate::GameClient::run) was called twice.
    #[error("client is already running")]
    AlreadyRunning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let gambit_err: GambitError = err.into();
        assert!(matches!(gambit_err, GambitError::Transport(_)));
        assert!(gambit_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let gambit_err: GambitError = err.into();
        assert!(matches!(gambit_err, GambitError::Protocol(_)));
    }

    #[test]
    fn test_from_board_error() {
        let err = BoardError::InvalidSquare("z9".into());
        let gambit_err: GambitError = err.into();
        assert!(matches!(gambit_err, GambitError::Board(_)));
        assert!(gambit_err.to_string().contains("z9"));
    }

    #[test]
    fn test_from_session_error() {
        let gambit_err: GambitError = SessionError::NoActiveGame.into();
        assert!(matches!(gambit_err, GambitError::Session(_)));
        assert_eq!(gambit_err.to_string(), "no active game");
    }
}

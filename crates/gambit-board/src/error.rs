//! Error types for the board layer.

/// Errors raised while turning server data into board state.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The rules engine refused a FEN string.
    #[error("invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },

    /// A square name didn't parse.
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),
}

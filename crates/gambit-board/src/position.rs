//! The rules-engine seam.
//!
//! Gambit never decides move legality itself. It asks a [`Position`]
//! built from the server's FEN, and compares candidate moves against the
//! engine's own move strings.

use gambit_protocol::Role;

use crate::{BoardError, Square};

/// A game position as seen by an external rules engine.
///
/// # Example
///
/// ```rust
/// use gambit_board::{BoardError, Piece, Position, Square};
///
/// /// A position with no pieces and no moves.
/// struct Empty;
///
/// impl Position for Empty {
///     fn from_fen(_fen: &str) -> Result<Self, BoardError> {
///         Ok(Empty)
///     }
///     fn legal_moves(&self) -> Vec<String> {
///         Vec::new()
///     }
///     fn piece_at(&self, _square: Square) -> Option<Piece> {
///         None
///     }
/// }
/// ```
pub trait Position: Sized + Send + Sync + 'static {
    /// Parses a position from Forsyth–Edwards notation.
    fn from_fen(fen: &str) -> Result<Self, BoardError>;

    /// Every legal move for the side to move, in long algebraic form
    /// (`e2e4`, `e1g1`, `a7a8q`).
    fn legal_moves(&self) -> Vec<String>;

    /// The piece standing on `square`, if any.
    fn piece_at(&self, square: Square) -> Option<Piece>;
}

/// Piece types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lower-case letter, as used for promotion suffixes.
    pub fn letter(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }
}

/// A piece with its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Role,
}

impl Piece {
    /// FEN-style symbol: upper case for White, lower case for Black.
    pub fn symbol(self) -> char {
        match self.color {
            Role::White => self.kind.letter().to_ascii_uppercase(),
            Role::Black => self.kind.letter(),
        }
    }
}

//! [`Position`] backed by `cozy-chess`.

use cozy_chess::{Board, Color, Move};
use gambit_protocol::Role;

use crate::{BoardError, Piece, PieceKind, Position, Square};

/// A standard chess position.
///
/// `cozy-chess` encodes castling as "king takes own rook"; moves are
/// reported here with the king's real destination (`e1g1`), which is what
/// a two-click gesture on the board produces.
#[derive(Debug, Clone, Default)]
pub struct ChessPosition {
    board: Board,
}

impl ChessPosition {
    fn uci(&self, mv: Move) -> String {
        let from = model_square(mv.from);
        let mut to = model_square(mv.to);

        let is_castle = self.board.piece_on(mv.from) == Some(cozy_chess::Piece::King)
            && self.board.color_on(mv.to) == self.board.color_on(mv.from);
        if is_castle {
            let file = if to.file() > from.file() { 6 } else { 2 };
            to = Square::new(file, from.rank()).unwrap_or(to);
        }

        let mut uci = format!("{from}{to}");
        if let Some(promotion) = mv.promotion {
            uci.push(piece_kind(promotion).letter());
        }
        uci
    }
}

impl Position for ChessPosition {
    fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let board = fen.parse::<Board>().map_err(|e| BoardError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{e:?}"),
        })?;
        Ok(Self { board })
    }

    fn legal_moves(&self) -> Vec<String> {
        let mut moves = Vec::new();
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves.into_iter().map(|mv| self.uci(mv)));
            false
        });
        moves
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        let sq = cozy_chess::Square::index(square.index());
        let kind = piece_kind(self.board.piece_on(sq)?);
        let color = match self.board.color_on(sq)? {
            Color::White => Role::White,
            Color::Black => Role::Black,
        };
        Some(Piece { kind, color })
    }
}

fn model_square(sq: cozy_chess::Square) -> Square {
    Square::from_index_wrapping(sq as usize)
}

fn piece_kind(piece: cozy_chess::Piece) -> PieceKind {
    match piece {
        cozy_chess::Piece::Pawn => PieceKind::Pawn,
        cozy_chess::Piece::Knight => PieceKind::Knight,
        cozy_chess::Piece::Bishop => PieceKind::Bishop,
        cozy_chess::Piece::Rook => PieceKind::Rook,
        cozy_chess::Piece::Queen => PieceKind::Queen,
        cozy_chess::Piece::King => PieceKind::King,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_start_position_moves() {
        let pos = ChessPosition::from_fen(START).unwrap();
        let moves = pos.legal_moves();
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&"e2e4".to_string()));
        assert!(moves.contains(&"g1f3".to_string()));
    }

    #[test]
    fn test_default_is_start_position() {
        let pos = ChessPosition::default();
        assert_eq!(pos.legal_moves().len(), 20);
    }

    #[test]
    fn test_piece_at() {
        let pos = ChessPosition::from_fen(START).unwrap();
        assert_eq!(
            pos.piece_at(sq("e2")),
            Some(Piece {
                kind: PieceKind::Pawn,
                color: Role::White
            })
        );
        assert_eq!(
            pos.piece_at(sq("d8")),
            Some(Piece {
                kind: PieceKind::Queen,
                color: Role::Black
            })
        );
        assert_eq!(pos.piece_at(sq("e4")), None);
    }

    #[test]
    fn test_castling_uses_king_destination() {
        let pos =
            ChessPosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
                .unwrap();
        let moves = pos.legal_moves();
        assert!(moves.contains(&"e1g1".to_string()));
        assert!(moves.contains(&"e1c1".to_string()));
        assert!(!moves.contains(&"e1h1".to_string()));
    }

    #[test]
    fn test_promotions_carry_suffix() {
        let pos = ChessPosition::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1")
            .unwrap();
        let moves = pos.legal_moves();
        for suffix in ['q', 'r', 'b', 'n'] {
            assert!(moves.contains(&format!("a7a8{suffix}")));
        }
        assert!(!moves.contains(&"a7a8".to_string()));
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        let err = ChessPosition::from_fen("not a position").unwrap_err();
        assert!(matches!(err, BoardError::InvalidFen { .. }));
    }
}

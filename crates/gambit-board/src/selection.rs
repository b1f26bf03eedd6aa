//! The two-click move gesture.
//!
//! ```text
//!            select S               select D ≠ A
//!   Idle ───────────────→ Anchored(A) ─────────────→ Idle  (Committed | Rejected)
//!     ↑                       │
//!     └──── select A again ───┘                            (Cancelled)
//! ```
//!
//! The selector never talks to the network. It reports what happened and
//! leaves sending a committed move to the caller.

use crate::{Piece, PieceKind, Position, Square};

/// Where the gesture currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Anchored(Square),
}

/// Result of one click on a board square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// First click: the square is now the anchor.
    Anchored(Square),
    /// The anchor was clicked again; the gesture is dropped.
    Cancelled(Square),
    /// The candidate move is legal and should be sent.
    Committed(String),
    /// The candidate move is not legal. Purely local; nothing is sent.
    Rejected(String),
}

/// Tracks the anchor square of an in-progress move gesture.
#[derive(Debug, Clone, Default)]
pub struct MoveSelector {
    state: Selection,
}

impl MoveSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Selection {
        self.state
    }

    /// The highlighted anchor, if a gesture is in progress.
    pub fn anchor(&self) -> Option<Square> {
        match self.state {
            Selection::Idle => None,
            Selection::Anchored(square) => Some(square),
        }
    }

    /// Drops any in-progress gesture.
    pub fn reset(&mut self) {
        self.state = Selection::Idle;
    }

    /// Feeds one click on `square`, validating a completed gesture against
    /// `position`.
    pub fn select<P: Position>(
        &mut self,
        square: Square,
        position: &P,
    ) -> SelectionOutcome {
        match self.state {
            Selection::Idle => {
                self.state = Selection::Anchored(square);
                SelectionOutcome::Anchored(square)
            }
            Selection::Anchored(anchor) if anchor == square => {
                self.state = Selection::Idle;
                SelectionOutcome::Cancelled(anchor)
            }
            Selection::Anchored(anchor) => {
                self.state = Selection::Idle;
                let candidate =
                    candidate_move(anchor, square, position.piece_at(anchor));
                if position.legal_moves().iter().any(|mv| *mv == candidate) {
                    tracing::debug!(%candidate, "move committed");
                    SelectionOutcome::Committed(candidate)
                } else {
                    tracing::debug!(%candidate, "illegal move attempt");
                    SelectionOutcome::Rejected(candidate)
                }
            }
        }
    }
}

/// Builds the move string for a gesture from `from` to `to`.
///
/// A pawn stepping from rank 7 to rank 8, or from rank 2 to rank 1,
/// always promotes to a queen.
pub fn candidate_move(from: Square, to: Square, piece: Option<Piece>) -> String {
    let mut candidate = format!("{from}{to}");
    if is_promotion_step(from, to, piece) {
        candidate.push(PieceKind::Queen.letter());
    }
    candidate
}

fn is_promotion_step(from: Square, to: Square, piece: Option<Piece>) -> bool {
    let is_pawn = matches!(
        piece,
        Some(Piece {
            kind: PieceKind::Pawn,
            ..
        })
    );
    is_pawn
        && ((from.rank() == 6 && to.rank() == 7)
            || (from.rank() == 1 && to.rank() == 0))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use gambit_protocol::Role;

    use super::*;
    use crate::BoardError;

    /// A position with a fixed move list and piece placement.
    struct Scripted {
        moves: Vec<String>,
        pieces: HashMap<Square, Piece>,
    }

    impl Scripted {
        fn new(moves: &[&str], pieces: &[(&str, PieceKind, Role)]) -> Self {
            Self {
                moves: moves.iter().map(|m| m.to_string()).collect(),
                pieces: pieces
                    .iter()
                    .map(|(s, kind, color)| {
                        (
                            s.parse().unwrap(),
                            Piece {
                                kind: *kind,
                                color: *color,
                            },
                        )
                    })
                    .collect(),
            }
        }
    }

    impl Position for Scripted {
        fn from_fen(_fen: &str) -> Result<Self, BoardError> {
            Ok(Self::new(&[], &[]))
        }

        fn legal_moves(&self) -> Vec<String> {
            self.moves.clone()
        }

        fn piece_at(&self, square: Square) -> Option<Piece> {
            self.pieces.get(&square).copied()
        }
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_click_anchors() {
        let pos = Scripted::new(&["e2e4"], &[]);
        let mut selector = MoveSelector::new();

        let outcome = selector.select(sq("e2"), &pos);
        assert_eq!(outcome, SelectionOutcome::Anchored(sq("e2")));
        assert_eq!(selector.anchor(), Some(sq("e2")));
    }

    #[test]
    fn test_second_click_on_anchor_cancels() {
        let pos = Scripted::new(&["e2e4"], &[]);
        let mut selector = MoveSelector::new();

        selector.select(sq("e2"), &pos);
        let outcome = selector.select(sq("e2"), &pos);

        assert_eq!(outcome, SelectionOutcome::Cancelled(sq("e2")));
        assert_eq!(selector.state(), Selection::Idle);
    }

    #[test]
    fn test_legal_destination_commits() {
        let pos = Scripted::new(
            &["e2e3", "e2e4"],
            &[("e2", PieceKind::Pawn, Role::White)],
        );
        let mut selector = MoveSelector::new();

        selector.select(sq("e2"), &pos);
        let outcome = selector.select(sq("e4"), &pos);

        assert_eq!(outcome, SelectionOutcome::Committed("e2e4".into()));
        assert_eq!(selector.state(), Selection::Idle);
    }

    #[test]
    fn test_illegal_destination_rejects_and_resets() {
        let pos = Scripted::new(
            &["e2e4"],
            &[("e2", PieceKind::Pawn, Role::White)],
        );
        let mut selector = MoveSelector::new();

        selector.select(sq("e2"), &pos);
        let outcome = selector.select(sq("e5"), &pos);

        assert_eq!(outcome, SelectionOutcome::Rejected("e2e5".into()));
        assert_eq!(selector.anchor(), None);
    }

    #[test]
    fn test_white_pawn_auto_promotes_to_queen() {
        let pos = Scripted::new(
            &["b7b8q", "b7b8n"],
            &[("b7", PieceKind::Pawn, Role::White)],
        );
        let mut selector = MoveSelector::new();

        selector.select(sq("b7"), &pos);
        let outcome = selector.select(sq("b8"), &pos);

        assert_eq!(outcome, SelectionOutcome::Committed("b7b8q".into()));
    }

    #[test]
    fn test_black_pawn_auto_promotes_to_queen() {
        let pawn = Some(Piece {
            kind: PieceKind::Pawn,
            color: Role::Black,
        });
        assert_eq!(candidate_move(sq("g2"), sq("h1"), pawn), "g2h1q");
    }

    #[test]
    fn test_non_pawn_never_gets_suffix() {
        let rook = Some(Piece {
            kind: PieceKind::Rook,
            color: Role::White,
        });
        assert_eq!(candidate_move(sq("a7"), sq("a8"), rook), "a7a8");
        assert_eq!(candidate_move(sq("a7"), sq("a8"), None), "a7a8");
    }

    #[test]
    fn test_pawn_on_other_ranks_gets_no_suffix() {
        let pawn = Some(Piece {
            kind: PieceKind::Pawn,
            color: Role::White,
        });
        assert_eq!(candidate_move(sq("e6"), sq("e7"), pawn), "e6e7");
    }

    #[cfg(feature = "cozy")]
    #[test]
    fn test_promotion_against_real_engine() {
        use crate::ChessPosition;

        let pos =
            ChessPosition::from_fen("8/4P3/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let mut selector = MoveSelector::new();

        selector.select(sq("e7"), &pos);
        let outcome = selector.select(sq("e8"), &pos);

        assert_eq!(outcome, SelectionOutcome::Committed("e7e8q".into()));
    }
}

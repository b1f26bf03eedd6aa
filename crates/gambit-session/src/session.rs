//! The state of one game as the local player sees it.
//!
//! A [`GameSession`] is created by a `ConnectInfo` and replaced wholesale
//! by the next one. Between those it only changes through position
//! updates, local clicks and negotiation steps.

use gambit_board::{
    cell_to_square, BoardGrid, MoveSelector, Position, SelectionOutcome,
};
use gambit_protocol::{ConnectInfo, GameUpdate, Role};

use crate::{Negotiation, SessionError};

/// Status text for the side to move.
pub fn turn_status(is_local_turn: bool) -> &'static str {
    if is_local_turn {
        "Your turn!"
    } else {
        "Opponent's turn!"
    }
}

/// One game in progress (or just finished).
///
/// The role is fixed for the lifetime of the session; everything else
/// follows the server.
#[derive(Debug)]
pub struct GameSession<P> {
    role: Role,
    fen: String,
    position: P,
    local_turn: bool,
    negotiation: Negotiation,
    selector: MoveSelector,
}

impl<P: Position> GameSession<P> {
    /// Starts a fresh game from the server's `ConnectInfo`.
    pub fn start(info: &ConnectInfo) -> Result<Self, SessionError> {
        let position = P::from_fen(&info.fen)?;
        tracing::info!(role = %info.role, turn = info.is_local_turn, "game started");
        Ok(Self {
            role: info.role,
            fen: info.fen.clone(),
            position,
            local_turn: info.is_local_turn,
            negotiation: Negotiation::new(),
            selector: MoveSelector::new(),
        })
    }

    /// Replaces the position. On a bad FEN the session is left untouched.
    pub fn apply_update(&mut self, update: &GameUpdate) -> Result<(), SessionError> {
        self.position = P::from_fen(&update.fen)?;
        self.fen.clone_from(&update.fen);
        self.local_turn = update.is_local_turn;
        self.negotiation.on_position_update();
        Ok(())
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn position(&self) -> &P {
        &self.position
    }

    pub fn is_local_turn(&self) -> bool {
        self.local_turn
    }

    pub fn negotiation(&self) -> &Negotiation {
        &self.negotiation
    }

    pub fn negotiation_mut(&mut self) -> &mut Negotiation {
        &mut self.negotiation
    }

    pub fn selector(&self) -> &MoveSelector {
        &self.selector
    }

    /// Feeds a click on UI cell `(row, col)` into the move gesture.
    ///
    /// Returns `None` for gutter cells, which are not selectable.
    pub fn select_cell(&mut self, row: usize, col: usize) -> Option<SelectionOutcome> {
        let square = cell_to_square(row, col, self.role)?;
        Some(self.selector.select(square, &self.position))
    }

    /// The board as it should be drawn right now.
    pub fn grid(&self) -> BoardGrid {
        BoardGrid::layout(&self.position, self.role, self.selector.anchor())
    }

    pub fn turn_status(&self) -> &'static str {
        turn_status(self.local_turn)
    }
}

#[cfg(test)]
mod tests {
    use gambit_board::{ChessPosition, GridCell, Selection};

    use super::*;
    use crate::NegotiationState;

    const START: &str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    const AFTER_E4: &str =
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

    fn start(role: Role) -> GameSession<ChessPosition> {
        start_from(role, START)
    }

    fn start_from(role: Role, fen: &str) -> GameSession<ChessPosition> {
        GameSession::start(&ConnectInfo {
            role,
            fen: fen.into(),
            is_local_turn: role == Role::White,
        })
        .unwrap()
    }

    #[test]
    fn test_start_rejects_bad_fen() {
        let result = GameSession::<ChessPosition>::start(&ConnectInfo {
            role: Role::White,
            fen: "not a fen".into(),
            is_local_turn: true,
        });
        assert!(matches!(result, Err(SessionError::Board(_))));
    }

    #[test]
    fn test_white_clicks_commit_e2e4() {
        let mut session = start(Role::White);
        // e2 is row 6, col 5 for White.
        assert!(matches!(
            session.select_cell(6, 5),
            Some(SelectionOutcome::Anchored(_))
        ));
        assert_eq!(
            session.select_cell(4, 5),
            Some(SelectionOutcome::Committed("e2e4".into()))
        );
    }

    #[test]
    fn test_black_orientation_is_flipped() {
        let mut session = start_from(Role::Black, AFTER_E4);
        // For Black, row 6 is rank 7.
        session.select_cell(6, 5);
        assert_eq!(
            session.select_cell(4, 5),
            Some(SelectionOutcome::Committed("e7e5".into()))
        );
    }

    #[test]
    fn test_gutter_click_is_ignored() {
        let mut session = start(Role::White);
        assert_eq!(session.select_cell(3, 0), None);
        assert_eq!(session.select_cell(8, 4), None);
        assert_eq!(session.selector().state(), Selection::Idle);
    }

    #[test]
    fn test_grid_highlights_anchor() {
        let mut session = start(Role::White);
        session.select_cell(6, 5);
        assert!(matches!(
            session.grid().get(6, 5),
            Some(GridCell::Square {
                highlighted: true,
                ..
            })
        ));
    }

    #[test]
    fn test_update_replaces_position_and_turn() {
        let mut session = start(Role::Black);
        assert_eq!(session.turn_status(), "Opponent's turn!");

        session
            .apply_update(&GameUpdate {
                fen: AFTER_E4.into(),
                is_local_turn: true,
            })
            .unwrap();

        assert_eq!(session.fen(), AFTER_E4);
        assert_eq!(session.turn_status(), "Your turn!");
        assert_eq!(session.role(), Role::Black);
    }

    #[test]
    fn test_bad_update_keeps_previous_position() {
        let mut session = start(Role::White);
        let result = session.apply_update(&GameUpdate {
            fen: "garbage".into(),
            is_local_turn: false,
        });

        assert!(result.is_err());
        assert_eq!(session.fen(), START);
        assert!(session.is_local_turn());
    }

    #[test]
    fn test_update_withdraws_pending_offer() {
        let mut session = start(Role::White);
        session
            .negotiation_mut()
            .press(crate::OptionButton::Primary);
        assert_ne!(session.negotiation().state(), NegotiationState::Idle);

        session
            .apply_update(&GameUpdate {
                fen: AFTER_E4.into(),
                is_local_turn: false,
            })
            .unwrap();
        assert_eq!(session.negotiation().state(), NegotiationState::Idle);
    }
}

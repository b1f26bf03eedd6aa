//! What each UI cell should show.
//!
//! The UI toolkit owns drawing; this module only decides contents, so a
//! front-end can paint the grid without knowing anything about roles or
//! square numbering.

use gambit_protocol::Role;

use crate::orientation::{cell_to_square, row_to_rank, GRID_COLS, GRID_ROWS};
use crate::{Piece, Position, Square};

/// Contents of one UI cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    /// Rank number in the left gutter.
    RankLabel(char),
    /// File letter in the bottom row.
    FileLabel(char),
    /// The unused bottom-left corner.
    Corner,
    /// A board square.
    Square {
        square: Square,
        piece: Option<Piece>,
        light: bool,
        highlighted: bool,
    },
}

impl GridCell {
    /// Only board squares accept clicks.
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Square { .. })
    }
}

/// A full 9×9 snapshot of the board as the local player sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGrid {
    cells: Vec<Vec<GridCell>>,
}

impl BoardGrid {
    /// Lays out `position` for `role`, marking `highlight` if given.
    pub fn layout<P: Position>(
        position: &P,
        role: Role,
        highlight: Option<Square>,
    ) -> Self {
        let cells = (0..GRID_ROWS)
            .map(|row| {
                (0..GRID_COLS)
                    .map(|col| layout_cell(position, role, highlight, row, col))
                    .collect()
            })
            .collect();
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&GridCell> {
        self.cells.get(row)?.get(col)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.iter().map(Vec::as_slice)
    }
}

fn layout_cell<P: Position>(
    position: &P,
    role: Role,
    highlight: Option<Square>,
    row: usize,
    col: usize,
) -> GridCell {
    if let Some(square) = cell_to_square(row, col, role) {
        return GridCell::Square {
            square,
            piece: position.piece_at(square),
            light: square.is_light(),
            highlighted: highlight == Some(square),
        };
    }
    match (row_to_rank(row, role), col) {
        (Some(rank), 0) => GridCell::RankLabel(char::from(b'1' + rank)),
        (None, 0) => GridCell::Corner,
        (_, col) => GridCell::FileLabel(char::from(b'a' + (col - 1) as u8)),
    }
}

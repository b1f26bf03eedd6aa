//! Translation between UI grid cells and model squares.
//!
//! The UI draws a 9×9 grid: column 0 is the rank-label gutter, row 8 is
//! the file-label row, and the remaining 8×8 block holds the squares.
//! Which rank lands on which row depends only on the local [`Role`]:
//!
//! ```text
//!          White                      Black
//!   row 0  8 | a8 b8 ... h8    row 0  1 | a1 b1 ... h1
//!   row 7  1 | a1 b1 ... h1    row 7  8 | a8 b8 ... h8
//!   row 8      a  b  ...  h    row 8      a  b  ...  h
//! ```
//!
//! Files are never mirrored. Everything here is a pure function of
//! `(row, col, role)`.

use gambit_protocol::Role;

use crate::{Square, BOARD_SIZE};

/// Rows in the UI grid (8 ranks + the file-label row).
pub const GRID_ROWS: usize = BOARD_SIZE as usize + 1;

/// Columns in the UI grid (the rank gutter + 8 files).
pub const GRID_COLS: usize = BOARD_SIZE as usize + 1;

/// Maps a UI row to the rank shown on it, or `None` for the label row.
pub fn row_to_rank(row: usize, role: Role) -> Option<u8> {
    let size = usize::from(BOARD_SIZE);
    if row >= size {
        return None;
    }
    let rank = match role {
        Role::White => size - row - 1,
        Role::Black => row,
    };
    Some(rank as u8)
}

/// Maps a UI cell to the square it shows, or `None` for gutter and
/// out-of-range cells.
pub fn cell_to_square(row: usize, col: usize, role: Role) -> Option<Square> {
    let rank = row_to_rank(row, role)?;
    if col == 0 || col > usize::from(BOARD_SIZE) {
        return None;
    }
    Square::new((col - 1) as u8, rank)
}

/// Maps a square back to the UI cell `(row, col)` that shows it.
pub fn square_to_cell(square: Square, role: Role) -> (usize, usize) {
    let size = usize::from(BOARD_SIZE);
    let rank = usize::from(square.rank());
    let row = match role {
        Role::White => size - rank - 1,
        Role::Black => rank,
    };
    (row, usize::from(square.file()) + 1)
}

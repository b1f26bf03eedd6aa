//! Board-side logic for Gambit.
//!
//! - [`Square`]: model coordinates (`a1` = 0).
//! - [`orientation`]: UI cell ↔ square mapping for the local [`Role`].
//! - [`Position`]: the seam to an external rules engine;
//!   [`ChessPosition`] implements it with `cozy-chess`.
//! - [`MoveSelector`]: the anchor/destination click gesture.
//! - [`BoardGrid`]: per-cell contents handed to the UI.
//!
//! [`Role`]: gambit_protocol::Role
//!
//! # Feature Flags
//!
//! - `cozy` (default): [`ChessPosition`].

#[cfg(feature = "cozy")]
mod chess;
mod error;
mod grid;
pub mod orientation;
mod position;
mod selection;
mod square;

#[cfg(feature = "cozy")]
pub use chess::ChessPosition;
pub use error::BoardError;
pub use grid::{BoardGrid, GridCell};
pub use orientation::{cell_to_square, square_to_cell};
pub use position::{Piece, PieceKind, Position};
pub use selection::{candidate_move, MoveSelector, Selection, SelectionOutcome};
pub use square::{Square, BOARD_SIZE};

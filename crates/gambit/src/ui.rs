//! The seam between the client core and whatever draws the screen.

use chrono::{DateTime, Utc};
use gambit_board::BoardGrid;
use gambit_protocol::ActionKind;

/// A front-end the client core can drive.
///
/// All methods are synchronous and are called from the reader task as well
/// as from the UI's own entry points, so implementations must be cheap and
/// internally synchronized. Nothing here should block on drawing:
/// [`request_redraw`](Ui::request_redraw) only asks for a repaint.
pub trait Ui: Send + Sync + 'static {
    /// Switch to the lobby view.
    fn show_lobby(&self);

    /// Switch to the game view.
    fn show_game(&self);

    fn set_status(&self, text: &str);

    /// Relabel the two option buttons.
    fn set_buttons(&self, primary: ActionKind, secondary: ActionKind);

    fn draw_board(&self, grid: &BoardGrid);

    fn append_chat(&self, author: &str, text: &str, sent_at: DateTime<Utc>);

    fn append_lobby_text(&self, text: &str);

    /// Schedule a repaint. Must not wait for it.
    fn request_redraw(&self);

    /// The connection is gone; shut the front-end down. Called exactly once.
    fn stop(&self);
}

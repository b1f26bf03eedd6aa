//! # Gambit
//!
//! Client core for terminal chess against a relay server.
//!
//! The server is authoritative: it validates moves, decides results and
//! relays offers between the two players. This crate keeps the local view
//! in step with it. It connects, frames and decodes messages, tracks the
//! board and the resign / draw / rematch negotiation, and drives any front
//! end that implements [`Ui`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gambit::prelude::*;
//!
//! // Implement Ui for your front end, then:
//! // let client: GameClient<ChessPosition, _, _> = GameClient::builder()
//! //     .server_addr("127.0.0.1:8080")
//! //     .connect(my_ui)
//! //     .await?;
//! // client.run().await
//! ```
//!
//! ## Crates
//!
//! | Layer | Crate |
//! |---|---|
//! | frames over TCP | [`transport`] |
//! | envelopes and messages | [`protocol`] |
//! | squares, orientation, rules seam | [`board`] |
//! | game session and negotiation | [`session`] |

mod client;
mod config;
mod error;
mod outbox;
mod ui;

pub use client::{GameClient, GameClientBuilder};
pub use config::{ClientConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_SERVER_ADDR};
pub use error::GambitError;
pub use outbox::Outbox;
pub use ui::Ui;

pub use gambit_board as board;
pub use gambit_protocol as protocol;
pub use gambit_session as session;
pub use gambit_transport as transport;

/// Everything a front end usually needs.
pub mod prelude {
    pub use crate::{ClientConfig, GambitError, GameClient, GameClientBuilder, Outbox, Ui};

    #[cfg(feature = "cozy")]
    pub use gambit_board::ChessPosition;
    pub use gambit_board::{
        square_to_cell, BoardGrid, GridCell, Piece, PieceKind, Position, Square,
    };
    pub use gambit_protocol::{
        ActionKind, ChatMessage, ConnectInfo, GameAction, GameUpdate,
        LobbyCommand, LobbyCommandKind, Message, Role, StatusMessage,
    };
    pub use gambit_session::{NegotiationState, OptionButton, SessionError};
    pub use gambit_transport::{Connection, LineConnection, TransportError};
}

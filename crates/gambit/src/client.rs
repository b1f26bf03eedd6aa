//! `GameClient` builder, the reader/writer pipeline, and message dispatch.
//!
//! ```text
//!  UI entry points ──┐                          ┌──→ Ui (status, board, chat)
//!                    ├─→ Outbox ─→ writer task ─┼──→ Connection::send
//!  dispatch effects ─┘                          │
//!  Connection::recv ─→ reader ─→ decode ─→ dispatch ─→ GameSession
//! ```
//!
//! All shared state lives in one `ClientState` behind an `Arc`. The game
//! session is the only part that changes after construction; it sits
//! behind an async mutex and is never held across an outbound send.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use gambit_board::Position;
use gambit_protocol::{
    decode_frame, encode_frame, open, ChatMessage, ConnectInfo, GameAction,
    GameUpdate, JsonCodec, LobbyCommand, LobbyCommandKind, Message,
    MoveMessage, PROTOCOL_VERSION,
};
use gambit_session::{
    parse_lobby_input, turn_status, Effect, GameSession, LobbyInput,
    OptionButton, SessionError, HELP_TEXT, WELCOME_TEXT,
};
use gambit_transport::{Connection, TcpConnection};
use tokio::sync::{mpsc, watch, Mutex};

use crate::{ClientConfig, GambitError, Outbox, Ui};

/// Shared client state passed to the reader and writer tasks and to every
/// UI entry point.
pub(crate) struct ClientState<P, U, C> {
    conn: C,
    codec: JsonCodec,
    ui: U,
    outbox: Outbox,
    outbound: Mutex<Option<mpsc::Receiver<Message>>>,
    session: Mutex<Option<GameSession<P>>>,
    torn_down: AtomicBool,
    shutdown: watch::Sender<bool>,
    version_warned: AtomicBool,
}

/// Builder for configuring and starting a [`GameClient`].
///
/// # Example
///
/// ```rust,ignore
/// use gambit::prelude::*;
///
/// let client: GameClient<ChessPosition, _, _> = GameClient::builder()
///     .server_addr("127.0.0.1:8080")
///     .connect(my_ui)
///     .await?;
/// client.run().await
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameClientBuilder {
    config: ClientConfig,
}

impl GameClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the relay server address.
    pub fn server_addr(mut self, addr: &str) -> Self {
        self.config.server_addr = addr.to_string();
        self
    }

    /// Sets the outbound queue capacity.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Sets the largest inbound frame accepted on connections dialed by
    /// [`connect`](Self::connect). [`build`](Self::build) takes its
    /// connection as already configured.
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.config.max_frame_len = len;
        self
    }

    /// Dials the configured server over TCP and builds the client.
    pub async fn connect<P, U>(
        self,
        ui: U,
    ) -> Result<GameClient<P, U, TcpConnection>, GambitError>
    where
        P: Position,
        U: Ui,
    {
        let conn = gambit_transport::connect(&self.config.server_addr)
            .await?
            .with_max_frame_len(self.config.max_frame_len);
        Ok(self.build(conn, ui))
    }

    /// Builds a client over an already-open connection.
    ///
    /// `max_frame_len` is not applied here; configure it on the
    /// connection (see `LineConnection::with_max_frame_len`).
    pub fn build<P, U, C>(self, conn: C, ui: U) -> GameClient<P, U, C>
    where
        P: Position,
        U: Ui,
        C: Connection,
    {
        let (outbox, outbound) = Outbox::channel(self.config.queue_capacity);
        let (shutdown, _) = watch::channel(false);
        let state = Arc::new(ClientState {
            conn,
            codec: JsonCodec,
            ui,
            outbox,
            outbound: Mutex::new(Some(outbound)),
            session: Mutex::new(None),
            torn_down: AtomicBool::new(false),
            shutdown,
            version_warned: AtomicBool::new(false),
        });
        GameClient { state }
    }
}

/// A chess client bound to one connection.
///
/// Cheap to clone: every clone drives the same connection and session, so
/// one clone can [`run`](Self::run) while the UI holds another for its
/// entry points.
pub struct GameClient<P, U, C> {
    state: Arc<ClientState<P, U, C>>,
}

impl<P, U, C> Clone for GameClient<P, U, C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl GameClient<(), (), ()> {
    /// Creates a new builder.
    pub fn builder() -> GameClientBuilder {
        GameClientBuilder::new()
    }
}

impl<P, U, C> GameClient<P, U, C>
where
    P: Position,
    U: Ui,
    C: Connection,
{
    /// Runs the client until the connection is torn down.
    ///
    /// Shows the lobby, spawns the writer task and reads inbound frames on
    /// the calling task. Returns once teardown has completed.
    pub async fn run(&self) -> Result<(), GambitError> {
        let Some(outbound) = self.state.outbound.lock().await.take() else {
            return Err(GambitError::AlreadyRunning);
        };
        let conn_id = self.state.conn.id();
        tracing::info!(%conn_id, "gambit client running");

        self.state.ui.show_lobby();
        self.state
            .ui
            .append_lobby_text(&format!("{WELCOME_TEXT}\n{HELP_TEXT}"));
        self.state.ui.request_redraw();

        let writer = tokio::spawn(write_loop(Arc::clone(&self.state), outbound));

        let mut shutdown = self.state.shutdown.subscribe();
        tokio::select! {
            () = self.state.read_loop() => {}
            _ = shutdown.wait_for(|down| *down) => {}
        }
        self.state.teardown().await;

        if let Err(e) = writer.await {
            tracing::error!(%conn_id, error = %e, "writer task failed");
        }
        tracing::info!(%conn_id, "gambit client stopped");
        Ok(())
    }

    /// Handle for enqueuing raw messages.
    pub fn outbox(&self) -> &Outbox {
        &self.state.outbox
    }

    /// Returns `true` once teardown has started.
    pub fn is_closed(&self) -> bool {
        self.state.torn_down.load(Ordering::Acquire)
    }

    /// Returns `true` while a game session exists.
    pub async fn in_game(&self) -> bool {
        self.state.session.lock().await.is_some()
    }

    /// Feeds one click on board cell `(row, col)` into the move gesture.
    ///
    /// A committed move is enqueued; a rejected one only resets the
    /// highlight. Gutter cells are ignored.
    pub async fn select_cell(
        &self,
        row: usize,
        col: usize,
    ) -> Result<(), GambitError> {
        use gambit_board::SelectionOutcome;

        let committed = {
            let mut guard = self.state.session.lock().await;
            let session = guard.as_mut().ok_or(SessionError::NoActiveGame)?;
            let Some(outcome) = session.select_cell(row, col) else {
                tracing::trace!(row, col, "click outside the board");
                return Ok(());
            };
            self.state.ui.draw_board(&session.grid());
            self.state.ui.request_redraw();
            match outcome {
                SelectionOutcome::Committed(algebraic) => Some(algebraic),
                _ => None,
            }
        };

        if let Some(algebraic) = committed {
            self.state.outbox.send(MoveMessage { algebraic }.into()).await?;
        }
        Ok(())
    }

    /// Handles a click on one of the two option buttons.
    pub async fn press(&self, button: OptionButton) -> Result<(), GambitError> {
        let effects = {
            let mut guard = self.state.session.lock().await;
            let session = guard.as_mut().ok_or(SessionError::NoActiveGame)?;
            let effects = session.negotiation_mut().press(button);
            self.state.show_buttons(session);
            effects
        };
        self.state.apply(effects).await
    }

    /// Sends a chat line. Blank lines are ignored.
    pub async fn submit_chat(&self, text: &str) -> Result<(), GambitError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let chat = ChatMessage {
            text: text.to_string(),
            author_name: String::new(),
            timestamp: Utc::now(),
        };
        self.state.outbox.send(chat.into()).await
    }

    /// Handles one line typed at the lobby prompt.
    pub async fn submit_lobby(&self, text: &str) -> Result<(), GambitError> {
        let input = parse_lobby_input(text);
        if let Some(reply) = input.local_reply() {
            self.state.ui.append_lobby_text(reply);
            self.state.ui.request_redraw();
        }
        match input {
            LobbyInput::Send(command) => {
                self.state.outbox.send(command.into()).await
            }
            LobbyInput::Exit => {
                self.state.teardown().await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Disconnects. No message is sent to the server.
    pub async fn exit(&self) {
        self.state.teardown().await;
    }

    /// Applies one inbound message as if it had just been read.
    pub async fn dispatch(&self, message: Message) {
        self.state.dispatch(message).await;
    }
}

impl<P, U, C> ClientState<P, U, C>
where
    P: Position,
    U: Ui,
    C: Connection,
{
    /// Reads frames until end of stream, a read error or an undecodable
    /// envelope, then tears down.
    async fn read_loop(&self) {
        let conn_id = self.conn.id();

        loop {
            let frame = match self.conn.recv().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!(%conn_id, "server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(%conn_id, error = %e, "receive failed");
                    break;
                }
            };

            let envelope = match decode_frame(&self.codec, &frame) {
                Ok(envelope) => envelope,
                Err(e) => {
                    tracing::error!(
                        %conn_id, error = %e, "failed to decode envelope"
                    );
                    break;
                }
            };

            if envelope.version != PROTOCOL_VERSION
                && !self.version_warned.swap(true, Ordering::Relaxed)
            {
                tracing::warn!(
                    %conn_id,
                    peer = envelope.version,
                    local = PROTOCOL_VERSION,
                    "protocol version mismatch"
                );
            }

            tracing::debug!(%conn_id, msg_type = %envelope.msg_type, "received message");
            match open(&self.codec, &envelope) {
                Ok(message) => self.dispatch(message).await,
                Err(e) => {
                    tracing::warn!(
                        %conn_id,
                        msg_type = %envelope.msg_type,
                        error = %e,
                        "dropping message"
                    );
                }
            }
        }

        self.teardown().await;
    }

    async fn dispatch(&self, message: Message) {
        match message {
            Message::ConnectInfo(info) => self.on_connect_info(&info).await,
            Message::GameUpdate(update) => self.on_game_update(&update).await,
            Message::Chat(chat) => {
                self.ui.append_chat(
                    &title_case(&chat.author_name),
                    &chat.text,
                    chat.timestamp,
                );
                self.ui.request_redraw();
            }
            Message::Status(status) => {
                self.ui.set_status(&status.text);
                self.ui.request_redraw();
            }
            Message::GameAction(action) => self.on_game_action(&action).await,
            Message::LobbyCommand(LobbyCommand {
                command: LobbyCommandKind::RawText,
                argument,
            }) => {
                self.ui.append_lobby_text(&argument);
                self.ui.request_redraw();
            }
            Message::LobbyCommand(command) => {
                tracing::debug!(command = ?command.command, "ignoring inbound lobby command");
            }
            Message::Move(mv) => {
                tracing::debug!(algebraic = %mv.algebraic, "ignoring inbound move");
            }
        }
    }

    async fn on_connect_info(&self, info: &ConnectInfo) {
        let session = match GameSession::<P>::start(info) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "dropping ConnectInfo");
                return;
            }
        };

        let mut guard = self.session.lock().await;
        self.ui.show_game();
        self.ui.set_status(session.turn_status());
        self.show_buttons(&session);
        self.ui.draw_board(&session.grid());
        self.ui.request_redraw();
        *guard = Some(session);
    }

    async fn on_game_update(&self, update: &GameUpdate) {
        let mut guard = self.session.lock().await;
        let Some(session) = guard.as_mut() else {
            tracing::warn!(error = %SessionError::NoActiveGame, "dropping GameUpdate");
            return;
        };
        if let Err(e) = session.apply_update(update) {
            tracing::warn!(error = %e, "dropping GameUpdate");
            return;
        }
        self.ui.set_status(turn_status(update.is_local_turn));
        self.show_buttons(session);
        self.ui.draw_board(&session.grid());
        self.ui.request_redraw();
    }

    async fn on_game_action(&self, action: &GameAction) {
        let effects = {
            let mut guard = self.session.lock().await;
            let Some(session) = guard.as_mut() else {
                tracing::debug!(action = ?action.action, "game action outside a game");
                return;
            };
            let effects = session.negotiation_mut().receive(action);
            self.show_buttons(session);
            effects
        };
        if let Err(e) = self.apply(effects).await {
            tracing::warn!(error = %e, "failed to apply game action");
        }
    }

    fn show_buttons(&self, session: &GameSession<P>) {
        let (primary, secondary) = session.negotiation().buttons();
        self.ui.set_buttons(primary, secondary);
    }

    /// Carries out negotiation effects. Must be called without the
    /// session lock held.
    async fn apply(&self, effects: Vec<Effect>) -> Result<(), GambitError> {
        for effect in effects {
            match effect {
                Effect::Send(kind) => {
                    self.outbox.send(GameAction::new(kind).into()).await?;
                }
                Effect::Status(text) => self.ui.set_status(&text),
                Effect::Disconnect => self.teardown().await,
            }
        }
        self.ui.request_redraw();
        Ok(())
    }

    /// Signals the writer, closes the connection, drops the session and
    /// stops the UI. Only the first call does anything, and none of it waits
    /// on the peer.
    async fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            return;
        }
        let conn_id = self.conn.id();
        tracing::info!(%conn_id, "tearing down connection");

        self.shutdown.send_replace(true);
        if let Err(e) = self.conn.close().await {
            tracing::debug!(%conn_id, error = %e, "close failed");
        }
        self.session.lock().await.take();
        self.ui.stop();
    }
}

/// Drains the outbox onto the connection until teardown or a send error.
async fn write_loop<P, U, C>(
    state: Arc<ClientState<P, U, C>>,
    mut outbound: mpsc::Receiver<Message>,
) where
    P: Position,
    U: Ui,
    C: Connection,
{
    let conn_id = state.conn.id();
    let mut shutdown = state.shutdown.subscribe();

    loop {
        let message = tokio::select! {
            biased;
            _ = shutdown.wait_for(|down| *down) => break,
            next = outbound.recv() => match next {
                Some(message) => message,
                None => break,
            },
        };

        let msg_type = message.msg_type();
        let frame = match encode_frame(&state.codec, &message) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(%conn_id, %msg_type, error = %e, "failed to encode message");
                state.teardown().await;
                break;
            }
        };

        // A peer that stopped reading must not keep teardown waiting.
        let sent = tokio::select! {
            biased;
            _ = shutdown.wait_for(|down| *down) => break,
            sent = state.conn.send(&frame) => sent,
        };
        if let Err(e) = sent {
            tracing::warn!(%conn_id, %msg_type, error = %e, "send failed");
            state.teardown().await;
            break;
        }
        tracing::debug!(%conn_id, %msg_type, "sent message");
    }

    tracing::debug!(%conn_id, "writer stopped");
}

/// Upper-cases the first letter of each word: `"ada lovelace"` →
/// `"Ada Lovelace"`.
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }
    out
}

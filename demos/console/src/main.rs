//! Line-based console front end for the gambit client.
//!
//! ```text
//! cargo run -p gambit-console -- --server 127.0.0.1:8080
//! ```
//!
//! In the lobby every line goes to the lobby prompt (`help` lists the
//! commands). In a game:
//!
//! - `e2`, then `e4`: select the anchor and destination squares
//! - `1` / `2`: press the primary / secondary option button
//! - `say <text>`: chat
//! - `exit`: disconnect
//!
//! Logs go to stderr; set `RUST_LOG=gambit=debug` for protocol traces.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, Utc};
use clap::Parser;
use gambit::prelude::*;
use gambit::transport::TcpConnection;
use tokio::sync::{mpsc, Notify};
use tracing_subscriber::EnvFilter;

/// Play chess against a relay server from the terminal.
#[derive(Parser, Debug)]
#[command(name = "gambit-console")]
#[command(version)]
struct Cli {
    /// Relay server address
    #[arg(short, long, default_value = gambit::DEFAULT_SERVER_ADDR)]
    server: String,

    /// Outbound queue capacity
    #[arg(long, default_value_t = gambit::DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,
}

// ---------------------------------------------------------------------------
// Console UI
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Screen {
    status: String,
    buttons: Option<(ActionKind, ActionKind)>,
    grid: Option<BoardGrid>,
}

#[derive(Clone, Default)]
struct ConsoleUi {
    screen: Arc<Mutex<Screen>>,
    redraw: Arc<Notify>,
    stopped: Arc<AtomicBool>,
}

impl ConsoleUi {
    fn with_screen<T>(&self, f: impl FnOnce(&mut Screen) -> T) -> Option<T> {
        self.screen.lock().ok().map(|mut screen| f(&mut screen))
    }

    /// Finds the grid cell showing `square` on the last drawn board.
    fn cell_of(&self, square: Square) -> Option<(usize, usize)> {
        self.with_screen(|screen| {
            let grid = screen.grid.as_ref()?;
            grid.rows().enumerate().find_map(|(row, cells)| {
                cells.iter().position(|cell| {
                    matches!(cell, GridCell::Square { square: s, .. } if *s == square)
                })
                .map(|col| (row, col))
            })
        })
        .flatten()
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Repaints the game view whenever a redraw was requested.
    async fn paint_loop(self) {
        while !self.is_stopped() {
            self.redraw.notified().await;
            if self.is_stopped() {
                break;
            }
            if let Some(frame) = self.with_screen(|screen| render(screen)) {
                print!("{frame}");
            }
        }
    }
}

impl Ui for ConsoleUi {
    fn show_lobby(&self) {
        println!("== lobby ==");
    }

    fn show_game(&self) {
        println!("== game ==");
    }

    fn set_status(&self, text: &str) {
        self.with_screen(|screen| screen.status = text.to_string());
    }

    fn set_buttons(&self, primary: ActionKind, secondary: ActionKind) {
        self.with_screen(|screen| screen.buttons = Some((primary, secondary)));
    }

    fn draw_board(&self, grid: &BoardGrid) {
        self.with_screen(|screen| screen.grid = Some(grid.clone()));
    }

    fn append_chat(&self, author: &str, text: &str, sent_at: DateTime<Utc>) {
        let at = sent_at.with_timezone(&Local).format("%H:%M");
        println!("[{at}] {author}: {text}");
    }

    fn append_lobby_text(&self, text: &str) {
        println!("{text}");
    }

    fn request_redraw(&self) {
        self.redraw.notify_one();
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.redraw.notify_one();
        println!("Disconnected.");
    }
}

fn render(screen: &Screen) -> String {
    let mut out = String::new();
    if let Some(grid) = &screen.grid {
        for row in grid.rows() {
            for cell in row {
                match cell {
                    GridCell::RankLabel(c) => out.push_str(&format!("{c} ")),
                    GridCell::FileLabel(c) => out.push_str(&format!(" {c} ")),
                    GridCell::Corner => out.push_str("  "),
                    GridCell::Square {
                        piece,
                        light,
                        highlighted,
                        ..
                    } => {
                        let empty = if *light { '.' } else { ':' };
                        let glyph = piece.map_or(empty, Piece::symbol);
                        if *highlighted {
                            out.push_str(&format!("[{glyph}]"));
                        } else {
                            out.push_str(&format!(" {glyph} "));
                        }
                    }
                }
            }
            out.push('\n');
        }
    }
    if !screen.status.is_empty() {
        out.push_str(&format!("{}\n", screen.status));
    }
    if let Some((primary, secondary)) = screen.buttons {
        out.push_str(&format!("[1] {primary}   [2] {secondary}\n"));
    }
    out
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Reads stdin on a plain thread so a pending read never holds up runtime
/// shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

type ConsoleClient = GameClient<ChessPosition, ConsoleUi, TcpConnection>;

async fn handle_line(
    client: &ConsoleClient,
    ui: &ConsoleUi,
    line: &str,
) -> Result<(), GambitError> {
    let line = line.trim();
    if !client.in_game().await {
        return client.submit_lobby(line).await;
    }

    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    match head {
        "" => Ok(()),
        "1" => client.press(OptionButton::Primary).await,
        "2" => client.press(OptionButton::Secondary).await,
        "say" => client.submit_chat(rest).await,
        "exit" | "quit" => {
            client.exit().await;
            Ok(())
        }
        word => {
            let square: Square = word.parse()?;
            match ui.cell_of(square) {
                Some((row, col)) => client.select_cell(row, col).await,
                None => Ok(()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!(server = %cli.server, "connecting");

    let ui = ConsoleUi::default();
    let client: ConsoleClient = GameClient::builder()
        .server_addr(&cli.server)
        .queue_capacity(cli.queue_capacity)
        .connect(ui.clone())
        .await?;

    let runner = client.clone();
    let mut run = tokio::spawn(async move { runner.run().await });
    tokio::spawn(ui.clone().paint_loop());
    let mut lines = spawn_stdin_reader();

    loop {
        tokio::select! {
            result = &mut run => {
                result??;
                break;
            }
            line = lines.recv() => match line {
                Some(line) => {
                    if let Err(e) = handle_line(&client, &ui, &line).await {
                        tracing::debug!(error = %e, "command rejected");
                        println!("{e}");
                    }
                }
                None => {
                    client.exit().await;
                    (&mut run).await??;
                    break;
                }
            },
        }
    }

    Ok(())
}

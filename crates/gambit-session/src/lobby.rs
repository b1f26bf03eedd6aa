//! Parsing of the line typed into the lobby prompt.
//!
//! Only `ls`, `join`, `create` and `callme` produce traffic. The rest is
//! handled locally by whoever owns the lobby view.

use gambit_protocol::{LobbyCommand, LobbyCommandKind};

/// The command list printed by `help` and on first entering the lobby.
pub const HELP_TEXT: &str = "\
Commands:
  ls              list open games
  join [code]     join a game (leave blank to join at random)
  create [code]   create a game with an optional code name
  callme <name>   set your display name
  help            show this list
  about           about gambit
  exit            quit";

pub const WELCOME_TEXT: &str = "Welcome to gambit!";

pub const ABOUT_TEXT: &str =
    "gambit: a terminal chess client for a relay server. Moves are checked locally, the server decides the game.";

pub const MISSING_NAME_TEXT: &str = "Please provide your name after callme";

pub const INVALID_TEXT: &str = "Invalid command. Try help";

/// What a lobby line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyInput {
    /// Send this command to the server.
    Send(LobbyCommand),
    /// Show [`HELP_TEXT`].
    Help,
    /// Show [`ABOUT_TEXT`].
    About,
    /// Disconnect.
    Exit,
    /// `callme` without a name; show [`MISSING_NAME_TEXT`].
    MissingName,
    /// Unrecognised input; show [`INVALID_TEXT`].
    Invalid,
}

impl LobbyInput {
    /// Text to append to the lobby log locally, if any.
    pub fn local_reply(&self) -> Option<&'static str> {
        match self {
            Self::Help => Some(HELP_TEXT),
            Self::About => Some(ABOUT_TEXT),
            Self::MissingName => Some(MISSING_NAME_TEXT),
            Self::Invalid => Some(INVALID_TEXT),
            Self::Send(_) | Self::Exit => None,
        }
    }
}

/// Parses one submitted lobby line. Case-insensitive; extra words after
/// `join`, `create` and `callme` are joined with `_`.
pub fn parse_lobby_input(text: &str) -> LobbyInput {
    let line = text.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return LobbyInput::Invalid;
    };
    let argument = words.collect::<Vec<_>>().join("_");

    let command = match head {
        "ls" => LobbyCommandKind::List,
        "join" => LobbyCommandKind::Join,
        "create" => LobbyCommandKind::Create,
        "callme" if argument.is_empty() => return LobbyInput::MissingName,
        "callme" => LobbyCommandKind::SetName,
        "help" => return LobbyInput::Help,
        "about" => return LobbyInput::About,
        "exit" => return LobbyInput::Exit,
        _ => return LobbyInput::Invalid,
    };

    let argument = match command {
        LobbyCommandKind::List => String::new(),
        _ => argument,
    };
    LobbyInput::Send(LobbyCommand { command, argument })
}

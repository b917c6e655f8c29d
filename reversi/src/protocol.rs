use std::str::FromStr;

use crate::MalformedMessage;

/// A single line of the wire protocol between the server and a player.
///
/// Lines consist of a keyword followed by space-separated integer arguments,
/// e.g. `MOVE 2 3`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Server to player: the session is established on a board of this size.
    ///
    /// Always the first line a player receives.
    Connect { rows: u32, cols: u32 },
    /// Server to player: it's your turn, reply with a [`Message::Move`].
    MakeMove,
    /// Player to server: place a disc here.
    Move { row: u32, col: u32 },
    /// Server to player: a validated move was made by either player.
    ///
    /// Sent to both players, including the one who made the move.
    MoveMade { row: u32, col: u32 },
    GameWon,
    GameLost,
    GameTied,
    /// Server to player: the session was aborted, disconnect.
    Error,
}

pub const CONNECT: &str = "CONNECT";
pub const MAKE_MOVE: &str = "MAKE_MOVE";
pub const MOVE: &str = "MOVE";
pub const MOVE_MADE: &str = "MOVE_MADE";
pub const GAME_WON: &str = "GAME_WON";
pub const GAME_LOST: &str = "GAME_LOST";
pub const GAME_TIED: &str = "GAME_TIED";
pub const ERROR: &str = "ERROR";

impl Message {
    pub fn keyword(&self) -> &'static str {
        match self {
            Message::Connect { .. } => CONNECT,
            Message::MakeMove => MAKE_MOVE,
            Message::Move { .. } => MOVE,
            Message::MoveMade { .. } => MOVE_MADE,
            Message::GameWon => GAME_WON,
            Message::GameLost => GAME_LOST,
            Message::GameTied => GAME_TIED,
            Message::Error => ERROR,
        }
    }

    /// Serializes the message, without the trailing newline.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parses one line, ignoring surrounding whitespace and the line terminator.
    ///
    /// Only the shape of the line is checked. Whether a move is on the board
    /// is up to the game.
    pub fn decode(line: &str) -> Result<Self, MalformedMessage> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().ok_or(MalformedMessage::Empty)?;
        let args: Vec<&str> = tokens.collect();

        let (keyword, arity): (&'static str, usize) = match keyword {
            CONNECT => (CONNECT, 2),
            MAKE_MOVE => (MAKE_MOVE, 0),
            MOVE => (MOVE, 2),
            MOVE_MADE => (MOVE_MADE, 2),
            GAME_WON => (GAME_WON, 0),
            GAME_LOST => (GAME_LOST, 0),
            GAME_TIED => (GAME_TIED, 0),
            ERROR => (ERROR, 0),
            other => return Err(MalformedMessage::UnknownKeyword(String::from(other))),
        };
        if args.len() != arity {
            return Err(MalformedMessage::WrongArgumentCount {
                keyword,
                expected: arity,
                found: args.len(),
            });
        }

        let int_arg = |idx: usize| -> Result<u32, MalformedMessage> {
            args[idx]
                .parse::<u32>()
                .map_err(|_| MalformedMessage::InvalidInteger {
                    keyword,
                    token: String::from(args[idx]),
                })
        };

        let msg = match keyword {
            CONNECT => Message::Connect {
                rows: int_arg(0)?,
                cols: int_arg(1)?,
            },
            MAKE_MOVE => Message::MakeMove,
            MOVE => Message::Move {
                row: int_arg(0)?,
                col: int_arg(1)?,
            },
            MOVE_MADE => Message::MoveMade {
                row: int_arg(0)?,
                col: int_arg(1)?,
            },
            GAME_WON => Message::GameWon,
            GAME_LOST => Message::GameLost,
            GAME_TIED => Message::GameTied,
            _ => Message::Error,
        };
        Ok(msg)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Message::Connect { rows, cols } => write!(f, "{} {} {}", CONNECT, rows, cols),
            Message::Move { row, col } => write!(f, "{} {} {}", MOVE, row, col),
            Message::MoveMade { row, col } => write!(f, "{} {} {}", MOVE_MADE, row, col),
            _ => write!(f, "{}", self.keyword()),
        }
    }
}

impl FromStr for Message {
    type Err = MalformedMessage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::decode(s)
    }
}

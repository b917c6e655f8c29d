use crate::{Side, MAX_DIMENSION, MIN_DIMENSION};

/// The error type for [`Reversi::new()`](crate::Reversi::new).
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidBoardSize {
    pub rows: u32,
    pub cols: u32,
}

impl std::error::Error for InvalidBoardSize {}

impl std::fmt::Display for InvalidBoardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A {}x{} board is not supported, both dimensions must be even and between {} and {}",
            self.rows, self.cols, MIN_DIMENSION, MAX_DIMENSION
        )
    }
}

/// The error type for [`Reversi::make_move()`](crate::Reversi::make_move), i.e. for placing a single disc.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    OutOfBounds { row: u32, col: u32 },
    Occupied { row: u32, col: u32, by: Side },
    NoCapture { row: u32, col: u32 },
    GameOver,
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::OutOfBounds { row, col } => write!(
                f,
                "Disc was placed at ({}, {}), which is outside of the board",
                row, col
            ),
            IllegalMove::Occupied { row, col, by } => write!(
                f,
                "Disc was placed at ({}, {}), which is already taken by the {} player",
                row, col, by
            ),
            IllegalMove::NoCapture { row, col } => write!(
                f,
                "Disc placed at ({}, {}) does not capture any of the opponent's discs",
                row, col
            ),
            IllegalMove::GameOver => write!(f, "The game is already over"),
        }
    }
}

/// The error type for [`Message::decode()`](crate::Message::decode).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MalformedMessage {
    Empty,
    /// The line is not valid UTF-8.
    InvalidEncoding,
    /// The line did not end within `limit` bytes.
    TooLong {
        limit: usize,
    },
    UnknownKeyword(String),
    WrongArgumentCount {
        keyword: &'static str,
        expected: usize,
        found: usize,
    },
    InvalidInteger {
        keyword: &'static str,
        token: String,
    },
}

impl std::error::Error for MalformedMessage {}

impl std::fmt::Display for MalformedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedMessage::Empty => write!(f, "Received an empty line"),
            MalformedMessage::InvalidEncoding => write!(f, "Received a line that is not UTF-8"),
            MalformedMessage::TooLong { limit } => {
                write!(f, "Received a line longer than {} bytes", limit)
            }
            MalformedMessage::UnknownKeyword(keyword) => {
                write!(f, "Unknown command keyword '{}'", keyword)
            }
            MalformedMessage::WrongArgumentCount {
                keyword,
                expected,
                found,
            } => write!(
                f,
                "{} takes {} arguments, but {} were given",
                keyword, expected, found
            ),
            MalformedMessage::InvalidInteger { keyword, token } => write!(
                f,
                "Argument '{}' of {} is not a non-negative integer",
                token, keyword
            ),
        }
    }
}

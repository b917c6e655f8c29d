use std::io;

use reversi::{IllegalMove, MalformedMessage, Message, Side};

/// Error type for one operation on a [`PlayerChannel`](crate::PlayerChannel).
#[derive(Debug)]
pub enum ChannelError {
    /// The player disconnected, or the channel was already closed.
    Closed,
    /// The player did not answer within the move timeout.
    TimedOut,
    Io(io::Error),
    Malformed(MalformedMessage),
    /// A well-formed line that is not a valid reply at this point.
    UnexpectedMessage(Message),
}

impl ChannelError {
    /// Did the player break the protocol, as opposed to the connection failing?
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            ChannelError::Malformed(_) | ChannelError::UnexpectedMessage(_)
        )
    }
}

impl From<io::Error> for ChannelError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            // A read timeout shows up as either of these, depending on the platform.
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ChannelError::TimedOut,
            io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof => ChannelError::Closed,
            _ => ChannelError::Io(err),
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChannelError::Io(err) => Some(err),
            ChannelError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Closed => write!(f, "The connection is closed"),
            ChannelError::TimedOut => write!(f, "The player did not respond in time"),
            ChannelError::Io(_) => write!(f, "Reading from or writing to the connection failed"),
            ChannelError::Malformed(_) => write!(f, "The player sent a malformed line"),
            ChannelError::UnexpectedMessage(msg) => {
                write!(f, "Expected a {} line, but got '{}'", reversi::MOVE, msg)
            }
        }
    }
}

/// Error type for [`Session::run()`](crate::Session::run).
///
/// Every variant aborts the whole session.
#[derive(Debug)]
pub enum SessionError {
    Channel {
        side: Side,
        err: ChannelError,
    },
    IllegalMove {
        side: Side,
        row: u32,
        col: u32,
        err: IllegalMove,
    },
    AlreadyRun,
}

impl SessionError {
    /// The player whose connection or move caused the abort, if any.
    pub fn culprit(&self) -> Option<Side> {
        match self {
            SessionError::Channel { side, .. } | SessionError::IllegalMove { side, .. } => {
                Some(*side)
            }
            SessionError::AlreadyRun => None,
        }
    }

    /// Did a player break the rules or the protocol, as opposed to their
    /// connection failing?
    pub fn is_protocol_violation(&self) -> bool {
        match self {
            SessionError::Channel { err, .. } => err.is_protocol_violation(),
            SessionError::IllegalMove { .. } => true,
            SessionError::AlreadyRun => false,
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Channel { err, .. } => Some(err),
            SessionError::IllegalMove { err, .. } => Some(err),
            SessionError::AlreadyRun => None,
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Channel { side, .. } => {
                write!(f, "Communication with the {} player failed", side)
            }
            SessionError::IllegalMove { side, row, col, .. } => write!(
                f,
                "The {} player made an illegal move at ({}, {})",
                side, row, col
            ),
            SessionError::AlreadyRun => write!(f, "The session has already been played"),
        }
    }
}

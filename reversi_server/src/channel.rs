use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use reversi::{MalformedMessage, Message, Side};
use tracing::{debug, trace};

use crate::{ChannelError, Outcome};

/// Longest line a player may send, including the newline.
pub const MAX_LINE_LENGTH: usize = 1024;

/// The connection to one player, as seen by the session.
///
/// The connection is released on [`Self::close()`] or when the channel is
/// dropped, whichever comes first. After that, every operation fails with
/// [`ChannelError::Closed`] without touching the connection.
pub struct PlayerChannel<R: BufRead = BufReader<TcpStream>, W: Write = TcpStream> {
    side: Side,
    /// `None` once the channel is closed.
    io: Option<(R, W)>,
    connected_sent: bool,
    move_timeout: Option<Duration>,
    /// Handle for shortening the socket's read timeout as the deadline nears.
    socket: Option<TcpStream>,
    // A re-usable buffer for reading lines.
    // Should always be empty before and after receive().
    buf: Vec<u8>,
}

impl PlayerChannel {
    /// Wraps an accepted connection.
    ///
    /// With a `move_timeout`, a player who takes longer than that to answer a
    /// move request makes [`Self::prompt_move()`] fail with [`ChannelError::TimedOut`].
    pub fn from_tcp(
        side: Side,
        stream: TcpStream,
        move_timeout: Option<Duration>,
    ) -> io::Result<Self> {
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        let socket = stream.try_clone()?;
        let mut channel = Self::new(side, reader, stream).with_move_timeout(move_timeout);
        channel.socket = Some(socket);
        Ok(channel)
    }
}

impl<R: BufRead, W: Write> PlayerChannel<R, W> {
    pub fn new(side: Side, reader: R, writer: W) -> Self {
        Self {
            side,
            io: Some((reader, writer)),
            connected_sent: false,
            move_timeout: None,
            socket: None,
            buf: Vec::new(),
        }
    }

    /// Limits the time from a move request to the end of the reply line.
    ///
    /// Without a socket underneath, a single blocking read can't be cut short,
    /// so the deadline is only checked between reads.
    pub fn with_move_timeout(mut self, move_timeout: Option<Duration>) -> Self {
        self.move_timeout = move_timeout;
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_closed(&self) -> bool {
        self.io.is_none()
    }

    /// Announces the board size. Only the first call sends anything.
    pub fn send_connected(&mut self, rows: u32, cols: u32) -> Result<(), ChannelError> {
        if self.connected_sent {
            return Ok(());
        }
        self.send(Message::Connect { rows, cols })?;
        self.connected_sent = true;
        Ok(())
    }

    /// Asks the player for a move and blocks until the reply arrives or the
    /// move timeout runs out.
    pub fn prompt_move(&mut self) -> Result<(u32, u32), ChannelError> {
        self.send(Message::MakeMove)?;
        let deadline = self.move_timeout.map(|timeout| Instant::now() + timeout);
        match self.receive(deadline)? {
            Message::Move { row, col } => Ok((row, col)),
            other => Err(ChannelError::UnexpectedMessage(other)),
        }
    }

    pub fn notify_move_made(&mut self, row: u32, col: u32) -> Result<(), ChannelError> {
        self.send(Message::MoveMade { row, col })
    }

    /// Tells the player whether they won, lost or tied.
    pub fn notify_outcome(&mut self, outcome: Outcome) -> Result<(), ChannelError> {
        self.send(outcome.message_for(self.side))
    }

    pub fn notify_error(&mut self) -> Result<(), ChannelError> {
        self.send(Message::Error)
    }

    /// Releases the connection. Calling this again does nothing.
    pub fn close(&mut self) {
        if let Some((_reader, mut writer)) = self.io.take() {
            if let Err(err) = writer.flush() {
                debug!(player = %self.side, %err, "Flushing the connection failed");
            }
            self.socket = None;
            debug!(player = %self.side, "Closed connection");
        }
    }

    fn send(&mut self, msg: Message) -> Result<(), ChannelError> {
        let (_, writer) = self.io.as_mut().ok_or(ChannelError::Closed)?;
        trace!(name: "Sending", player = %self.side, line = %msg);
        writeln!(writer, "{}", msg)?;
        writer.flush()?;
        Ok(())
    }

    fn receive(&mut self, deadline: Option<Instant>) -> Result<Message, ChannelError> {
        self.buf.clear();
        let result = self.read_line(deadline).and_then(|()| {
            let line = std::str::from_utf8(&self.buf)
                .map_err(|_| ChannelError::Malformed(MalformedMessage::InvalidEncoding))?
                .trim_end();
            trace!(name: "Received", player = %self.side, line);
            Message::decode(line).map_err(ChannelError::Malformed)
        });
        self.buf.clear();
        result
    }

    /// Reads up to and including the next newline into `self.buf`.
    ///
    /// A line cut off by the end of the stream still counts as a line.
    fn read_line(&mut self, deadline: Option<Instant>) -> Result<(), ChannelError> {
        let (reader, _) = self.io.as_mut().ok_or(ChannelError::Closed)?;
        loop {
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(ChannelError::TimedOut);
                }
                if let Some(socket) = &self.socket {
                    socket.set_read_timeout(Some(remaining))?;
                }
            }

            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            if available.is_empty() {
                // 0 bytes read means EOF - the player has disconnected.
                return if self.buf.is_empty() {
                    Err(ChannelError::Closed)
                } else {
                    Ok(())
                };
            }

            let (used, done) = match available.iter().position(|&byte| byte == b'\n') {
                Some(idx) => (idx + 1, true),
                None => (available.len(), false),
            };
            if self.buf.len() + used > MAX_LINE_LENGTH {
                return Err(ChannelError::Malformed(MalformedMessage::TooLong {
                    limit: MAX_LINE_LENGTH,
                }));
            }
            self.buf.extend_from_slice(&available[..used]);
            reader.consume(used);
            if done {
                return Ok(());
            }
        }
    }
}

impl<R: BufRead, W: Write> Drop for PlayerChannel<R, W> {
    fn drop(&mut self) {
        self.close();
    }
}

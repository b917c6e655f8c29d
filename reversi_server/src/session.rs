use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use reversi::{Message, Side, Winner};
use tracing::{debug, info, warn};

use crate::{ChannelError, GameModel, PlayerChannel, SessionError};

/// The result of a finished game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    FirstWins,
    SecondWins,
    Tie,
}

impl From<Winner> for Outcome {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::First => Outcome::FirstWins,
            Winner::Second => Outcome::SecondWins,
            Winner::None => Outcome::Tie,
        }
    }
}

impl Outcome {
    /// The result line the given player receives.
    pub fn message_for(self, side: Side) -> Message {
        match (self, side) {
            (Outcome::Tie, _) => Message::GameTied,
            (Outcome::FirstWins, Side::First) | (Outcome::SecondWins, Side::Second) => {
                Message::GameWon
            }
            _ => Message::GameLost,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    AwaitingConnections,
    Announcing,
    InProgress,
    Terminating(Outcome),
    Error,
    Closed,
}

/// One game between two connected players.
///
/// The session owns both channels and the model. It runs on the caller's
/// thread, so separate sessions can run in parallel without sharing anything.
pub struct Session<M, R: BufRead = BufReader<TcpStream>, W: Write = TcpStream> {
    model: M,
    /// Index 0 connected first and moves first.
    players: [PlayerChannel<R, W>; 2],
    move_count: usize,
    state: SessionState,
}

impl<M: GameModel, R: BufRead, W: Write> Session<M, R, W> {
    pub fn new(model: M, players: [PlayerChannel<R, W>; 2]) -> Self {
        debug_assert_eq!(players[0].side(), Side::First);
        debug_assert_eq!(players[1].side(), Side::Second);
        Self {
            model,
            players,
            move_count: 0,
            state: SessionState::AwaitingConnections,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The number of accepted moves so far.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Plays the game to the end.
    ///
    /// On success, both players have been told the result. On error, both
    /// players have been sent `ERROR` as far as their connections allow.
    /// Either way, both channels are closed when this returns.
    pub fn run(&mut self) -> Result<Outcome, SessionError> {
        if self.state != SessionState::AwaitingConnections {
            return Err(SessionError::AlreadyRun);
        }
        let result = self.play();
        if let Err(err) = &result {
            let violation = err.is_protocol_violation();
            warn!(%err, violation, move_count = self.move_count, "Aborting session");
            self.transition(SessionState::Error);
            self.abort();
        }
        for player in &mut self.players {
            player.close();
        }
        self.transition(SessionState::Closed);
        result
    }

    fn play(&mut self) -> Result<Outcome, SessionError> {
        self.transition(SessionState::Announcing);
        let (rows, cols) = self.model.dimensions();
        for player in &mut self.players {
            let side = player.side();
            player
                .send_connected(rows, cols)
                .map_err(|err| SessionError::Channel { side, err })?;
        }

        self.transition(SessionState::InProgress);
        while !self.model.is_over() {
            self.play_turn()?;
        }

        let outcome = Outcome::from(self.model.winner());
        self.transition(SessionState::Terminating(outcome));
        info!(?outcome, move_count = self.move_count, "Game over");
        for player in &mut self.players {
            // The game is decided at this point, so a player who can't be
            // told the result doesn't affect the other one.
            if let Err(err) = player.notify_outcome(outcome) {
                warn!(player = %player.side(), %err, "Could not send the result");
            }
        }
        Ok(outcome)
    }

    fn play_turn(&mut self) -> Result<(), SessionError> {
        let side = Side::from_parity(self.move_count);
        let (row, col) = self.players[side.index()]
            .prompt_move()
            .map_err(|err| SessionError::Channel { side, err })?;
        self.model
            .apply_move(row, col)
            .map_err(|err| SessionError::IllegalMove {
                side,
                row,
                col,
                err,
            })?;
        self.move_count += 1;
        debug!(player = %side, row, col, move_count = self.move_count, "Move accepted");

        for player in &mut self.players {
            let side = player.side();
            player
                .notify_move_made(row, col)
                .map_err(|err| SessionError::Channel { side, err })?;
        }
        Ok(())
    }

    /// Best-effort `ERROR` to both players.
    fn abort(&mut self) {
        for player in &mut self.players {
            match player.notify_error() {
                Ok(()) | Err(ChannelError::Closed) => {}
                Err(err) => warn!(player = %player.side(), %err, "Could not send the error"),
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "Session state change");
        self.state = next;
    }
}

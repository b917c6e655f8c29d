use std::net::{SocketAddr, TcpListener};

use reversi::{Reversi, Side};
use tracing::{info, warn};

use crate::{GameModel, Outcome, PlayerChannel, ServerConfig, Session, SessionError};

#[derive(Debug)]
pub enum SessionResult {
    Finished(Outcome),
    Aborted(SessionError),
}

/// Tally over all sessions hosted by one [`Listener`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MatchScore {
    /// Indexed by [`Side::index()`].
    pub wins: [usize; 2],
    pub ties: usize,
    pub aborted: usize,
}

impl MatchScore {
    pub fn record(&mut self, result: &SessionResult) {
        match result {
            SessionResult::Finished(Outcome::FirstWins) => self.wins[0] += 1,
            SessionResult::Finished(Outcome::SecondWins) => self.wins[1] += 1,
            SessionResult::Finished(Outcome::Tie) => self.ties += 1,
            SessionResult::Aborted(_) => self.aborted += 1,
        }
    }
}

impl std::fmt::Display for MatchScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "End result:\n- {} wins by the first player\n- {} wins by the second player\n- {} ties\n- {} aborted",
            self.wins[0], self.wins[1], self.ties, self.aborted
        )
    }
}

/// Accepts players two at a time and hosts one game per pair.
pub struct Listener {
    listener: TcpListener,
    config: ServerConfig,
}

impl Listener {
    pub fn bind(config: ServerConfig) -> anyhow::Result<Self> {
        // Fail before anyone connects if the board can't be built
        Reversi::new(config.rows, config.cols)?;
        let listener = TcpListener::bind((config.host.as_str(), config.port))?;
        info!(addr = %listener.local_addr()?, rows = config.rows, cols = config.cols, "Server initialized");
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Blocks until two players have connected. The first one to connect moves first.
    pub fn accept_players(&self) -> anyhow::Result<[PlayerChannel; 2]> {
        let mut first = self.accept_player(Side::First)?;
        match self.accept_player(Side::Second) {
            Ok(second) => Ok([first, second]),
            Err(err) => {
                // The first player is already waiting for a game that won't happen
                if let Err(notify_err) = first.notify_error() {
                    warn!(player = %first.side(), err = %notify_err, "Could not send the error");
                }
                Err(err)
            }
        }
    }

    /// Hosts one game on a fresh board.
    pub fn serve_session(&self) -> anyhow::Result<SessionResult> {
        let model = Reversi::new(self.config.rows, self.config.cols)?;
        self.serve_session_with(model)
    }

    /// Hosts one game with the given rules.
    ///
    /// Returns an error only if accepting the players fails, not when the
    /// session is aborted.
    pub fn serve_session_with<M: GameModel>(&self, model: M) -> anyhow::Result<SessionResult> {
        let players = self.accept_players()?;
        info!("Both players connected, starting the game");
        let mut session = Session::new(model, players);
        let result = match session.run() {
            Ok(outcome) => SessionResult::Finished(outcome),
            Err(err) => {
                log_error_chain(&err);
                SessionResult::Aborted(err)
            }
        };
        Ok(result)
    }

    /// Hosts games until the configured number of sessions is reached.
    ///
    /// A session that can't even start, e.g. because accepting a player
    /// failed, counts as aborted and does not stop the server.
    pub fn serve(&self) -> MatchScore {
        run_sessions(self.config.num_sessions, || self.serve_session())
    }

    fn accept_player(&self, side: Side) -> anyhow::Result<PlayerChannel> {
        info!(player = %side, "Waiting for player to connect");
        let (stream, addr) = self.listener.accept()?;
        info!(player = %side, %addr, "Player connected");
        Ok(PlayerChannel::from_tcp(
            side,
            stream,
            self.config.move_timeout(),
        )?)
    }
}

fn run_sessions(
    num_sessions: usize,
    mut serve_session: impl FnMut() -> anyhow::Result<SessionResult>,
) -> MatchScore {
    let mut score = MatchScore::default();
    let mut session_idx = 0;
    while num_sessions == 0 || session_idx < num_sessions {
        match serve_session() {
            Ok(result) => score.record(&result),
            Err(err) => {
                warn!("Could not start session: {:#}", err);
                score.aborted += 1;
            }
        }
        session_idx += 1;
        info!(session_idx, "Session ended");
    }
    score
}

fn log_error_chain(err: &SessionError) {
    let mut err_dyn = err as &dyn std::error::Error;
    while let Some(src_err) = err_dyn.source() {
        warn!("{}", err_dyn);
        err_dyn = src_err;
    }
    warn!("{}", err_dyn);
}

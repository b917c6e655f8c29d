use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use anyhow::{anyhow, bail};
use reversi::{visualize_board, Message, Reversi};
use tracing::{debug, trace};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// How a game ended, from the bot's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    Won,
    Lost,
    Tied,
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Won => write!(f, "won"),
            GameResult::Lost => write!(f, "lost"),
            GameResult::Tied => write!(f, "tied"),
        }
    }
}

/// A trait to simplify writing bots.
pub trait Bot {
    /// Called when the server announces the board.
    fn new_game(&mut self, _rows: u32, _cols: u32) {}

    /// Picks a move for the side whose turn it is on `board`.
    ///
    /// Only called when the server asks for a move.
    fn choose_move(&mut self, board: &Reversi) -> (u32, u32);

    fn game_finished(&mut self, _result: GameResult, _board: &Reversi) {}

    /// Connects to a server and plays one game.
    fn connect(&mut self, host: &str, port: u16) -> anyhow::Result<GameResult> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        self.run(reader, stream)
    }

    /// Plays one game over an established connection.
    ///
    /// The local board is only ever changed by `MOVE_MADE` lines, so it
    /// always matches the server's, whatever this bot asked for.
    fn run<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> anyhow::Result<GameResult> {
        let mut board: Option<Reversi> = None;
        let mut buf = String::new();

        loop {
            // Read the next line into buf
            buf.clear(); // because read_line() appends to the buffer
            let num_bytes_read = reader.read_line(&mut buf)?;
            if num_bytes_read == 0 {
                bail!("The server closed the connection before the game ended");
            }
            trace!(name: "Received", line = buf.trim_end());

            let result = match Message::decode(&buf)? {
                Message::Connect { rows, cols } => {
                    board = Some(Reversi::new(rows, cols)?);
                    self.new_game(rows, cols);
                    continue;
                }
                Message::MakeMove => {
                    let board = board
                        .as_ref()
                        .ok_or_else(|| anyhow!("Asked for a move before the game started"))?;
                    let (row, col) = self.choose_move(board);
                    let reply = Message::Move { row, col };
                    trace!(name: "Sending", line = %reply);
                    writeln!(writer, "{}", reply)?;
                    writer.flush()?;
                    continue;
                }
                Message::MoveMade { row, col } => {
                    let board = board
                        .as_mut()
                        .ok_or_else(|| anyhow!("Received a move before the game started"))?;
                    board.make_move(row, col)?;
                    debug!("\n{}", visualize_board(board));
                    continue;
                }
                Message::GameWon => GameResult::Won,
                Message::GameLost => GameResult::Lost,
                Message::GameTied => GameResult::Tied,
                Message::Error => bail!("The server aborted the game"),
                msg @ Message::Move { .. } => bail!("Unexpected line from the server: {}", msg),
            };

            let board = board.ok_or_else(|| anyhow!("The game ended before it started"))?;
            self.game_finished(result, &board);
            break Ok(result);
        }
    }
}

/// Logs to stderr, since stdout may be used for other output.
pub fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Always plays the first legal move and remembers what it saw.
    #[derive(Default)]
    struct FirstMoveBot {
        board_size: Option<(u32, u32)>,
        chosen: Vec<(u32, u32)>,
        final_board: Option<Reversi>,
    }

    impl Bot for FirstMoveBot {
        fn new_game(&mut self, rows: u32, cols: u32) {
            self.board_size = Some((rows, cols));
        }

        fn choose_move(&mut self, board: &Reversi) -> (u32, u32) {
            let mv = board.legal_moves()[0];
            self.chosen.push(mv);
            mv
        }

        fn game_finished(&mut self, _result: GameResult, board: &Reversi) {
            self.final_board = Some(board.clone());
        }
    }

    fn play(bot: &mut FirstMoveBot, server_lines: &str) -> (anyhow::Result<GameResult>, String) {
        let mut written = Vec::new();
        let result = bot.run(Cursor::new(server_lines.as_bytes().to_vec()), &mut written);
        (result, String::from_utf8(written).unwrap())
    }

    #[test]
    fn answers_move_requests() {
        let mut bot = FirstMoveBot::default();
        let (result, written) = play(
            &mut bot,
            "CONNECT 4 4\nMAKE_MOVE\nMOVE_MADE 0 1\nMOVE_MADE 0 0\nGAME_LOST\n",
        );
        assert_eq!(result.unwrap(), GameResult::Lost);
        assert_eq!(written, "MOVE 0 1\n");
        assert_eq!(bot.board_size, Some((4, 4)));
        assert_eq!(bot.final_board.unwrap().moves_made(), 2);
    }

    #[test]
    fn local_board_follows_the_server_not_the_bot() {
        let mut bot = FirstMoveBot::default();
        // The bot asks for (0, 1), but the server reports (1, 0) as the move made.
        let (result, written) = play(&mut bot, "CONNECT 4 4\nMAKE_MOVE\nMOVE_MADE 1 0\nGAME_TIED\n");
        assert_eq!(result.unwrap(), GameResult::Tied);
        assert_eq!(written, "MOVE 0 1\n");
        let board = bot.final_board.unwrap();
        assert_eq!(board.get(1, 0), Some(reversi::Side::First));
        assert_eq!(board.get(0, 1), None);
    }

    #[test]
    fn error_from_server_is_an_error() {
        let mut bot = FirstMoveBot::default();
        let (result, _) = play(&mut bot, "CONNECT 4 4\nERROR\n");
        assert!(result.is_err());
    }

    #[test]
    fn disconnect_is_an_error() {
        let mut bot = FirstMoveBot::default();
        let (result, _) = play(&mut bot, "CONNECT 4 4\nMAKE_MOVE\n");
        assert!(result.is_err());
        assert_eq!(bot.chosen, [(0, 1)]);
    }

    #[test]
    fn result_before_connect_is_an_error() {
        let mut bot = FirstMoveBot::default();
        let (result, written) = play(&mut bot, "GAME_WON\n");
        assert!(result.is_err());
        assert!(written.is_empty());
    }
}

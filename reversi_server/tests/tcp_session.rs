use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use reversi::{Reversi, Side};
use reversi_bot_utils::{Bot, GameResult};
use reversi_server::{
    ChannelError, Listener, Outcome, ServerConfig, SessionError, SessionResult,
};

struct Client {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        Self {
            reader,
            writer: stream,
        }
    }

    /// The next line without its newline, or `None` once the server hung up.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end().to_owned()),
        }
    }

    fn expect(&mut self, expected: &str) {
        assert_eq!(self.read_line().as_deref(), Some(expected));
    }

    fn expect_hangup(&mut self) {
        assert_eq!(self.read_line(), None);
    }

    fn send(&mut self, line: &str) {
        writeln!(self.writer, "{}", line).unwrap();
        self.writer.flush().unwrap();
    }
}

fn start_server(
    rows: u32,
    cols: u32,
    move_timeout_secs: u64,
) -> (SocketAddr, JoinHandle<anyhow::Result<SessionResult>>) {
    let config = ServerConfig {
        host: String::from("127.0.0.1"),
        port: 0,
        rows,
        cols,
        move_timeout_secs,
        num_sessions: 1,
    };
    let listener = Listener::bind(config).unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || listener.serve_session());
    (addr, handle)
}

/// Connects two players in order, so the first one is the first player.
fn connect_pair(addr: SocketAddr) -> (Client, Client) {
    let first = Client::connect(addr);
    let second = Client::connect(addr);
    (first, second)
}

#[test]
fn board_without_moves_is_tied_right_away() {
    let (addr, server) = start_server(2, 2, 0);
    let (mut first, mut second) = connect_pair(addr);

    for player in [&mut first, &mut second] {
        player.expect("CONNECT 2 2");
        player.expect("GAME_TIED");
        player.expect_hangup();
    }

    match server.join().unwrap().unwrap() {
        SessionResult::Finished(outcome) => assert_eq!(outcome, Outcome::Tie),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn illegal_move_aborts_for_both_players() {
    let (addr, server) = start_server(4, 4, 0);
    let (mut first, mut second) = connect_pair(addr);

    first.expect("CONNECT 4 4");
    second.expect("CONNECT 4 4");
    first.expect("MAKE_MOVE");
    first.send("MOVE 0 0");

    first.expect("ERROR");
    first.expect_hangup();
    second.expect("ERROR");
    second.expect_hangup();

    match server.join().unwrap().unwrap() {
        SessionResult::Aborted(SessionError::IllegalMove { side, row, col, .. }) => {
            assert_eq!((side, row, col), (Side::First, 0, 0));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn accepted_move_reaches_both_players_before_the_next_turn() {
    let (addr, server) = start_server(4, 4, 0);
    let (mut first, mut second) = connect_pair(addr);

    first.expect("CONNECT 4 4");
    second.expect("CONNECT 4 4");
    first.expect("MAKE_MOVE");
    first.send("MOVE 0 1");
    first.expect("MOVE_MADE 0 1");
    second.expect("MOVE_MADE 0 1");

    second.expect("MAKE_MOVE");
    second.send("banana");
    first.expect("ERROR");
    second.expect("ERROR");
    first.expect_hangup();
    second.expect_hangup();

    match server.join().unwrap().unwrap() {
        SessionResult::Aborted(SessionError::Channel {
            side: Side::Second,
            err: ChannelError::Malformed(_),
        }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn disconnect_aborts_for_the_other_player() {
    let (addr, server) = start_server(8, 8, 0);
    let (mut first, mut second) = connect_pair(addr);

    first.expect("CONNECT 8 8");
    first.expect("MAKE_MOVE");
    drop(first);

    second.expect("CONNECT 8 8");
    second.expect("ERROR");
    second.expect_hangup();

    let result = server.join().unwrap().unwrap();
    match result {
        SessionResult::Aborted(err) => assert_eq!(err.culprit(), Some(Side::First)),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn slow_player_times_out() {
    let (addr, server) = start_server(8, 8, 1);
    let (mut first, mut second) = connect_pair(addr);

    first.expect("CONNECT 8 8");
    first.expect("MAKE_MOVE");
    // No reply
    second.expect("CONNECT 8 8");
    second.expect("ERROR");
    first.expect("ERROR");

    match server.join().unwrap().unwrap() {
        SessionResult::Aborted(SessionError::Channel {
            side: Side::First,
            err: ChannelError::TimedOut,
        }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn trickling_reply_still_times_out() {
    let (addr, server) = start_server(8, 8, 1);
    let (mut first, mut second) = connect_pair(addr);

    first.expect("CONNECT 8 8");
    first.expect("MAKE_MOVE");
    let start = Instant::now();
    let mut writer = first.writer.try_clone().unwrap();
    let trickle = thread::spawn(move || {
        // Never a newline, and stop once the server hangs up
        for _ in 0..50 {
            if writer.write_all(b"M").and_then(|()| writer.flush()).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    });

    second.expect("CONNECT 8 8");
    second.expect("ERROR");
    let result = server.join().unwrap().unwrap();
    assert!(start.elapsed() < Duration::from_secs(4));
    match result {
        SessionResult::Aborted(SessionError::Channel {
            side: Side::First,
            err: ChannelError::TimedOut,
        }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    drop(first);
    trickle.join().unwrap();
}

#[derive(Default)]
struct FirstMoveBot {
    final_board: Option<Reversi>,
}

impl Bot for FirstMoveBot {
    fn choose_move(&mut self, board: &Reversi) -> (u32, u32) {
        board.legal_moves()[0]
    }

    fn game_finished(&mut self, _result: GameResult, board: &Reversi) {
        self.final_board = Some(board.clone());
    }
}

fn spawn_bot(client: Client) -> JoinHandle<(GameResult, Reversi)> {
    thread::spawn(move || {
        let mut bot = FirstMoveBot::default();
        let result = bot.run(client.reader, client.writer).unwrap();
        (result, bot.final_board.unwrap())
    })
}

#[test]
fn two_bots_play_a_full_game() {
    let (addr, server) = start_server(8, 8, 5);
    let (first, second) = connect_pair(addr);
    let first = spawn_bot(first);
    let second = spawn_bot(second);

    let (first_result, first_board) = first.join().unwrap();
    let (second_result, second_board) = second.join().unwrap();
    let outcome = match server.join().unwrap().unwrap() {
        SessionResult::Finished(outcome) => outcome,
        other => panic!("unexpected result: {:?}", other),
    };

    assert!(first_board.game_over());
    assert_eq!(first_board.moves_made(), second_board.moves_made());
    for row in 0..8 {
        for col in 0..8 {
            assert_eq!(first_board.get(row, col), second_board.get(row, col));
        }
    }
    assert_eq!(Outcome::from(first_board.winner()), outcome);

    let expected = match outcome {
        Outcome::FirstWins => (GameResult::Won, GameResult::Lost),
        Outcome::SecondWins => (GameResult::Lost, GameResult::Won),
        Outcome::Tie => (GameResult::Tied, GameResult::Tied),
    };
    assert_eq!((first_result, second_result), expected);
}

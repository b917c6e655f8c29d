use quickcheck::{Arbitrary, Gen};

use crate::Reversi;

/// A game played from the starting position by picking legal moves.
#[derive(Clone, Debug)]
pub struct PlayedGame {
    pub rows: u32,
    pub cols: u32,
    /// Each entry selects one of the legal moves available at that point.
    pub picks: Vec<usize>,
}

impl PlayedGame {
    /// Replays the picks, stopping early if the game ends.
    pub fn play(&self) -> Reversi {
        let mut board = Reversi::new(self.rows, self.cols).unwrap();
        for &pick in &self.picks {
            let legal = board.legal_moves();
            if legal.is_empty() {
                break;
            }
            let (row, col) = legal[pick % legal.len()];
            board.make_move(row, col).unwrap();
        }
        board
    }
}

impl Arbitrary for PlayedGame {
    fn arbitrary(g: &mut Gen) -> Self {
        let rows = *g.choose(&[4, 6, 8, 10]).unwrap();
        let cols = *g.choose(&[4, 6, 8]).unwrap();
        let num_picks = usize::arbitrary(g) % (rows * cols) as usize;
        let picks = (0..num_picks).map(|_| usize::arbitrary(g)).collect();
        PlayedGame { rows, cols, picks }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let (rows, cols) = (self.rows, self.cols);
        Box::new(
            self.picks
                .shrink()
                .map(move |picks| PlayedGame { rows, cols, picks }),
        )
    }
}

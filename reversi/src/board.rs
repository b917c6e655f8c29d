use std::cmp::Ordering;

use crate::{IllegalMove, InvalidBoardSize};

pub const MIN_DIMENSION: u32 = 2;
pub const MAX_DIMENSION: u32 = 64;

/// The eight directions in which a run of discs can be captured.
const DIRECTIONS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One of the two players, identified by the order in which they move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The player who makes the first move.
    First,
    Second,
}

impl Side {
    /// The side whose turn it is after `move_count` moves have been made.
    pub fn from_parity(move_count: usize) -> Self {
        if move_count % 2 == 0 {
            Side::First
        } else {
            Side::Second
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

/// Who won a finished game. `None` means the game was tied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Winner {
    First,
    Second,
    None,
}

/// A Reversi board together with whose turn it is.
///
/// The side to move is derived purely from the number of moves made so far,
/// so there is no pass move: a side without a legal move ends the game
/// (see [`Self::game_over()`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reversi {
    rows: u32,
    cols: u32,
    /// Row-major, `None` for an empty cell.
    cells: Vec<Option<Side>>,
    moves_made: usize,
}

impl Reversi {
    /// Creates a board with the usual four discs in the center.
    ///
    /// The second player's discs lie on the main diagonal of the center
    /// square, the first player's on the anti-diagonal.
    pub fn new(rows: u32, cols: u32) -> Result<Self, InvalidBoardSize> {
        let dimension_ok = |n: u32| n % 2 == 0 && (MIN_DIMENSION..=MAX_DIMENSION).contains(&n);
        if !dimension_ok(rows) || !dimension_ok(cols) {
            return Err(InvalidBoardSize { rows, cols });
        }

        let mut board = Self {
            rows,
            cols,
            cells: vec![None; (rows * cols) as usize],
            moves_made: 0,
        };
        let (r, c) = (rows / 2 - 1, cols / 2 - 1);
        board.set(r, c, Side::Second);
        board.set(r + 1, c + 1, Side::Second);
        board.set(r, c + 1, Side::First);
        board.set(r + 1, c, Side::First);
        Ok(board)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// How many discs have been placed since the starting position.
    pub fn moves_made(&self) -> usize {
        self.moves_made
    }

    pub fn to_move(&self) -> Side {
        Side::from_parity(self.moves_made)
    }

    /// Returns the owner of the disc at the given cell, if there is one.
    ///
    /// Out-of-bounds coordinates are treated like empty cells.
    pub fn get(&self, row: u32, col: u32) -> Option<Side> {
        if row < self.rows && col < self.cols {
            self.cells[self.index(row, col)]
        } else {
            None
        }
    }

    pub fn is_in_bounds(&self, row: i64, col: i64) -> bool {
        (0..i64::from(self.rows)).contains(&row) && (0..i64::from(self.cols)).contains(&col)
    }

    /// The discs that would be flipped if the side to move placed a disc here.
    ///
    /// Empty if the cell is occupied, out of bounds, or captures nothing.
    pub fn flips_for(&self, row: u32, col: u32) -> Vec<(u32, u32)> {
        self.flips_for_side(self.to_move(), row, col)
    }

    /// All cells where the side to move may place a disc, in row-major order.
    pub fn legal_moves(&self) -> Vec<(u32, u32)> {
        self.legal_moves_for(self.to_move())
    }

    pub fn has_legal_move(&self, side: Side) -> bool {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .any(|(row, col)| !self.flips_for_side(side, row, col).is_empty())
    }

    /// Places a disc for the side to move and flips every captured run.
    ///
    /// Returns the number of flipped discs.
    pub fn make_move(&mut self, row: u32, col: u32) -> Result<usize, IllegalMove> {
        if self.game_over() {
            return Err(IllegalMove::GameOver);
        }
        if row >= self.rows || col >= self.cols {
            return Err(IllegalMove::OutOfBounds { row, col });
        }
        if let Some(by) = self.get(row, col) {
            return Err(IllegalMove::Occupied { row, col, by });
        }

        let side = self.to_move();
        let flips = self.flips_for_side(side, row, col);
        if flips.is_empty() {
            return Err(IllegalMove::NoCapture { row, col });
        }
        self.set(row, col, side);
        for &(flip_row, flip_col) in &flips {
            self.set(flip_row, flip_col, side);
        }
        self.moves_made += 1;
        Ok(flips.len())
    }

    /// The game ends as soon as the side to move cannot place a disc.
    pub fn game_over(&self) -> bool {
        !self.has_legal_move(self.to_move())
    }

    pub fn disc_count(&self, side: Side) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(side)).count()
    }

    /// Decides the game by disc count. Only meaningful once [`Self::game_over()`] is true.
    pub fn winner(&self) -> Winner {
        match self
            .disc_count(Side::First)
            .cmp(&self.disc_count(Side::Second))
        {
            Ordering::Less => Winner::Second,
            Ordering::Equal => Winner::None,
            Ordering::Greater => Winner::First,
        }
    }

    fn legal_moves_for(&self, side: Side) -> Vec<(u32, u32)> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .filter(|&(row, col)| !self.flips_for_side(side, row, col).is_empty())
            .collect()
    }

    fn flips_for_side(&self, side: Side, row: u32, col: u32) -> Vec<(u32, u32)> {
        if row >= self.rows || col >= self.cols || self.get(row, col).is_some() {
            return Vec::new();
        }

        let mut flips = Vec::new();
        for (d_row, d_col) in DIRECTIONS {
            // Walk over the opponent's discs until we hit one of ours.
            let mut run = Vec::new();
            let (mut r, mut c) = (i64::from(row) + d_row, i64::from(col) + d_col);
            while self.is_in_bounds(r, c) {
                match self.get(r as u32, c as u32) {
                    Some(owner) if owner == side.opponent() => run.push((r as u32, c as u32)),
                    Some(_) => {
                        flips.append(&mut run);
                        break;
                    }
                    None => break,
                }
                r += d_row;
                c += d_col;
            }
        }
        flips
    }

    fn index(&self, row: u32, col: u32) -> usize {
        (row * self.cols + col) as usize
    }

    fn set(&mut self, row: u32, col: u32, side: Side) {
        let idx = self.index(row, col);
        self.cells[idx] = Some(side);
    }
}

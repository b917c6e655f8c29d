use reversi::{IllegalMove, Reversi, Winner};
use tracing::trace;

/// The rules engine behind a [`Session`](crate::Session).
///
/// The session never looks at the board itself. It only asks the model to
/// apply moves and whether, and by whom, the game was won.
pub trait GameModel {
    /// Rows and columns, as announced to the players.
    fn dimensions(&self) -> (u32, u32);

    /// Places a disc for the side whose turn it is.
    fn apply_move(&mut self, row: u32, col: u32) -> Result<(), IllegalMove>;

    fn is_over(&self) -> bool;

    /// Only meaningful once [`Self::is_over()`] returns true.
    fn winner(&self) -> Winner;
}

impl GameModel for Reversi {
    fn dimensions(&self) -> (u32, u32) {
        (self.rows(), self.cols())
    }

    fn apply_move(&mut self, row: u32, col: u32) -> Result<(), IllegalMove> {
        let flipped = self.make_move(row, col)?;
        trace!(row, col, flipped, "Placed disc");
        Ok(())
    }

    fn is_over(&self) -> bool {
        self.game_over()
    }

    fn winner(&self) -> Winner {
        Reversi::winner(self)
    }
}

use crate::{Reversi, Side};

/// Draws the board as text, `X` for the first player and `O` for the second.
pub fn visualize_board(board: &Reversi) -> String {
    // Draw the column header and the top of the box
    let mut result = String::from("    ");
    for j in 0..board.cols() {
        result += &format!("{:>2}", j);
    }
    result += "\n    ╭";
    for _ in 0..board.cols() {
        result += "──";
    }
    result += "─╮\n";

    for i in 0..board.rows() {
        result += &format!("{:>3} │", i);
        for j in 0..board.cols() {
            result += match board.get(i, j) {
                Some(Side::First) => " X",
                Some(Side::Second) => " O",
                None => " ·",
            };
        }
        result += " │\n";
    }

    // Draw the bottom of the box
    result += "    ╰";
    for _ in 0..board.cols() {
        result += "──";
    }
    result += "─╯";
    result
}

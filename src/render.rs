//! Rendering a solved assignment back onto the board.

use crate::model::PuzzleModel;
use crate::puzzle::letter_char;
use crate::solver::Solution;

/// Format the solved board: one line per board row, the solved letter
/// per coloured cell, a blank for `.` cells.
pub fn render(model: &PuzzleModel, solution: &Solution) -> String {
    let board = model.board();
    let mut out = String::with_capacity((board.num_cols() + 1) * board.num_rows());

    for row in 0..board.num_rows() {
        for col in 0..board.num_cols() {
            match model.letter_var((row, col)) {
                Some(var) => out.push(letter_char(solution[var])),
                None => out.push(' '),
            }
        }
        out.push('\n');
    }

    out
}

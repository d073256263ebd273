//! Plain-text projections of a board.

use core::fmt;

use crate::*;

fn write_grid(
    f: &mut fmt::Formatter<'_>,
    board: &Board,
    view: impl Fn(&Cell) -> CellView,
) -> fmt::Result {
    // only the last digit of the column keeps the grid aligned
    f.write_str("  | ")?;
    for col in 1..=board.cols() {
        write!(f, "{} ", col % 10)?;
    }
    writeln!(f)?;
    writeln!(f, "--+-{}", "--".repeat(usize::from(board.cols())))?;

    for row in 1..=board.rows() {
        write!(f, "{row:<2}| ")?;
        for col in 1..=board.cols() {
            write!(f, "{} ", view(&board[(row, col)]))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// Every cell as a mine or its adjacent count, ignoring what was revealed.
#[derive(Copy, Clone, Debug)]
pub struct SolutionView<'a> {
    board: &'a Board,
}

impl<'a> SolutionView<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }
}

impl fmt::Display for SolutionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, self.board, Cell::solution_view)
    }
}

/// The board as the player sees it, hidden cells shown as `.`.
#[derive(Copy, Clone, Debug)]
pub struct CurrentView<'a> {
    board: &'a Board,
}

impl<'a> CurrentView<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }
}

impl fmt::Display for CurrentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, self.board, Cell::current_view)
    }
}

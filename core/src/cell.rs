use core::fmt;
use serde::{Deserialize, Serialize};

/// State of a single board position.
///
/// `has_mine` and `adjacent_mine_count` are fixed once the board is built, `is_revealed` only ever goes from `false`
/// to `true`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    has_mine: bool,
    is_revealed: bool,
    adjacent_mine_count: u8,
}

impl Cell {
    /// Builds a cell from stored fields, used when restoring a board.
    pub const fn new(has_mine: bool, is_revealed: bool, adjacent_mine_count: u8) -> Self {
        Self {
            has_mine,
            is_revealed,
            adjacent_mine_count,
        }
    }

    pub const fn has_mine(&self) -> bool {
        self.has_mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub const fn adjacent_mine_count(&self) -> u8 {
        self.adjacent_mine_count
    }

    pub(crate) fn add_mine(&mut self) {
        self.has_mine = true;
    }

    pub(crate) fn add_adjacent_mine(&mut self) {
        self.adjacent_mine_count += 1;
    }

    pub(crate) fn reveal(&mut self) {
        self.is_revealed = true;
    }

    /// What the player currently sees.
    pub const fn current_view(&self) -> CellView {
        if self.is_revealed {
            self.solution_view()
        } else {
            CellView::Hidden
        }
    }

    /// What the cell holds, regardless of whether it was revealed.
    pub const fn solution_view(&self) -> CellView {
        if self.has_mine {
            CellView::Mine
        } else {
            CellView::Count(self.adjacent_mine_count)
        }
    }
}

/// Display projection of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Mine,
    Count(u8),
}

impl fmt::Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("."),
            Self::Mine => f.write_str("M"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

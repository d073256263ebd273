use serde::{Deserialize, Serialize};

use crate::*;

/// Smallest accepted number of rows or columns.
pub const MIN_SIZE: Coord = 3;

/// Largest accepted number of rows or columns.
pub const MAX_SIZE: Coord = 19;

/// Dimensions and mine count of a game, validated against the playable ranges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Rows and columns must be within `MIN_SIZE..=MAX_SIZE`, mines within `1..=rows * cols`.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let size_range = MIN_SIZE..=MAX_SIZE;
        if !size_range.contains(&rows)
            || !size_range.contains(&cols)
            || !(1..=mult(rows, cols)).contains(&mines)
        {
            return Err(GameError::InvalidConfiguration { rows, cols, mines });
        }
        Ok(Self::new_unchecked(rows, cols, mines))
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(5, 5, 5)
    }
}

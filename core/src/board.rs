use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The minefield and its reveal state.
///
/// Coordinates are `(row, col)` starting at 1. Mines are placed once at construction, a new game gets a new board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "BoardSnapshot", try_from = "BoardSnapshot")]
pub struct Board {
    rows: Coord,
    cols: Coord,
    mine_count: CellCount,
    cells: Array2<Cell>,
    cells_remaining: CellCount,
}

impl Board {
    /// Randomly places `mine_count` mines, reproducibly for a given `seed`.
    pub fn new(rows: Coord, cols: Coord, mine_count: CellCount, seed: u64) -> Result<Self> {
        Self::place(rows, cols, mine_count, RandomMines::new(seed))
    }

    pub fn from_config(config: &GameConfig, seed: u64) -> Result<Self> {
        Self::new(config.rows, config.cols, config.mines, seed)
    }

    /// Places a mine on each listed position, duplicates count once.
    pub fn with_mines(rows: Coord, cols: Coord, mines: &[Coord2]) -> Result<Self> {
        let mut distinct = mines.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        // a full list skips sampling in `place`, so bounds are checked up front
        let in_bounds =
            |&(row, col): &Coord2| (1..=rows).contains(&row) && (1..=cols).contains(&col);
        if !distinct.iter().all(in_bounds) {
            return Err(GameError::InvalidCoords);
        }
        let mine_count = distinct
            .len()
            .try_into()
            .map_err(|_| GameError::InvalidConfiguration {
                rows,
                cols,
                mines: CellCount::MAX,
            })?;
        Self::place(rows, cols, mine_count, FixedMines::new(mines))
    }

    /// Draws candidates from `source` until `mine_count` distinct cells are mined.
    pub fn place<S: MineSource>(
        rows: Coord,
        cols: Coord,
        mine_count: CellCount,
        mut source: S,
    ) -> Result<Self> {
        let total_cells = mult(rows, cols);
        if rows == 0 || cols == 0 || mine_count > total_cells {
            return Err(GameError::InvalidConfiguration {
                rows,
                cols,
                mines: mine_count,
            });
        }

        let mut board = Self {
            rows,
            cols,
            mine_count,
            cells: Array2::default([usize::from(rows), usize::from(cols)]),
            cells_remaining: total_cells - mine_count,
        };

        // optimize for full boards
        if mine_count == total_cells {
            log::warn!("Board is full of mines, {rows}x{cols} with {mine_count} mines");
            for row in 1..=rows {
                for col in 1..=cols {
                    board.add_mine((row, col));
                }
            }
            return Ok(board);
        }

        let mut placed = 0;
        let mut draws = 0u64;
        while placed < mine_count {
            let coords = source
                .draw((rows, cols))
                .ok_or(GameError::MineSourceExhausted)?;
            let coords = board.validate_coords(coords)?;
            draws += 1;

            if board[coords].has_mine() {
                continue;
            }
            board.add_mine(coords);
            placed += 1;
        }
        log::debug!(
            "Placed {mine_count} mines on {rows}x{cols} board in {draws} draws"
        );

        Ok(board)
    }

    /// Rebuilds a board from stored per-cell state.
    ///
    /// The remaining counter is derived from the revealed safe cells, adjacency counts are taken as given.
    pub fn restore(
        rows: Coord,
        cols: Coord,
        mine_count: CellCount,
        cells: Array2<Cell>,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 || mine_count > mult(rows, cols) {
            return Err(GameError::InvalidConfiguration {
                rows,
                cols,
                mines: mine_count,
            });
        }
        if cells.dim() != (usize::from(rows), usize::from(cols)) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut mines = 0;
        let mut revealed_safe = 0;
        for cell in &cells {
            if cell.adjacent_mine_count() > 8 {
                return Err(GameError::InvalidCellState);
            }
            if cell.has_mine() {
                mines += 1;
            } else if cell.is_revealed() {
                revealed_safe += 1;
            }
        }
        if mines != mine_count {
            return Err(GameError::InvalidCellState);
        }

        Ok(Self {
            rows,
            cols,
            mine_count,
            cells,
            cells_remaining: mult(rows, cols) - mine_count - revealed_safe,
        })
    }

    pub fn rows(&self) -> Coord {
        self.rows
    }

    pub fn cols(&self) -> Coord {
        self.cols
    }

    pub fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    /// Safe cells that still have to be revealed.
    pub fn cells_remaining(&self) -> CellCount {
        self.cells_remaining
    }

    pub fn has_cells_remaining(&self) -> bool {
        self.cells_remaining > 0
    }

    pub fn is_valid_coordinate(&self, (row, col): Coord2) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.cols).contains(&col)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.is_valid_coordinate(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get_cell(&self, coords: Coord2) -> Option<&Cell> {
        self.is_valid_coordinate(coords)
            .then(|| &self.cells[coords.to_nd_index()])
    }

    /// Neighbors of `coords` in the order NW, N, NE, W, E, SW, S, SE, skipping the ones off the board.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Panics when `coords` is off the board.
    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].has_mine()
    }

    pub fn can_reveal(&self, coords: Coord2) -> bool {
        self.get_cell(coords)
            .is_some_and(|cell| !cell.is_revealed())
    }

    /// Reveals a safe cell, and the whole empty region around it when it has no adjacent mines.
    ///
    /// Mines are never revealed here, stepping on one is up to the caller.
    pub fn reveal(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        let cell = self[coords];
        if cell.is_revealed() {
            return Err(GameError::AlreadyRevealed(coords));
        }
        if cell.has_mine() {
            return Err(GameError::MineAt(coords));
        }

        let mut to_visit = vec![coords];
        let mut opened: CellCount = 0;

        while let Some(visit_coords) = to_visit.pop() {
            let cell = &mut self.cells[visit_coords.to_nd_index()];
            if cell.is_revealed() || cell.has_mine() {
                continue;
            }

            cell.reveal();
            opened += 1;
            let adjacent_mines = cell.adjacent_mine_count();
            log::trace!(
                "Revealed cell at {:?}, mine count: {}",
                visit_coords,
                adjacent_mines
            );

            // only empty cells spread the cascade
            if adjacent_mines == 0 {
                to_visit.extend(
                    self.neighbors(visit_coords)
                        .filter(|&pos| !self[pos].is_revealed()),
                );
            }
        }

        self.cells_remaining -= opened;
        log::debug!(
            "Reveal at {:?} opened {} cells, {} left",
            coords,
            opened,
            self.cells_remaining
        );
        Ok(())
    }

    /// All cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord + 1, col as Coord + 1), cell))
    }

    pub fn solution_view(&self) -> SolutionView<'_> {
        SolutionView::new(self)
    }

    pub fn current_view(&self) -> CurrentView<'_> {
        CurrentView::new(self)
    }

    fn add_mine(&mut self, coords: Coord2) {
        self.cells[coords.to_nd_index()].add_mine();
        for pos in self.neighbors(coords) {
            self.cells[pos.to_nd_index()].add_adjacent_mine();
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        assert!(
            self.is_valid_coordinate(coords),
            "coordinates {coords:?} outside of {}x{} board",
            self.rows,
            self.cols
        );
        &self.cells[coords.to_nd_index()]
    }
}

/// Every field needed to rebuild a [`Board`], used as its serde representation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub rows: Coord,
    pub cols: Coord,
    pub mine_count: CellCount,
    pub cells: Array2<Cell>,
}

impl From<Board> for BoardSnapshot {
    fn from(board: Board) -> Self {
        Self {
            rows: board.rows,
            cols: board.cols,
            mine_count: board.mine_count,
            cells: board.cells,
        }
    }
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = GameError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self> {
        Board::restore(
            snapshot.rows,
            snapshot.cols,
            snapshot.mine_count,
            snapshot.cells,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revealed(board: &Board) -> Vec<Coord2> {
        board
            .iter()
            .filter(|(_, cell)| cell.is_revealed())
            .map(|(coords, _)| coords)
            .collect()
    }

    #[test]
    fn random_board_places_exact_mine_count() {
        let board = Board::new(5, 5, 5, 1234).unwrap();

        let mines = board.iter().filter(|(_, cell)| cell.has_mine()).count();
        assert_eq!(mines, 5);
        assert_eq!(board.mine_count(), 5);
        assert_eq!(board.cells_remaining(), 20);
        assert!(board.has_cells_remaining());
        assert!(revealed(&board).is_empty());
    }

    #[test]
    fn same_seed_builds_same_board() {
        let a = Board::new(19, 19, 60, 99).unwrap();
        let b = Board::new(19, 19, 60, 99).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn adjacent_counts_match_neighboring_mines() {
        let board = Board::new(12, 9, 30, 5).unwrap();

        for (coords, cell) in board.iter() {
            let expected = board
                .neighbors(coords)
                .filter(|&pos| board.contains_mine(pos))
                .count();
            assert_eq!(usize::from(cell.adjacent_mine_count()), expected);
        }
    }

    #[test]
    fn rejects_too_many_mines_and_empty_dimensions() {
        assert_eq!(
            Board::new(3, 3, 10, 0),
            Err(GameError::InvalidConfiguration {
                rows: 3,
                cols: 3,
                mines: 10
            })
        );
        assert!(Board::new(0, 3, 0, 0).is_err());
        assert!(Board::new(3, 0, 0, 0).is_err());
    }

    #[test]
    fn full_board_has_nothing_to_reveal() {
        let board = Board::new(3, 4, 12, 0).unwrap();

        assert!(board.iter().all(|(_, cell)| cell.has_mine()));
        assert!(!board.has_cells_remaining());
    }

    #[test]
    fn fixed_mines_collapse_duplicates() {
        let board = Board::with_mines(3, 3, &[(1, 1), (3, 3), (1, 1)]).unwrap();

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board.cells_remaining(), 7);
        assert_eq!(board[(2, 2)].adjacent_mine_count(), 2);
    }

    #[test]
    fn fixed_mines_outside_board_are_rejected() {
        assert_eq!(
            Board::with_mines(3, 3, &[(4, 1)]),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            Board::with_mines(3, 3, &[(0, 1)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn full_list_with_off_board_mine_is_rejected() {
        let mines = [
            (1, 1),
            (1, 2),
            (1, 3),
            (2, 1),
            (2, 2),
            (2, 3),
            (3, 1),
            (3, 2),
            (4, 4),
        ];

        assert_eq!(
            Board::with_mines(3, 3, &mines),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn full_list_mines_every_cell() {
        let mines: Vec<Coord2> = (1..=3)
            .flat_map(|row| (1..=3).map(move |col| (row, col)))
            .collect();

        let board = Board::with_mines(3, 3, &mines).unwrap();

        assert_eq!(board.mine_count(), 9);
        assert!(!board.has_cells_remaining());
    }

    #[test]
    fn exhausted_source_is_an_error() {
        let source = FixedMines::new(&[(1, 1), (1, 1)]);

        assert_eq!(
            Board::place(3, 3, 2, source),
            Err(GameError::MineSourceExhausted)
        );
    }

    #[test]
    fn validates_coordinates() {
        let board = Board::with_mines(5, 5, &[]).unwrap();

        assert!(board.is_valid_coordinate((5, 5)));
        assert!(board.is_valid_coordinate((1, 1)));
        assert!(!board.is_valid_coordinate((6, 5)));
        assert!(!board.is_valid_coordinate((5, 6)));
        assert!(!board.is_valid_coordinate((0, 0)));
        assert!(board.get_cell((0, 3)).is_none());
        assert!(board.get_cell((3, 3)).is_some());
    }

    #[test]
    fn neighbor_counts_by_position() {
        let board = Board::with_mines(5, 5, &[]).unwrap();

        assert_eq!(board.neighbors((3, 3)).count(), 8);
        assert_eq!(board.neighbors((1, 3)).count(), 5);
        assert_eq!(board.neighbors((3, 5)).count(), 5);
        assert_eq!(board.neighbors((5, 1)).count(), 3);
        assert_eq!(
            board.neighbors((1, 1)).collect::<Vec<_>>(),
            [(1, 2), (2, 1), (2, 2)]
        );
        for (coords, _) in board.iter() {
            assert!(board.neighbors(coords).all(|pos| board.is_valid_coordinate(pos)));
        }
    }

    #[test]
    fn can_reveal_only_hidden_cells_on_board() {
        let mut board = Board::with_mines(5, 5, &[(5, 5)]).unwrap();

        assert!(board.can_reveal((1, 1)));
        assert!(board.can_reveal((5, 5)));
        assert!(!board.can_reveal((0, 0)));
        assert!(!board.can_reveal((6, 6)));

        board.reveal((4, 4)).unwrap();
        assert!(!board.can_reveal((4, 4)));
    }

    #[test]
    fn center_mine_gives_every_other_cell_a_one() {
        let mut board = Board::with_mines(3, 3, &[(2, 2)]).unwrap();

        for (coords, cell) in board.iter() {
            if coords != (2, 2) {
                assert_eq!(cell.adjacent_mine_count(), 1);
            }
        }

        board.reveal((1, 1)).unwrap();
        assert_eq!(revealed(&board), [(1, 1)]);
        assert_eq!(board.cells_remaining(), 7);
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let mut board = Board::with_mines(5, 5, &[(1, 1), (5, 5)]).unwrap();
        let before = board.cells_remaining();

        board.reveal((2, 2)).unwrap();

        assert_eq!(revealed(&board), [(2, 2)]);
        assert_eq!(board.cells_remaining(), before - 1);
    }

    #[test]
    fn empty_cell_cascades_to_every_safe_cell() {
        let mut board = Board::with_mines(5, 5, &[(1, 1)]).unwrap();

        board.reveal((5, 5)).unwrap();

        assert_eq!(revealed(&board).len(), 24);
        assert!(!board[(1, 1)].is_revealed());
        assert_eq!(board.cells_remaining(), 0);
        assert!(!board.has_cells_remaining());
    }

    #[test]
    fn mine_free_board_reveals_all_at_once() {
        let mut board = Board::with_mines(5, 5, &[]).unwrap();

        board.reveal((3, 3)).unwrap();

        assert_eq!(revealed(&board).len(), 25);
        assert_eq!(board.cells_remaining(), 0);
    }

    #[test]
    fn cascade_stops_at_numbered_border() {
        // mines wall off the right two columns
        let mines = [(1, 4), (2, 4), (3, 4), (4, 4), (5, 4)];
        let mut board = Board::with_mines(5, 6, &mines).unwrap();

        board.reveal((3, 1)).unwrap();

        for (coords, cell) in board.iter() {
            assert_eq!(cell.is_revealed(), coords.1 <= 3, "at {coords:?}");
            assert!(!(cell.is_revealed() && cell.has_mine()));
        }
        assert_eq!(board.cells_remaining(), 10);
    }

    #[test]
    fn cascade_reveals_region_plus_border_only() {
        let mut board = Board::with_mines(5, 5, &[(3, 3)]).unwrap();

        board.reveal((1, 1)).unwrap();

        // the empty outer ring touches every cell around the mine
        assert_eq!(revealed(&board).len(), 24);

        let mines = [(1, 3), (2, 3), (3, 3), (3, 2), (3, 1)];
        let mut board = Board::with_mines(4, 4, &mines).unwrap();
        board.reveal((1, 1)).unwrap();

        assert_eq!(revealed(&board), [(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn reveal_rejects_precondition_violations() {
        let mut board = Board::with_mines(3, 3, &[(2, 2)]).unwrap();

        assert_eq!(board.reveal((4, 1)), Err(GameError::InvalidCoords));
        assert_eq!(board.reveal((2, 2)), Err(GameError::MineAt((2, 2))));

        board.reveal((1, 1)).unwrap();
        assert_eq!(board.reveal((1, 1)), Err(GameError::AlreadyRevealed((1, 1))));
        assert_eq!(board.cells_remaining(), 7);
        assert!(!board[(2, 2)].is_revealed());
    }

    #[test]
    fn largest_board_cascade_does_not_overflow_stack() {
        let mut board = Board::with_mines(Coord::MAX, Coord::MAX, &[(1, 1)]).unwrap();

        board.reveal((Coord::MAX, Coord::MAX)).unwrap();

        assert_eq!(board.cells_remaining(), 0);
        assert!(!board[(1, 1)].is_revealed());
    }

    #[test]
    #[should_panic]
    fn contains_mine_off_board_panics() {
        let board = Board::with_mines(3, 3, &[]).unwrap();
        board.contains_mine((0, 1));
    }

    #[test]
    fn restore_derives_remaining_count() {
        let mut cells = Array2::default([3, 3]);
        cells[[0, 0]] = Cell::new(true, false, 0);
        cells[[0, 1]] = Cell::new(false, true, 1);
        cells[[1, 1]] = Cell::new(false, true, 1);

        let board = Board::restore(3, 3, 1, cells).unwrap();

        assert_eq!(board.cells_remaining(), 6);
        assert!(board.contains_mine((1, 1)));
        assert!(!board.can_reveal((1, 2)));
    }

    #[test]
    fn restore_rejects_inconsistent_state() {
        let cells: Array2<Cell> = Array2::default([3, 4]);
        assert_eq!(
            Board::restore(3, 3, 0, cells),
            Err(GameError::InvalidBoardShape)
        );

        let cells: Array2<Cell> = Array2::default([3, 3]);
        assert_eq!(
            Board::restore(3, 3, 1, cells),
            Err(GameError::InvalidCellState)
        );

        let mut cells: Array2<Cell> = Array2::default([3, 3]);
        cells[[1, 1]] = Cell::new(false, false, 9);
        assert_eq!(
            Board::restore(3, 3, 0, cells),
            Err(GameError::InvalidCellState)
        );
    }

    #[test]
    fn serde_goes_through_restore() {
        let mut board = Board::new(6, 7, 8, 3).unwrap();
        let safe = board
            .iter()
            .find(|(_, cell)| !cell.has_mine())
            .map(|(coords, _)| coords)
            .unwrap();
        board.reveal(safe).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, board);
        assert_eq!(restored.cells_remaining(), board.cells_remaining());
    }
}

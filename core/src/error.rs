use thiserror::Error;

use crate::{CellCount, Coord, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid configuration: {rows}x{cols} board with {mines} mines")]
    InvalidConfiguration {
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Cell state is inconsistent with the board")]
    InvalidCellState,
    #[error("Game state is inconsistent with its board")]
    InvalidGameState,
    #[error("Mine source ran out before every mine was placed")]
    MineSourceExhausted,
    #[error("Cell {0:?} is already revealed")]
    AlreadyRevealed(Coord2),
    #[error("Cell {0:?} contains a mine")]
    MineAt(Coord2),
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;

use crate::*;
pub use random::*;

mod random;

/// Supplies candidate mine positions to [`Board::place`].
///
/// Candidates may repeat; the board keeps drawing until it has enough distinct positions. Returning `None` means the
/// source has nothing left to offer.
pub trait MineSource {
    fn draw(&mut self, size: Coord2) -> Option<Coord2>;
}

/// Deterministic source that hands out a fixed list of positions in order.
#[derive(Clone, Debug)]
pub struct FixedMines<'a> {
    coords: core::slice::Iter<'a, Coord2>,
}

impl<'a> FixedMines<'a> {
    pub fn new(coords: &'a [Coord2]) -> Self {
        Self {
            coords: coords.iter(),
        }
    }
}

impl MineSource for FixedMines<'_> {
    fn draw(&mut self, _size: Coord2) -> Option<Coord2> {
        self.coords.next().copied()
    }
}

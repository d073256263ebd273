use rand::prelude::*;

use super::*;

/// Uniform source over the whole board, reproducible from its seed.
#[derive(Clone, Debug)]
pub struct RandomMines {
    rng: SmallRng,
}

impl RandomMines {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MineSource for RandomMines {
    fn draw(&mut self, (rows, cols): Coord2) -> Option<Coord2> {
        let row = self.rng.random_range(1..=rows);
        let col = self.rng.random_range(1..=cols);
        Some((row, col))
    }
}

//! Uniform random piece selection
//!
//! Each drop cycle draws one of the 7 shapes with equal probability.
//! There is no bag and no preview queue.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: ChaCha8Rng,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    /// Seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Reproducible sequence, used by tests and replays of a seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Pick the next shape
    pub fn next(&mut self) -> TetrominoType {
        let index = self.rng.gen_range(0..TetrominoType::ALL.len());
        TetrominoType::ALL[index]
    }
}

//! Random number generation for the detective game
//!
//! Uses a seeded ChaCha RNG so that allocations and decay schedules can be
//! replayed from a single seed.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Game random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation. Background
/// tasks never share a generator; they get their own via [`GameRng::fork`].
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `0..n`; 0 for an empty range
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Weighted-pool roll in `1..=n`; 0 for an empty pool
    pub fn rnd(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(1..=n)
    }

    /// [`GameRng::rn2`] over election ticket totals, which can exceed `u32`
    pub fn rn2_wide(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns lo..=hi, or `lo` when the range is empty
    pub fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Derive an independent generator for a background task
    pub fn fork(&mut self) -> GameRng {
        let seed = self.rng.next_u64();
        GameRng::new(seed)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

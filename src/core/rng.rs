//! Seeded randomness for tile supplies.
//!
//! A tournament holds one [`GameRng`] and forks a child for every game it
//! starts, in a fixed order, so a seed reproduces every shuffled supply of
//! the tournament whether the games then run in sequence or in parallel.
//!
//! ```
//! use rust_tsuro::core::GameRng;
//!
//! let mut tournament = GameRng::new(42);
//! let mut first_game = tournament.fork();
//! let mut second_game = tournament.fork();
//! assert_ne!(first_game.seed(), second_game.seed());
//!
//! let mut again = GameRng::new(42);
//! assert_eq!(again.fork().seed(), first_game.seed());
//! assert!(first_game.quarter_turns() < 4);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha8 stream that remembers the seed it started from.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A child stream for one game. Its seed is drawn from this stream, so
    /// the n-th fork of a given seed is always the same.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self::new(self.inner.gen())
    }

    /// How many clockwise quarter turns to give a dealt tile (0 to 3).
    pub fn quarter_turns(&mut self) -> usize {
        self.inner.gen_range(0..4)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}

//! Tile supplies.
//!
//! A referee draws its hands from an iterator of tiles that is expected to
//! never run dry. Running dry anyway is a configuration error reported at the
//! draw that found it.

use crate::core::{GameRng, Tile, TileSupplyConfig};

/// Boxed tile supply as held by a referee.
pub type TileSupply = Box<dyn Iterator<Item = Tile> + Send>;

/// Cycles through the deck in index order, unrotated.
#[derive(Clone, Debug, Default)]
pub struct DeterministicTiles {
    next: usize,
}

impl DeterministicTiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for DeterministicTiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        let deck = Tile::deck();
        let tile = deck.get(self.next % deck.len()).copied();
        self.next = (self.next + 1) % deck.len();
        tile
    }
}

/// Deals the whole deck in a random order and random rotations, then
/// reshuffles.
#[derive(Clone, Debug)]
pub struct ShuffledTiles {
    rng: GameRng,
    bag: Vec<Tile>,
}

impl ShuffledTiles {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng, bag: Vec::new() }
    }
}

impl Iterator for ShuffledTiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.bag.is_empty() {
            self.bag = Tile::deck().to_vec();
            self.rng.shuffle(&mut self.bag);
        }
        let tile = self.bag.pop()?;
        Some(tile.all_rotations()[self.rng.quarter_turns()])
    }
}

/// Build the supply described by `config`. `rng` seeds shuffled supplies;
/// without one the configured seed is used directly.
#[must_use]
pub fn tile_supply(config: TileSupplyConfig, rng: Option<GameRng>) -> TileSupply {
    match config {
        TileSupplyConfig::Deterministic => Box::new(DeterministicTiles::new()),
        TileSupplyConfig::Shuffled { seed } => {
            Box::new(ShuffledTiles::new(rng.unwrap_or_else(|| GameRng::new(seed))))
        }
    }
}

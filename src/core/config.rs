//! Engine configuration types.
//!
//! - `RefereeConfig`: timeouts and hand sizes for a single game
//! - `TileSupplyConfig`: where a game's tiles come from
//! - `TournamentConfig`: combines the above with tournament-level settings
//!
//! All configs are plain values with builder-style `with_*` methods.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time budget for a single call into a player.
pub const DEFAULT_PLAYER_TIMEOUT: Duration = Duration::from_secs(3);

/// Tiles offered for an initial move.
pub const INITIAL_HAND_SIZE: usize = 3;

/// Tiles offered for an intermediate move.
pub const TURN_HAND_SIZE: usize = 2;

/// Configuration for one refereed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefereeConfig {
    /// Budget for each call into a player. Exceeding it flags the player.
    pub player_timeout: Duration,

    /// Tiles offered for an initial move.
    pub initial_hand_size: usize,

    /// Tiles offered for an intermediate move.
    pub turn_hand_size: usize,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            player_timeout: DEFAULT_PLAYER_TIMEOUT,
            initial_hand_size: INITIAL_HAND_SIZE,
            turn_hand_size: TURN_HAND_SIZE,
        }
    }
}

impl RefereeConfig {
    #[must_use]
    pub fn with_player_timeout(mut self, timeout: Duration) -> Self {
        self.player_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_hand_sizes(mut self, initial: usize, turn: usize) -> Self {
        self.initial_hand_size = initial;
        self.turn_hand_size = turn;
        self
    }
}

/// Source of tiles for each game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileSupplyConfig {
    /// Cycle through the deck in index order, unrotated.
    #[default]
    Deterministic,

    /// Random tiles and rotations from a seeded RNG. Each game gets a fork.
    Shuffled { seed: u64 },
}

/// Configuration for a tournament.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Settings handed to every referee.
    pub referee: RefereeConfig,

    /// Tile supply used for each game.
    pub tile_supply: TileSupplyConfig,

    /// Budget for the end-of-tournament notification.
    pub notify_timeout: Duration,

    /// Run the games of a round on the rayon pool.
    pub parallel_games: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            referee: RefereeConfig::default(),
            tile_supply: TileSupplyConfig::default(),
            notify_timeout: DEFAULT_PLAYER_TIMEOUT,
            parallel_games: false,
        }
    }
}

impl TournamentConfig {
    #[must_use]
    pub fn with_referee(mut self, referee: RefereeConfig) -> Self {
        self.referee = referee;
        self
    }

    #[must_use]
    pub fn with_tile_supply(mut self, supply: TileSupplyConfig) -> Self {
        self.tile_supply = supply;
        self
    }

    #[must_use]
    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_parallel_games(mut self, parallel: bool) -> Self {
        self.parallel_games = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referee_defaults() {
        let config = RefereeConfig::default();
        assert_eq!(config.player_timeout, Duration::from_secs(3));
        assert_eq!(config.initial_hand_size, 3);
        assert_eq!(config.turn_hand_size, 2);
    }

    #[test]
    fn test_tournament_builder() {
        let config = TournamentConfig::default()
            .with_referee(RefereeConfig::default().with_player_timeout(Duration::from_millis(50)))
            .with_tile_supply(TileSupplyConfig::Shuffled { seed: 7 })
            .with_parallel_games(true);

        assert_eq!(config.referee.player_timeout, Duration::from_millis(50));
        assert_eq!(config.tile_supply, TileSupplyConfig::Shuffled { seed: 7 });
        assert!(config.parallel_games);
        assert_eq!(config.notify_timeout, DEFAULT_PLAYER_TIMEOUT);
    }
}

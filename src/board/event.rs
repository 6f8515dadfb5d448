//! Board events and move outcomes.

use serde::{Deserialize, Serialize};

use crate::core::{BoardPosition, Color, Tile};

use super::state::Avatar;

/// Something that happened on a board.
///
/// Events are only delivered for mutations that commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A tile was placed, optionally on behalf of a player.
    Placed {
        color: Option<Color>,
        position: BoardPosition,
        tile: Tile,
    },
    /// An avatar followed a path from one spot to another.
    Moved { color: Color, from: Avatar, to: Avatar },
    /// An avatar reached the edge of the board and left it.
    Exited { color: Color },
    /// An avatar's path closed into a loop.
    Looped { color: Color },
    /// Several avatars now stand on the same spot.
    Collided { colors: Vec<Color>, at: Avatar },
}

/// What a committed board mutation did to the avatars.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Avatars that left the board through its edge.
    pub exited: Vec<Color>,
    /// Avatars removed because their path looped.
    pub looped: Vec<Color>,
    /// Groups of avatars sharing a (position, port).
    pub collisions: Vec<Vec<Color>>,
}

impl MoveOutcome {
    /// Every avatar removed by the mutation.
    pub fn eliminated(&self) -> impl Iterator<Item = Color> + '_ {
        self.exited.iter().chain(&self.looped).copied()
    }

    #[must_use]
    pub fn eliminates(&self, color: Color) -> bool {
        self.eliminated().any(|c| c == color)
    }

    #[must_use]
    pub fn has_loop(&self) -> bool {
        !self.looped.is_empty()
    }
}

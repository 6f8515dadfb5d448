//! Immutable board snapshots.
//!
//! ## BoardState
//!
//! Tile placements plus the (position, port) of every live avatar.
//!
//! Uses `im` persistent maps, so cloning is O(1) and shares structure with
//! the original. A clone handed to a player, rule checker or observer is fully
//! independent: nothing the recipient does to its copy can reach the board
//! that produced it.

use im::{HashMap as ImHashMap, OrdMap};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TsuroError};
use crate::core::{BoardPosition, Color, Port, Tile};

/// Where an avatar stands: a tile position and one of its ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Avatar {
    pub position: BoardPosition,
    pub port: Port,
}

impl Avatar {
    #[must_use]
    pub const fn new(position: BoardPosition, port: Port) -> Self {
        Self { position, port }
    }

    /// The cell this avatar would move into next, or `None` if it is facing
    /// off the board.
    #[must_use]
    pub fn facing_position(self) -> Option<BoardPosition> {
        self.position.step(self.port.side())
    }
}

impl std::fmt::Display for Avatar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.position, self.port)
    }
}

/// Immutable snapshot of a board.
#[derive(Clone, Debug, Default)]
pub struct BoardState {
    tiles: ImHashMap<BoardPosition, Tile>,
    live_players: OrdMap<Color, Avatar>,
}

impl BoardState {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tile at `pos`, if any.
    #[must_use]
    pub fn get_tile(&self, pos: BoardPosition) -> Option<Tile> {
        self.tiles.get(&pos).copied()
    }

    /// The tile at raw coordinates. Off-board coordinates are simply empty.
    #[must_use]
    pub fn get_tile_at(&self, x: i32, y: i32) -> Option<Tile> {
        BoardPosition::checked(x, y).and_then(|pos| self.get_tile(pos))
    }

    /// Every placed tile, in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = (BoardPosition, Tile)> + '_ {
        self.tiles.iter().map(|(pos, tile)| (*pos, *tile))
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Live avatars ordered by color.
    pub fn live_players(&self) -> impl Iterator<Item = (Color, Avatar)> + '_ {
        self.live_players.iter().map(|(color, avatar)| (*color, *avatar))
    }

    #[must_use]
    pub fn live_colors(&self) -> Vec<Color> {
        self.live_players.keys().copied().collect()
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live_players.len()
    }

    #[must_use]
    pub fn is_live(&self, color: Color) -> bool {
        self.live_players.contains_key(&color)
    }

    /// Where `color` currently stands.
    pub fn get_position_of_player(&self, color: Color) -> Result<Avatar> {
        self.live_players
            .get(&color)
            .copied()
            .ok_or(TsuroError::PlayerNotFound(color))
    }

    /// The cell in front of `color`'s avatar, or `None` if the avatar is
    /// facing off the board.
    pub fn calculate_adjacent_position_of_player(&self, color: Color) -> Result<Option<BoardPosition>> {
        Ok(self.get_position_of_player(color)?.facing_position())
    }

    /// Whether all four cardinal neighbours of `pos` are empty.
    #[must_use]
    pub fn surrounding_positions_are_empty(&self, pos: BoardPosition) -> bool {
        pos.neighbors().all(|n| self.get_tile(n).is_none())
    }

    /// Whether an avatar on `port` at `pos` faces into the board.
    #[must_use]
    pub fn port_faces_interior(&self, pos: BoardPosition, port: Port) -> bool {
        pos.step(port.side()).is_some()
    }

    pub(crate) fn with_tile(&self, pos: BoardPosition, tile: Tile) -> Self {
        Self {
            tiles: self.tiles.update(pos, tile),
            live_players: self.live_players.clone(),
        }
    }

    pub(crate) fn with_avatar(&self, color: Color, avatar: Avatar) -> Self {
        Self {
            tiles: self.tiles.clone(),
            live_players: self.live_players.update(color, avatar),
        }
    }

    pub(crate) fn without_avatar(&self, color: Color) -> Self {
        Self {
            tiles: self.tiles.clone(),
            live_players: self.live_players.without(&color),
        }
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.live_players == other.live_players
            && self.tiles.len() == other.tiles.len()
            && self.tiles.iter().all(|(pos, tile)| {
                other
                    .tiles
                    .get(pos)
                    .is_some_and(|theirs| theirs.same_orientation(tile))
            })
    }
}

impl Eq for BoardState {}

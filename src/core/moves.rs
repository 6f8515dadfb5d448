//! Move types.
//!
//! Players answer with *actions* (what they want to play); the referee turns
//! those into *moves* (who plays what, where) that the board understands.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::color::Color;
use super::position::BoardPosition;
use super::tile::{Port, Tile};

/// The tiles offered to a player for one move. Never more than three.
pub type Hand = SmallVec<[Tile; 3]>;

/// A player's answer to an initial-move offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialAction {
    pub tile: Tile,
    pub port: Port,
    pub position: BoardPosition,
}

impl InitialAction {
    #[must_use]
    pub fn new(tile: Tile, port: Port, position: BoardPosition) -> Self {
        Self { tile, port, position }
    }
}

/// First placement of an avatar: a tile on an edge cell plus the port the
/// avatar starts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialMove {
    pub color: Color,
    pub position: BoardPosition,
    pub tile: Tile,
    pub port: Port,
}

impl InitialMove {
    #[must_use]
    pub fn new(color: Color, position: BoardPosition, tile: Tile, port: Port) -> Self {
        Self { color, position, tile, port }
    }

    #[must_use]
    pub fn from_action(color: Color, action: InitialAction) -> Self {
        Self::new(color, action.position, action.tile, action.port)
    }
}

/// A later placement in front of the acting player's avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntermediateMove {
    pub color: Color,
    pub position: BoardPosition,
    pub tile: Tile,
}

impl IntermediateMove {
    #[must_use]
    pub fn new(color: Color, position: BoardPosition, tile: Tile) -> Self {
        Self { color, position, tile }
    }
}

/// An entry in a board's move history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliedMove {
    Initial(InitialMove),
    Intermediate(IntermediateMove),
    /// A bare tile placement with no acting player.
    Placement { position: BoardPosition, tile: Tile },
}

impl AppliedMove {
    /// The player who made the move, if any.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self {
            AppliedMove::Initial(mv) => Some(mv.color),
            AppliedMove::Intermediate(mv) => Some(mv.color),
            AppliedMove::Placement { .. } => None,
        }
    }

    /// Where the tile went.
    #[must_use]
    pub fn position(&self) -> BoardPosition {
        match self {
            AppliedMove::Initial(mv) => mv.position,
            AppliedMove::Intermediate(mv) => mv.position,
            AppliedMove::Placement { position, .. } => *position,
        }
    }
}

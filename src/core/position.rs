//! Board coordinates.
//!
//! The board is a fixed 10x10 grid. `(0, 0)` is the top-left cell and
//! `(9, 9)` the bottom-right; `x` grows to the right and `y` grows downward.

use serde::{Deserialize, Serialize};

use super::error::{Result, TsuroError};

/// Smallest valid coordinate.
pub const MIN_COORDINATE: u8 = 0;

/// Largest valid coordinate.
pub const MAX_COORDINATE: u8 = 9;

/// Number of cells along one side of the board.
pub const BOARD_SIZE: usize = (MAX_COORDINATE - MIN_COORDINATE + 1) as usize;

/// A side of a tile (and of the board).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Unit step `(dx, dy)` leaving a cell through this side.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Side::Top => (0, -1),
            Side::Right => (1, 0),
            Side::Bottom => (0, 1),
            Side::Left => (-1, 0),
        }
    }
}

/// A cell on the board. Always within `[MIN_COORDINATE, MAX_COORDINATE]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct BoardPosition {
    x: u8,
    y: u8,
}

impl BoardPosition {
    /// Create a position, failing if either coordinate is off the board.
    pub fn new(x: u8, y: u8) -> Result<Self> {
        if x > MAX_COORDINATE || y > MAX_COORDINATE {
            return Err(TsuroError::InvalidPosition { x: i32::from(x), y: i32::from(y) });
        }
        Ok(Self { x, y })
    }

    /// Create a position from signed coordinates, returning `None` off the board.
    #[must_use]
    pub fn checked(x: i32, y: i32) -> Option<Self> {
        let min = i32::from(MIN_COORDINATE);
        let max = i32::from(MAX_COORDINATE);
        if (min..=max).contains(&x) && (min..=max).contains(&y) {
            Some(Self { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Both coordinates at an extreme.
    #[must_use]
    pub fn is_corner(self) -> bool {
        Self::is_extreme(self.x) && Self::is_extreme(self.y)
    }

    /// At least one coordinate at an extreme.
    #[must_use]
    pub fn is_edge(self) -> bool {
        Self::is_extreme(self.x) || Self::is_extreme(self.y)
    }

    /// The neighbouring cell across `side`, or `None` if that is off the board.
    #[must_use]
    pub fn step(self, side: Side) -> Option<Self> {
        let (dx, dy) = side.delta();
        Self::checked(i32::from(self.x) + i32::from(dx), i32::from(self.y) + i32::from(dy))
    }

    /// The (up to four) cardinal neighbours that exist on the board.
    pub fn neighbors(self) -> impl Iterator<Item = BoardPosition> {
        [Side::Top, Side::Right, Side::Bottom, Side::Left]
            .into_iter()
            .filter_map(move |side| self.step(side))
    }

    /// Iterate over every cell, row by row.
    pub fn all() -> impl Iterator<Item = BoardPosition> {
        (MIN_COORDINATE..=MAX_COORDINATE)
            .flat_map(|y| (MIN_COORDINATE..=MAX_COORDINATE).map(move |x| BoardPosition { x, y }))
    }

    fn is_extreme(coordinate: u8) -> bool {
        coordinate == MIN_COORDINATE || coordinate == MAX_COORDINATE
    }
}

impl TryFrom<(u8, u8)> for BoardPosition {
    type Error = TsuroError;

    fn try_from((x, y): (u8, u8)) -> Result<Self> {
        Self::new(x, y)
    }
}

impl From<BoardPosition> for (u8, u8) {
    fn from(pos: BoardPosition) -> Self {
        (pos.x, pos.y)
    }
}

impl std::fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

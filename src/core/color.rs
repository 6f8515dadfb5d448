//! Avatar colors.
//!
//! A game has at most five avatars, one per `Color`. Colors are the identity
//! key for everything that happens inside a single game; the administrator
//! maps its persistent `PlayerId`s onto colors per game.

use serde::{Deserialize, Serialize};

/// One of the five avatar colors.
///
/// Declaration order is the assignment order used by the referee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
    Red,
    Green,
    Blue,
}

impl Color {
    /// All colors in assignment order.
    pub const ALL: [Color; 5] = [Color::White, Color::Black, Color::Red, Color::Green, Color::Blue];

    /// The wire name of this color.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

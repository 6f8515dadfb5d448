//! Tournament-level player identity.
//!
//! ## PlayerId
//!
//! Minted by the administrator, unique for the lifetime of a tournament.
//! Inside a single game players are known only by their [`Color`](super::Color).
//!
//! ## Entrant
//!
//! A registered player's id and age. Ages order players within a game
//! (oldest moves first) and within a bracket.

use serde::{Deserialize, Serialize};

/// Administrator-unique player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A registered player as seen by bracket strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entrant {
    pub id: PlayerId,
    pub age: u32,
}

impl Entrant {
    #[must_use]
    pub const fn new(id: PlayerId, age: u32) -> Self {
        Self { id, age }
    }

    /// Ordering used everywhere players are lined up: oldest first, then by id.
    #[must_use]
    pub fn seniority(a: &Entrant, b: &Entrant) -> std::cmp::Ordering {
        b.age.cmp(&a.age).then(a.id.cmp(&b.id))
    }
}

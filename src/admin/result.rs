//! Tournament-level results, keyed by [`PlayerId`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::{Color, PlayerId};
use crate::rules::GameResult;

/// One finished game of a tournament.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Round the game was played in, starting at 1.
    pub round: u32,
    /// Tie groups, winners first. Cheaters are ranked last.
    pub ranking: Vec<BTreeSet<PlayerId>>,
    /// Players who cheated in this game.
    pub cheaters: BTreeSet<PlayerId>,
}

impl GameRecord {
    /// Translate a per-color game result, where `seats` maps each color
    /// played to the player behind it.
    #[must_use]
    pub fn from_game_result(round: u32, result: &GameResult, seats: &BTreeMap<Color, PlayerId>) -> Self {
        let translate = |colors: &BTreeSet<Color>| -> BTreeSet<PlayerId> {
            colors.iter().filter_map(|c| seats.get(c).copied()).collect()
        };
        Self {
            round,
            ranking: result.ranking.iter().map(translate).collect(),
            cheaters: translate(&result.cheaters),
        }
    }

    /// Every player in the game.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.ranking.iter().flatten().copied()
    }

    /// Zero-based rank group of `player`.
    #[must_use]
    pub fn rank_of(&self, player: PlayerId) -> Option<usize> {
        self.ranking.iter().position(|group| group.contains(&player))
    }
}

/// Final standings of a tournament.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResult {
    /// Tie groups, winners first. Every registered player appears exactly
    /// once; cheaters form the last group.
    pub leaderboard: Vec<BTreeSet<PlayerId>>,
    /// Players who cheated at any point.
    pub cheaters: BTreeSet<PlayerId>,
}

impl TournamentResult {
    /// The first leaderboard group.
    #[must_use]
    pub fn winners(&self) -> BTreeSet<PlayerId> {
        match self.leaderboard.first() {
            Some(group) if !group.is_subset(&self.cheaters) => group.clone(),
            _ => BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        !self.cheaters.contains(&player) && self.winners().contains(&player)
    }

    /// Every ranked player.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.leaderboard.iter().flatten().copied()
    }
}

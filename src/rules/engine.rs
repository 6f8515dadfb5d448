//! Rule checker trait and game results.
//!
//! A rule checker sits above a board. The board knows whether one placement
//! is physically possible; the rule checker additionally knows which tiles
//! were offered, which moves are self-destructive, and how the game's players
//! have fared round by round.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::core::error::Result;
use crate::core::{Color, InitialMove, IntermediateMove, Tile};

/// Result of a completed game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Tie groups, winners first. Every participant appears exactly once.
    pub ranking: Vec<BTreeSet<Color>>,
    /// Players removed for cheating. They are also ranked, in the last group.
    pub cheaters: BTreeSet<Color>,
}

impl GameResult {
    /// The first rank group, or nothing for an empty game.
    #[must_use]
    pub fn winners(&self) -> BTreeSet<Color> {
        self.ranking.first().cloned().unwrap_or_default()
    }

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, color: Color) -> bool {
        self.ranking.first().is_some_and(|group| group.contains(&color))
    }

    /// Zero-based rank group of `color`.
    #[must_use]
    pub fn rank_of(&self, color: Color) -> Option<usize> {
        self.ranking.iter().position(|group| group.contains(&color))
    }

    #[must_use]
    pub fn is_cheater(&self, color: Color) -> bool {
        self.cheaters.contains(&color)
    }

    /// Every ranked player.
    pub fn participants(&self) -> impl Iterator<Item = Color> + '_ {
        self.ranking.iter().flatten().copied()
    }
}

/// Legality judge and standings keeper for one game.
///
/// ## Implementation Notes
///
/// - `validate_*`: must never mutate the caller's state; simulate on a copy
/// - `tick`: called by the referee after every move, cheat removal included
/// - `get_leaderboard`: fails with `GameNotOver` until the game has ended
pub trait RuleChecker: Send {
    /// Check an initial move against the offered `choices`.
    fn validate_initial_move(&self, state: &BoardState, choices: &[Tile], mv: &InitialMove) -> Result<()>;

    /// Check an intermediate move against the offered `choices`.
    fn validate_move(&self, state: &BoardState, choices: &[Tile], mv: &IntermediateMove) -> Result<()>;

    /// Reset standings for a game with these players.
    fn begin_game(&mut self, participants: &[Color]);

    /// Whether `color` may still be asked for moves.
    fn can_player_move(&self, color: Color) -> bool;

    /// Flag `color` as a cheater for the rest of the game.
    fn mark_cheater(&mut self, color: Color);

    /// Record the state after `color`'s move in `round` (0 is the initial phase).
    fn tick(&mut self, state: &BoardState, round: u32, color: Color);

    /// Every initial move is in and at most one avatar is left.
    fn is_game_over(&self, state: &BoardState) -> bool;

    /// Final standings.
    fn get_leaderboard(&self) -> Result<GameResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_queries() {
        let result = GameResult {
            ranking: vec![
                BTreeSet::from([Color::Red]),
                BTreeSet::from([Color::White, Color::Black]),
                BTreeSet::from([Color::Green]),
            ],
            cheaters: BTreeSet::from([Color::Green]),
        };

        assert!(result.is_winner(Color::Red));
        assert!(!result.is_winner(Color::White));
        assert_eq!(result.rank_of(Color::Black), Some(1));
        assert_eq!(result.rank_of(Color::Blue), None);
        assert!(result.is_cheater(Color::Green));
        assert_eq!(result.participants().count(), 4);
        assert_eq!(result.winners(), BTreeSet::from([Color::Red]));
    }
}

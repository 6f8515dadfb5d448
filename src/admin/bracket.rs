//! Bracket strategies: how players are split into games and who goes home.

use std::collections::BTreeSet;

use crate::core::error::{Result, TsuroError};
use crate::core::{Entrant, PlayerId};
use crate::referee::{MAX_PLAYERS, MIN_PLAYERS};

use super::result::GameRecord;

/// Who leaves the tournament after a round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Elimination {
    /// Players knocked out by their results.
    pub eliminated: BTreeSet<PlayerId>,
    /// Players removed for cheating. Never also in `eliminated`.
    pub cheated: BTreeSet<PlayerId>,
}

impl Elimination {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.eliminated.is_empty() && self.cheated.is_empty()
    }

    #[must_use]
    pub fn removes(&self, player: PlayerId) -> bool {
        self.eliminated.contains(&player) || self.cheated.contains(&player)
    }
}

/// Splits players into games and decides eliminations.
pub trait BracketStrategy: Send {
    /// Split `live` into games of 3 to 5 players each, covering everyone.
    ///
    /// Fails with `StrategyCannotBucket` when that is impossible.
    fn bucket_players(&mut self, live: &[Entrant]) -> Result<Vec<Vec<PlayerId>>>;

    /// Decide who leaves after a round whose games produced `results`.
    fn eliminate_players(&mut self, live: &BTreeSet<PlayerId>, results: &[GameRecord]) -> Result<Elimination>;
}

/// Greedy age-ordered bucketing with single elimination.
///
/// Players are lined up oldest first and cut into games of five, except that
/// the last cuts are adjusted so no game has fewer than three players:
/// 6 players become 3 + 3, 7 become 4 + 3, 8 become 5 + 3, 9 become 5 + 4.
///
/// After a round, players in the top `surviving_ranks` groups of their game
/// stay in; everyone else, and every cheater, is out.
#[derive(Clone, Copy, Debug)]
pub struct SimpleBracketStrategy {
    surviving_ranks: usize,
}

impl Default for SimpleBracketStrategy {
    fn default() -> Self {
        Self { surviving_ranks: 1 }
    }
}

impl SimpleBracketStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the top `ranks` groups of each game instead of only the winners.
    #[must_use]
    pub fn with_surviving_ranks(mut self, ranks: usize) -> Self {
        self.surviving_ranks = ranks.max(1);
        self
    }

    /// Game sizes for `count` players, in dealing order.
    #[must_use]
    pub fn bucket_sizes(count: usize) -> Option<Vec<usize>> {
        if count < MIN_PLAYERS {
            return None;
        }
        let mut sizes = Vec::new();
        let mut remaining = count;
        while remaining > MAX_PLAYERS {
            let take = MAX_PLAYERS.min(remaining - MIN_PLAYERS);
            sizes.push(take);
            remaining -= take;
        }
        sizes.push(remaining);
        Some(sizes)
    }
}

impl BracketStrategy for SimpleBracketStrategy {
    fn bucket_players(&mut self, live: &[Entrant]) -> Result<Vec<Vec<PlayerId>>> {
        let sizes = Self::bucket_sizes(live.len()).ok_or(TsuroError::StrategyCannotBucket { players: live.len() })?;

        let mut lineup = live.to_vec();
        lineup.sort_by(Entrant::seniority);

        let mut players = lineup.into_iter().map(|e| e.id);
        Ok(sizes
            .into_iter()
            .map(|size| players.by_ref().take(size).collect())
            .collect())
    }

    fn eliminate_players(&mut self, live: &BTreeSet<PlayerId>, results: &[GameRecord]) -> Result<Elimination> {
        let played: BTreeSet<PlayerId> = results.iter().flat_map(GameRecord::players).collect();
        if &played != live {
            return Err(TsuroError::config(
                "game results cover a different set of players than the live players",
            ));
        }

        let cheated: BTreeSet<PlayerId> = results.iter().flat_map(|r| r.cheaters.iter().copied()).collect();
        let survivors: BTreeSet<PlayerId> = results
            .iter()
            .flat_map(|r| r.ranking.iter().filter(|g| !g.is_empty()).take(self.surviving_ranks))
            .flatten()
            .copied()
            .collect();
        let eliminated = live
            .iter()
            .copied()
            .filter(|p| !survivors.contains(p) && !cheated.contains(p))
            .collect();

        Ok(Elimination { eliminated, cheated })
    }
}

//! Tournament events.

use std::collections::BTreeSet;

use crate::core::PlayerId;

use super::result::{GameRecord, TournamentResult};

/// Something that happened during a tournament.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TournamentEvent {
    PlayerAdded { id: PlayerId, age: u32 },
    RoundStarted { round: u32, games: Vec<Vec<PlayerId>> },
    GameCompleted(GameRecord),
    PlayersEliminated { round: u32, players: BTreeSet<PlayerId> },
    PlayersCheated { round: u32, players: BTreeSet<PlayerId> },
    TournamentCompleted(TournamentResult),
}

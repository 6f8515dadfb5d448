//! Referee events.

use crate::board::BoardState;
use crate::core::{Color, InitialMove, IntermediateMove, PlayerFault, Tile, TsuroError};
use crate::rules::GameResult;

/// Why a player was removed from a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheatReason {
    /// The call timed out, panicked or returned an error.
    Fault(PlayerFault),
    /// The answer broke the rules.
    Rejected(TsuroError),
}

impl std::fmt::Display for CheatReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheatReason::Fault(fault) => write!(f, "{}", fault),
            CheatReason::Rejected(err) => write!(f, "{}", err),
        }
    }
}

/// Something that happened during a refereed game.
#[derive(Clone, Debug)]
pub enum RefereeEvent {
    PlayersAdded(Vec<Color>),
    InitialMoveOffered { color: Color, hand: Vec<Tile>, state: BoardState },
    InitialMovePlayed { color: Color, mv: InitialMove, state: BoardState },
    TurnOffered { color: Color, hand: Vec<Tile>, state: BoardState },
    TurnPlayed { color: Color, mv: IntermediateMove, state: BoardState },
    PlayerEliminated { color: Color, state: BoardState },
    CheaterRemoved { color: Color, reason: CheatReason, state: BoardState },
    GameOver(GameResult),
}

//! Error types.
//!
//! `TsuroError` is the single error type returned by every fallible engine
//! operation. Player and observer implementations live outside the engine and
//! return `anyhow::Result`; the referee converts their failures into a
//! [`PlayerFault`] and then into a cheat flag.

use std::time::Duration;

use thiserror::Error;

use super::color::Color;
use super::position::BoardPosition;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, TsuroError>;

/// Engine error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TsuroError {
    #[error("a game needs 3 to 5 players, got {count}")]
    InvalidPlayerCount { count: usize },

    #[error("illegal move: {0}")]
    IllegalMove(#[from] MoveViolation),

    #[error("player {0} is not on the board")]
    PlayerNotFound(Color),

    #[error("the game is not over")]
    GameNotOver,

    #[error("cannot split {players} players into games of 3 to 5")]
    StrategyCannotBucket { players: usize },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("player fault: {0}")]
    PlayerFault(#[from] PlayerFault),

    #[error("invalid tile: {0}")]
    InvalidTile(String),

    #[error("position ({x}, {y}) is off the board")]
    InvalidPosition { x: i32, y: i32 },

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl TsuroError {
    /// Shorthand for a lifecycle or setup error.
    pub fn config(message: impl Into<String>) -> Self {
        TsuroError::Configuration(message.into())
    }

    /// Shorthand for a wire protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        TsuroError::Protocol(message.into())
    }
}

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveViolation {
    #[error("{0} already holds a tile")]
    Occupied(BoardPosition),

    #[error("{0} is not on the edge of the board")]
    NotOnEdge(BoardPosition),

    #[error("a cell next to {0} already holds a tile")]
    NeighborsOccupied(BoardPosition),

    #[error("the starting port faces off the board")]
    PortFacesOutward,

    #[error("{0} has already been placed")]
    AlreadyPlaced(Color),

    #[error("{0} is not on the board")]
    NotLive(Color),

    #[error("the cell in front of {0} is off the board")]
    ExitsBoard(Color),

    #[error("{0} is not the cell in front of the player")]
    WrongPosition(BoardPosition),

    #[error("the tile was not among the offered choices")]
    TileNotOffered,

    #[error("expected {expected} tile choices, got {got}")]
    WrongChoiceCount { expected: usize, got: usize },

    #[error("the move is suicidal or makes a loop, and a safe option was offered")]
    AvoidableBadMove,
}

/// A failure raised while calling into a player implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerFault {
    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("the player implementation panicked")]
    Panicked,

    #[error("{0}")]
    Failed(String),
}

impl From<anyhow::Error> for PlayerFault {
    fn from(err: anyhow::Error) -> Self {
        PlayerFault::Failed(format!("{:#}", err))
    }
}

//! # rust-tsuro
//!
//! A Tsuro game and tournament engine for untrusted players.
//!
//! ## Design Principles
//!
//! 1. **Immutable Snapshots**: Board states are persistent `im` maps. Every
//!    player, rule checker and observer gets its own O(1) copy and cannot
//!    touch the live board.
//!
//! 2. **Untrusted Plugins**: Players may be slow, wrong, or hostile. Every
//!    call is time-bounded; any failure flags the player as a cheater and the
//!    game goes on. Observer failures are logged and dropped.
//!
//! 3. **Explicit Results**: Every mutating operation returns a
//!    [`Result`](core::Result) and leaves state untouched on failure.
//!
//! ## Modules
//!
//! - `core`: positions, ports, tiles, colors, moves, RNG, configuration, errors
//! - `board`: board states and the movement state machine
//! - `rules`: legality of moves and game standings
//! - `players`: the player interface and a reference strategy
//! - `referee`: runs one game
//! - `admin`: runs a knockout tournament of games
//! - `remote`: JSON over TCP between a server and remote players

pub mod core;
pub mod board;
pub mod rules;
pub mod players;
pub mod referee;
pub mod admin;
pub mod remote;

// Re-export commonly used types
pub use crate::core::{
    BoardPosition, Color, Entrant, GameRng, Hand, InitialAction, InitialMove, IntermediateMove,
    MoveViolation, PlayerFault, PlayerId, Port, RefereeConfig, Result, Tile, TilePattern,
    TileSupplyConfig, TournamentConfig, TsuroError,
};

pub use crate::board::{Avatar, Board, BoardEvent, BoardPhase, BoardState, MoveOutcome, PhysicalConstraints};

pub use crate::rules::{GameResult, RuleChecker, StandardRuleChecker};

pub use crate::players::{FirstLegalStrategy, InitialOffer, Player, Strategy, StrategyPlayer, TurnOffer};

pub use crate::referee::{PlayerHandle, Referee, RefereeEvent, TileSupply};

pub use crate::admin::{
    Administrator, BracketStrategy, SimpleBracketStrategy, TournamentEvent, TournamentResult,
};

pub use crate::remote::{JsonStream, RemoteAdmin, RemotePlayer, Server, ServerConfig};

//! Core types: positions, ports, tiles, colors, moves, RNG, configuration, errors.
//!
//! Everything here is a plain value type shared by the board, the rules, the
//! referee and the administrator.

pub mod color;
pub mod config;
pub mod error;
pub mod moves;
pub mod observer;
pub mod player;
pub mod position;
pub mod rng;
pub mod tile;

pub use color::Color;
pub use config::{RefereeConfig, TileSupplyConfig, TournamentConfig};
pub use error::{MoveViolation, PlayerFault, Result, TsuroError};
pub use moves::{AppliedMove, Hand, InitialAction, InitialMove, IntermediateMove};
pub use observer::{Observer, ObserverList};
pub use player::{Entrant, PlayerId};
pub use position::{BoardPosition, Side, BOARD_SIZE, MAX_COORDINATE, MIN_COORDINATE};
pub use rng::GameRng;
pub use tile::{Port, Tile, TilePattern, DECK_SIZE};

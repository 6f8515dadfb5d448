//! Single-game orchestration.
//!
//! ## Key Components
//!
//! - [`Referee`]: runs one game from seating to result delivery
//! - [`PlayerHandle`]: time-bounded calls into an untrusted player
//! - [`TileSupply`]: where hands come from
//! - [`RefereeEvent`]: what observers of a game are told

pub mod event;
pub mod handle;
#[allow(clippy::module_inception)]
pub mod referee;
pub mod supply;

pub use event::{CheatReason, RefereeEvent};
pub use handle::PlayerHandle;
pub use referee::{Referee, RefereeStage, MAX_PLAYERS, MIN_PLAYERS};
pub use supply::{tile_supply, DeterministicTiles, ShuffledTiles, TileSupply};

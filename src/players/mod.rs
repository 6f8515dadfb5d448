//! Players: the interface the referee talks to, and a local implementation.
//!
//! ## Key Components
//!
//! - [`Player`]: what the referee and administrator call
//! - [`Strategy`]: move selection, separated from the conversation
//! - [`FirstLegalStrategy`]: a simple deterministic strategy
//! - [`StrategyPlayer`]: adapts a strategy into a player

pub mod player;
pub mod strategy;
pub mod strategy_player;

pub use player::{InitialOffer, Notification, Player, TurnOffer};
pub use strategy::{FirstLegalStrategy, Strategy};
pub use strategy_player::{PlayerEvent, StrategyPlayer};

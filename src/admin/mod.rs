//! Tournaments.
//!
//! ## Key Components
//!
//! - [`Administrator`]: registers players and runs rounds of refereed games
//! - [`BracketStrategy`]: splits players into games and picks who goes home
//! - [`SimpleBracketStrategy`]: age-ordered buckets, winners advance
//! - [`TournamentResult`]: the final leaderboard

pub mod administrator;
pub mod bracket;
pub mod event;
pub mod result;

pub use administrator::Administrator;
pub use bracket::{BracketStrategy, Elimination, SimpleBracketStrategy};
pub use event::TournamentEvent;
pub use result::{GameRecord, TournamentResult};

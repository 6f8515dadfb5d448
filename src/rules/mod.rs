//! Rule checking for a single game.
//!
//! The referee calls into a `RuleChecker` to judge every move and to keep
//! standings; the board underneath only knows physical legality.

pub mod checker;
pub mod engine;

pub use checker::StandardRuleChecker;
pub use engine::{GameResult, RuleChecker};

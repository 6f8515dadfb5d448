//! The board: immutable snapshots and the mutable engine that evolves them.
//!
//! ## Key Components
//!
//! - [`BoardState`]: persistent snapshot, safe to share with untrusted code
//! - [`Board`]: owns the authoritative state; all mutations are atomic
//! - [`PhysicalConstraints`]: placement checks usable without a board
//! - [`BoardEvent`] / [`MoveOutcome`]: what a committed move did

#[allow(clippy::module_inception)]
pub mod board;
pub mod constraint;
pub mod event;
pub mod state;

pub use board::{Board, BoardPhase};
pub use constraint::PhysicalConstraints;
pub use event::{BoardEvent, MoveOutcome};
pub use state::{Avatar, BoardState};

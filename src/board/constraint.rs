//! Physical placement constraints.
//!
//! Kept apart from [`Board`](super::Board) so strategies can check candidate
//! initial placements against a snapshot without building a board.

use crate::core::error::Result;
use crate::core::{BoardPosition, MoveViolation, Port};

use super::state::BoardState;

/// Stateless checks for initial placements.
pub struct PhysicalConstraints;

impl PhysicalConstraints {
    /// A cell accepts an initial placement if it is an empty edge cell with
    /// no tile in any cardinal neighbour.
    pub fn is_valid_initial_position(state: &BoardState, pos: BoardPosition) -> Result<()> {
        if state.get_tile(pos).is_some() {
            return Err(MoveViolation::Occupied(pos).into());
        }
        if !pos.is_edge() {
            return Err(MoveViolation::NotOnEdge(pos).into());
        }
        if !state.surrounding_positions_are_empty(pos) {
            return Err(MoveViolation::NeighborsOccupied(pos).into());
        }
        Ok(())
    }

    /// A valid initial position whose starting port faces into the board.
    pub fn is_valid_initial_port(state: &BoardState, pos: BoardPosition, port: Port) -> Result<()> {
        Self::is_valid_initial_position(state, pos)?;
        if !state.port_faces_interior(pos, port) {
            return Err(MoveViolation::PortFacesOutward.into());
        }
        Ok(())
    }
}

//! Move-selection strategies.

use anyhow::{anyhow, bail, Context};

use crate::board::{BoardState, PhysicalConstraints};
use crate::core::{BoardPosition, Color, InitialAction, IntermediateMove, Port, Tile, MAX_COORDINATE, MIN_COORDINATE};
use crate::rules::StandardRuleChecker;

use super::player::{InitialOffer, TurnOffer};

/// Decides moves for a [`StrategyPlayer`](super::StrategyPlayer).
pub trait Strategy: Send {
    fn initial_move(&mut self, color: Color, offer: &InitialOffer) -> anyhow::Result<InitialAction>;

    fn take_turn(&mut self, color: Color, offer: &TurnOffer) -> anyhow::Result<Tile>;
}

/// A simple deterministic strategy.
///
/// Initial move: the last offered tile, on the first free edge cell found
/// walking clockwise around the board from `(1, 0)`, on the first port
/// (clockwise from the top-left) that faces inward.
///
/// Turn: the first tile and rotation that is neither suicidal nor loopy,
/// falling back to the first tile as offered.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLegalStrategy;

impl FirstLegalStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Edge cells clockwise from `(1, 0)`, ending at `(0, 0)`.
    fn edge_walk() -> impl Iterator<Item = BoardPosition> {
        let (min, max) = (MIN_COORDINATE, MAX_COORDINATE);
        let top = (min + 1..=max).map(move |x| (x, min));
        let right = (min + 1..=max).map(move |y| (max, y));
        let bottom = (min..max).rev().map(move |x| (x, max));
        let left = (min..max).rev().map(move |y| (min, y));
        top.chain(right)
            .chain(bottom)
            .chain(left)
            .filter_map(|(x, y)| BoardPosition::new(x, y).ok())
    }

    fn first_inward_port(state: &BoardState, pos: BoardPosition) -> Option<Port> {
        Port::ALL
            .into_iter()
            .find(|&port| PhysicalConstraints::is_valid_initial_port(state, pos, port).is_ok())
    }
}

impl Strategy for FirstLegalStrategy {
    fn initial_move(&mut self, _color: Color, offer: &InitialOffer) -> anyhow::Result<InitialAction> {
        let tile = *offer.hand.last().context("no tiles offered")?;
        for pos in Self::edge_walk() {
            if PhysicalConstraints::is_valid_initial_position(&offer.state, pos).is_err() {
                continue;
            }
            if let Some(port) = Self::first_inward_port(&offer.state, pos) {
                return Ok(InitialAction::new(tile, port, pos));
            }
        }
        bail!("no valid initial placement left on the board")
    }

    fn take_turn(&mut self, color: Color, offer: &TurnOffer) -> anyhow::Result<Tile> {
        let first = *offer.hand.first().context("no tiles offered")?;
        let position = offer
            .state
            .calculate_adjacent_position_of_player(color)?
            .ok_or_else(|| anyhow!("{} is facing off the board", color))?;

        for tile in &offer.hand {
            for rotation in tile.all_rotations() {
                let candidate = IntermediateMove::new(color, position, rotation);
                if !StandardRuleChecker::is_move_bad(&offer.state, &candidate)? {
                    return Ok(rotation);
                }
            }
        }
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::core::{Hand, InitialMove};

    fn pos(x: u8, y: u8) -> BoardPosition {
        BoardPosition::new(x, y).unwrap()
    }

    #[test]
    fn test_edge_walk_covers_each_edge_cell_once() {
        let cells: Vec<_> = FirstLegalStrategy::edge_walk().collect();
        assert_eq!(cells.len(), 36);
        assert_eq!(cells[0], pos(1, 0));
        assert_eq!(*cells.last().unwrap(), pos(0, 0));
        assert!(cells.iter().all(|p| p.is_edge()));
    }

    #[test]
    fn test_initial_move_on_empty_board() {
        let hand: Hand = Tile::deck()[..3].iter().copied().collect();
        let offer = InitialOffer { hand: hand.clone(), state: BoardState::new() };
        let action = FirstLegalStrategy.initial_move(Color::White, &offer).unwrap();

        assert_eq!(action.position, pos(1, 0));
        assert!(action.tile.same_orientation(&hand[2]));
        // Top ports face off the board at y = 0; the first inward port is RightTop.
        assert_eq!(action.port, Port::RightTop);
    }

    #[test]
    fn test_initial_move_skips_crowded_cells() {
        let mut board = Board::new();
        board
            .initial_move(InitialMove::new(Color::Black, pos(1, 0), Tile::deck()[0], Port::BottomLeft))
            .unwrap();
        let hand: Hand = Tile::deck()[..3].iter().copied().collect();
        let offer = InitialOffer { hand, state: board.snapshot() };
        let action = FirstLegalStrategy.initial_move(Color::White, &offer).unwrap();
        assert_eq!(action.position, pos(3, 0));
    }

    #[test]
    fn test_turn_avoids_suicide() {
        let straight = Tile::from_pairs(&[(0, 5), (1, 4), (2, 7), (3, 6)]).unwrap();
        let turn_back = Tile::deck()[0];
        let board = Board::create_board_from_initial_placements(&[InitialMove::new(
            Color::White,
            pos(8, 0),
            straight,
            Port::RightTop,
        )])
        .unwrap();

        let hand: Hand = [straight, turn_back].into_iter().collect();
        let offer = TurnOffer { hand, state: board.snapshot() };
        let tile = FirstLegalStrategy.take_turn(Color::White, &offer).unwrap();
        assert_eq!(tile, turn_back);
    }
}

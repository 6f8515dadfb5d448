//! The standard rule checker.
//!
//! ## Legality
//!
//! A move must use a tile from the offered hand (any rotation), the hand must
//! have the expected size, and the placement must be physically valid.
//!
//! An intermediate move is *bad* if the acting player leaves the board
//! without a loop (suicide) or if any avatar ends up in a loop. A bad move is
//! illegal only when some other orientation of some offered tile is not bad;
//! when every option is bad the player may pick any of them.
//!
//! ## Standings
//!
//! Players eliminated during the same round share a rank. Later rounds rank
//! higher, players still on the board at the end rank highest, and cheaters
//! form the last group.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::board::{Board, BoardState, MoveOutcome};
use crate::core::config::{INITIAL_HAND_SIZE, TURN_HAND_SIZE};
use crate::core::error::{Result, TsuroError};
use crate::core::{Color, InitialMove, IntermediateMove, MoveViolation, RefereeConfig, Tile};

use super::engine::{GameResult, RuleChecker};

/// Rule checker for standard Tsuro.
#[derive(Clone, Debug)]
pub struct StandardRuleChecker {
    initial_hand_size: usize,
    turn_hand_size: usize,
    participants: BTreeSet<Color>,
    pending_initial: BTreeSet<Color>,
    live: BTreeSet<Color>,
    eliminated: BTreeMap<u32, BTreeSet<Color>>,
    cheaters: BTreeSet<Color>,
}

impl Default for StandardRuleChecker {
    fn default() -> Self {
        Self::with_hand_sizes(INITIAL_HAND_SIZE, TURN_HAND_SIZE)
    }
}

impl StandardRuleChecker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A checker expecting the hand sizes a referee with `config` deals.
    #[must_use]
    pub fn from_config(config: &RefereeConfig) -> Self {
        Self::with_hand_sizes(config.initial_hand_size, config.turn_hand_size)
    }

    #[must_use]
    pub fn with_hand_sizes(initial: usize, turn: usize) -> Self {
        Self {
            initial_hand_size: initial,
            turn_hand_size: turn,
            participants: BTreeSet::new(),
            pending_initial: BTreeSet::new(),
            live: BTreeSet::new(),
            eliminated: BTreeMap::new(),
            cheaters: BTreeSet::new(),
        }
    }

    /// Play `mv` on a throwaway board built from `state`.
    pub fn simulate(state: &BoardState, mv: &IntermediateMove) -> Result<MoveOutcome> {
        Board::from_state(state.clone()).place_tile(*mv)
    }

    /// Whether `mv` is suicidal for its player or puts anyone in a loop.
    pub fn is_move_bad(state: &BoardState, mv: &IntermediateMove) -> Result<bool> {
        let outcome = Self::simulate(state, mv)?;
        Ok(outcome.has_loop() || outcome.exited.contains(&mv.color))
    }

    /// Whether any orientation of any tile in `choices` is a good move for
    /// `color` at `mv`'s position.
    pub fn has_good_option(state: &BoardState, choices: &[Tile], mv: &IntermediateMove) -> Result<bool> {
        for choice in choices {
            for rotation in choice.all_rotations() {
                let candidate = IntermediateMove::new(mv.color, mv.position, rotation);
                if !Self::is_move_bad(state, &candidate)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn check_choices(choices: &[Tile], tile: &Tile, expected: usize) -> Result<()> {
        if choices.len() != expected {
            return Err(MoveViolation::WrongChoiceCount {
                expected,
                got: choices.len(),
            }
            .into());
        }
        if !choices.contains(tile) {
            return Err(MoveViolation::TileNotOffered.into());
        }
        Ok(())
    }
}

impl RuleChecker for StandardRuleChecker {
    fn validate_initial_move(&self, state: &BoardState, choices: &[Tile], mv: &InitialMove) -> Result<()> {
        Self::check_choices(choices, &mv.tile, self.initial_hand_size)?;
        Board::from_state(state.clone()).validate_initial_move(mv)
    }

    fn validate_move(&self, state: &BoardState, choices: &[Tile], mv: &IntermediateMove) -> Result<()> {
        Self::check_choices(choices, &mv.tile, self.turn_hand_size)?;
        Board::from_state(state.clone()).validate_place_tile(mv)?;

        if Self::is_move_bad(state, mv)? {
            if Self::has_good_option(state, choices, mv)? {
                return Err(MoveViolation::AvoidableBadMove.into());
            }
            debug!(color = %mv.color, "every offered option is bad; accepting");
        }
        Ok(())
    }

    fn begin_game(&mut self, participants: &[Color]) {
        let fresh = Self::with_hand_sizes(self.initial_hand_size, self.turn_hand_size);
        *self = Self {
            participants: participants.iter().copied().collect(),
            pending_initial: participants.iter().copied().collect(),
            ..fresh
        };
    }

    fn can_player_move(&self, color: Color) -> bool {
        self.participants.contains(&color) && !self.cheaters.contains(&color)
    }

    fn mark_cheater(&mut self, color: Color) {
        self.cheaters.insert(color);
        self.pending_initial.remove(&color);
        self.live.remove(&color);
        for group in self.eliminated.values_mut() {
            group.remove(&color);
        }
    }

    fn tick(&mut self, state: &BoardState, round: u32, color: Color) {
        self.pending_initial.remove(&color);
        self.live = state
            .live_players()
            .map(|(c, _)| c)
            .filter(|c| !self.cheaters.contains(c))
            .collect();

        let already: BTreeSet<Color> = self.eliminated.values().flatten().copied().collect();
        let out: BTreeSet<Color> = self
            .participants
            .iter()
            .copied()
            .filter(|c| {
                !self.pending_initial.contains(c)
                    && !self.live.contains(c)
                    && !self.cheaters.contains(c)
                    && !already.contains(c)
            })
            .collect();

        if !out.is_empty() {
            debug!(round, players = ?out, "players eliminated");
            self.eliminated.entry(round).or_default().extend(out);
        }
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        self.pending_initial.is_empty() && state.live_count() <= 1
    }

    fn get_leaderboard(&self) -> Result<GameResult> {
        if !self.pending_initial.is_empty() || self.live.len() > 1 {
            return Err(TsuroError::GameNotOver);
        }

        let mut ranking = Vec::new();
        if !self.live.is_empty() {
            ranking.push(self.live.clone());
        }
        ranking.extend(self.eliminated.values().rev().filter(|g| !g.is_empty()).cloned());
        if !self.cheaters.is_empty() {
            ranking.push(self.cheaters.clone());
        }

        Ok(GameResult {
            ranking,
            cheaters: self.cheaters.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Avatar;
    use crate::core::{BoardPosition, Port};

    fn pos(x: u8, y: u8) -> BoardPosition {
        BoardPosition::new(x, y).unwrap()
    }

    fn straight() -> Tile {
        Tile::from_pairs(&[(0, 5), (1, 4), (2, 7), (3, 6)]).unwrap()
    }

    fn hand(n: usize) -> Vec<Tile> {
        Tile::deck()[..n].to_vec()
    }

    fn state_with_white_at(x: u8, y: u8, port: Port) -> BoardState {
        let board = Board::create_board_from_initial_placements(&[InitialMove::new(
            Color::White,
            pos(x, y),
            straight(),
            port,
        )])
        .unwrap();
        let state = board.snapshot();
        assert_eq!(state.get_position_of_player(Color::White).unwrap(), Avatar::new(pos(x, y), port));
        state
    }

    #[test]
    fn test_wrong_hand_size() {
        let checker = StandardRuleChecker::new();
        let mv = InitialMove::new(Color::White, pos(0, 2), Tile::deck()[0], Port::RightTop);
        let err = checker.validate_initial_move(&BoardState::new(), &hand(2), &mv).unwrap_err();
        assert_eq!(err, TsuroError::IllegalMove(MoveViolation::WrongChoiceCount { expected: 3, got: 2 }));
    }

    #[test]
    fn test_tile_must_be_offered() {
        let checker = StandardRuleChecker::new();
        let mv = InitialMove::new(Color::White, pos(0, 2), Tile::deck()[5], Port::RightTop);
        let err = checker.validate_initial_move(&BoardState::new(), &hand(3), &mv).unwrap_err();
        assert_eq!(err, TsuroError::IllegalMove(MoveViolation::TileNotOffered));

        let rotated = InitialMove::new(Color::White, pos(0, 2), Tile::deck()[2].rotate(), Port::RightTop);
        assert!(checker.validate_initial_move(&BoardState::new(), &hand(3), &rotated).is_ok());
    }

    #[test]
    fn test_avoidable_suicide_rejected() {
        // White at (8, 0) facing right: a straight tile at (9, 0) walks it off the board.
        let state = state_with_white_at(8, 0, Port::RightTop);
        let checker = StandardRuleChecker::new();
        let turn_back = Tile::from_pairs(&[(0, 1), (2, 3), (4, 5), (6, 7)]).unwrap();
        let choices = vec![straight(), turn_back];

        let suicide = IntermediateMove::new(Color::White, pos(9, 0), straight());
        assert!(StandardRuleChecker::is_move_bad(&state, &suicide).unwrap());
        assert_eq!(
            checker.validate_move(&state, &choices, &suicide),
            Err(TsuroError::IllegalMove(MoveViolation::AvoidableBadMove))
        );
    }

    #[test]
    fn test_unavoidable_suicide_accepted() {
        let state = state_with_white_at(8, 0, Port::RightTop);
        let checker = StandardRuleChecker::new();
        // Straight tiles lead off the right edge in every orientation.
        let choices = vec![straight(), straight()];
        let mv = IntermediateMove::new(Color::White, pos(9, 0), straight().rotate());
        assert!(StandardRuleChecker::is_move_bad(&state, &mv).unwrap());
        assert!(checker.validate_move(&state, &choices, &mv).is_ok());
    }

    #[test]
    fn test_validation_does_not_touch_state() {
        let state = state_with_white_at(0, 2, Port::RightTop);
        let before = state.clone();
        let checker = StandardRuleChecker::new();
        let mv = IntermediateMove::new(Color::White, pos(1, 2), straight());
        checker.validate_move(&state, &[straight(), straight()], &mv).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_leaderboard_before_end() {
        let mut checker = StandardRuleChecker::new();
        checker.begin_game(&[Color::White, Color::Black, Color::Red]);
        assert_eq!(checker.get_leaderboard(), Err(TsuroError::GameNotOver));
    }

    #[test]
    fn test_standings_group_by_round() {
        let mut checker = StandardRuleChecker::new();
        let players = [Color::White, Color::Black, Color::Red];
        checker.begin_game(&players);

        let mut board = Board::new();
        board.initial_move(InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop)).unwrap();
        checker.tick(board.state(), 0, Color::White);
        board.initial_move(InitialMove::new(Color::Black, pos(0, 6), straight(), Port::RightTop)).unwrap();
        checker.tick(board.state(), 0, Color::Black);

        checker.mark_cheater(Color::Red);
        checker.tick(board.state(), 0, Color::Red);
        assert!(!checker.can_player_move(Color::Red));
        assert!(!checker.is_game_over(board.state()));

        board.remove_player(Color::Black).unwrap();
        checker.tick(board.state(), 1, Color::Black);
        assert!(checker.is_game_over(board.state()));

        let result = checker.get_leaderboard().unwrap();
        assert_eq!(
            result.ranking,
            vec![
                BTreeSet::from([Color::White]),
                BTreeSet::from([Color::Black]),
                BTreeSet::from([Color::Red]),
            ]
        );
        assert_eq!(result.cheaters, BTreeSet::from([Color::Red]));
    }
}

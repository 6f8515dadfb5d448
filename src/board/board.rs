//! The mutable board.
//!
//! ## Atomicity
//!
//! Every mutation validates first, then builds the new state on a clone of
//! the current one and swaps it in only once the whole move (placement plus
//! all resulting movement) is done. A failed call leaves the state untouched
//! and notifies no observers.
//!
//! ## Movement resolution
//!
//! After a tile lands, every live avatar follows its path tile by tile until
//! it faces an empty cell (stops), faces off the board (exits), or revisits a
//! (position, port) it already passed in this pass (loops). Exited avatars
//! are removed. Avatars that end on the same (position, port) coexist and are
//! reported as a collision.
//!
//! ## Loops
//!
//! A player's tile that puts anyone in a loop is not placed. The board goes
//! back to how it was before the move, minus the looped avatars, and the move
//! still counts as played.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::core::error::{Result, TsuroError};
use crate::core::{
    AppliedMove, BoardPosition, Color, InitialMove, IntermediateMove, MoveViolation, Observer,
    ObserverList, Tile,
};

use super::constraint::PhysicalConstraints;
use super::event::{BoardEvent, MoveOutcome};
use super::state::{Avatar, BoardState};

/// Lifecycle of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardPhase {
    /// No tile placed yet.
    Empty,
    /// At least one tile and at least one live avatar.
    InProgress,
    /// Tiles placed and no avatar left.
    Terminal,
}

/// Owner of the authoritative [`BoardState`].
#[derive(Debug, Default)]
pub struct Board {
    state: BoardState,
    history: Vector<AppliedMove>,
    observers: ObserverList<BoardEvent>,
}

impl Board {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A board starting from an existing snapshot, with no history.
    #[must_use]
    pub fn from_state(state: BoardState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// The current state. Clone it to hand it out.
    #[must_use]
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// An independent copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> BoardState {
        self.state.clone()
    }

    /// Moves applied to this board, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<AppliedMove> {
        &self.history
    }

    #[must_use]
    pub fn phase(&self) -> BoardPhase {
        if self.state.tile_count() == 0 {
            BoardPhase::Empty
        } else if self.state.live_count() == 0 {
            BoardPhase::Terminal
        } else {
            BoardPhase::InProgress
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer<BoardEvent>>) {
        self.observers.add(observer);
    }

    /// Check an initial move against the physical placement rules.
    pub fn validate_initial_move(&self, mv: &InitialMove) -> Result<()> {
        if self.state.is_live(mv.color) {
            return Err(MoveViolation::AlreadyPlaced(mv.color).into());
        }
        PhysicalConstraints::is_valid_initial_port(&self.state, mv.position, mv.port)
    }

    /// Validate and apply an initial move.
    pub fn initial_move(&mut self, mv: InitialMove) -> Result<MoveOutcome> {
        self.validate_initial_move(&mv)?;
        self.initial_move_with_scissors(mv)
    }

    /// Apply an initial move without validation.
    ///
    /// Only for replaying moves already known to be legal.
    pub fn initial_move_with_scissors(&mut self, mv: InitialMove) -> Result<MoveOutcome> {
        let working = self
            .state
            .with_tile(mv.position, mv.tile)
            .with_avatar(mv.color, Avatar::new(mv.position, mv.port));
        let placed = BoardEvent::Placed {
            color: Some(mv.color),
            position: mv.position,
            tile: mv.tile,
        };
        Ok(self.commit(working, placed, AppliedMove::Initial(mv)))
    }

    /// Check that `mv` places a tile on the empty cell directly in front of a
    /// live avatar.
    pub fn validate_place_tile(&self, mv: &IntermediateMove) -> Result<()> {
        if !self.state.is_live(mv.color) {
            return Err(MoveViolation::NotLive(mv.color).into());
        }
        let target = self
            .state
            .calculate_adjacent_position_of_player(mv.color)?
            .ok_or(MoveViolation::ExitsBoard(mv.color))?;
        if target != mv.position {
            return Err(MoveViolation::WrongPosition(mv.position).into());
        }
        if self.state.get_tile(target).is_some() {
            return Err(MoveViolation::Occupied(target).into());
        }
        Ok(())
    }

    /// Validate and apply an intermediate move.
    ///
    /// If the tile closes a loop it is left off the board and only the
    /// looped avatars are removed.
    pub fn place_tile(&mut self, mv: IntermediateMove) -> Result<MoveOutcome> {
        self.validate_place_tile(&mv)?;
        Ok(self.apply_intermediate(mv))
    }

    fn apply_intermediate(&mut self, mv: IntermediateMove) -> MoveOutcome {
        let working = self.state.with_tile(mv.position, mv.tile);
        let mut events = vec![BoardEvent::Placed {
            color: Some(mv.color),
            position: mv.position,
            tile: mv.tile,
        }];
        let (state, outcome) = resolve_movement(working, &mut events);
        if !outcome.has_loop() {
            return self.finish(state, events, outcome, AppliedMove::Intermediate(mv));
        }

        let mut state = self.state.clone();
        for &color in &outcome.looped {
            state = state.without_avatar(color);
        }
        let events = outcome.looped.iter().map(|&color| BoardEvent::Looped { color }).collect();
        let outcome = MoveOutcome {
            looped: outcome.looped,
            ..MoveOutcome::default()
        };
        self.finish(state, events, outcome, AppliedMove::Intermediate(mv))
    }

    /// Place a tile anywhere empty, with no other validation.
    ///
    /// Only for replaying moves already known to be legal.
    pub fn place_tile_at_index_with_scissors(&mut self, tile: Tile, position: BoardPosition) -> Result<MoveOutcome> {
        if self.state.get_tile(position).is_some() {
            return Err(MoveViolation::Occupied(position).into());
        }
        let working = self.state.with_tile(position, tile);
        let placed = BoardEvent::Placed {
            color: None,
            position,
            tile,
        };
        Ok(self.commit(working, placed, AppliedMove::Placement { position, tile }))
    }

    /// Take an avatar off the board (used for cheaters).
    pub fn remove_player(&mut self, color: Color) -> Result<()> {
        if !self.state.is_live(color) {
            return Err(TsuroError::PlayerNotFound(color));
        }
        self.state = self.state.without_avatar(color);
        debug!(%color, "removed avatar");
        Ok(())
    }

    /// Build a board by applying initial moves in order.
    pub fn create_board_from_initial_placements(initial: &[InitialMove]) -> Result<Board> {
        let mut board = Board::new();
        for mv in initial {
            board.initial_move(*mv)?;
        }
        Ok(board)
    }

    /// Build a board by applying initial moves, then intermediate moves.
    pub fn create_board_from_moves(initial: &[InitialMove], moves: &[IntermediateMove]) -> Result<Board> {
        let mut board = Self::create_board_from_initial_placements(initial)?;
        for mv in moves {
            board.place_tile(*mv)?;
        }
        Ok(board)
    }

    /// Rebuild a board from a recorded history without validation.
    pub fn replay<'a>(history: impl IntoIterator<Item = &'a AppliedMove>) -> Result<Board> {
        let mut board = Board::new();
        for applied in history {
            match *applied {
                AppliedMove::Initial(mv) => board.initial_move_with_scissors(mv)?,
                AppliedMove::Intermediate(mv) => board.apply_intermediate(mv),
                AppliedMove::Placement { position, tile } => board.place_tile_at_index_with_scissors(tile, position)?,
            };
        }
        Ok(board)
    }

    fn commit(&mut self, working: BoardState, placed: BoardEvent, applied: AppliedMove) -> MoveOutcome {
        let mut events = vec![placed];
        let (state, outcome) = resolve_movement(working, &mut events);
        self.finish(state, events, outcome, applied)
    }

    fn finish(
        &mut self,
        state: BoardState,
        events: Vec<BoardEvent>,
        outcome: MoveOutcome,
        applied: AppliedMove,
    ) -> MoveOutcome {
        debug!(
            ?applied,
            exited = ?outcome.exited,
            looped = ?outcome.looped,
            live = state.live_count(),
            "applied move"
        );

        self.state = state;
        self.history.push_back(applied);
        for event in &events {
            self.observers.notify(event);
        }
        outcome
    }
}

enum PathEnd {
    Stopped(Avatar),
    Exited,
    Looped,
}

fn follow_path(state: &BoardState, start: Avatar) -> PathEnd {
    let mut seen: FxHashSet<Avatar> = FxHashSet::default();
    let mut current = start;
    loop {
        if !seen.insert(current) {
            return PathEnd::Looped;
        }
        let Some(next) = current.facing_position() else {
            return PathEnd::Exited;
        };
        let Some(tile) = state.get_tile(next) else {
            return PathEnd::Stopped(current);
        };
        current = Avatar::new(next, tile.connected(current.port.facing()));
    }
}

fn resolve_movement(mut state: BoardState, events: &mut Vec<BoardEvent>) -> (BoardState, MoveOutcome) {
    let mut outcome = MoveOutcome::default();

    for (color, start) in state.live_players().collect::<Vec<_>>() {
        match follow_path(&state, start) {
            PathEnd::Stopped(end) => {
                if end != start {
                    events.push(BoardEvent::Moved { color, from: start, to: end });
                    state = state.with_avatar(color, end);
                }
            }
            PathEnd::Exited => {
                events.push(BoardEvent::Exited { color });
                outcome.exited.push(color);
            }
            PathEnd::Looped => {
                events.push(BoardEvent::Looped { color });
                outcome.looped.push(color);
            }
        }
    }

    for color in outcome.eliminated() {
        state = state.without_avatar(color);
    }

    let mut spots: FxHashMap<Avatar, Vec<Color>> = FxHashMap::default();
    for (color, avatar) in state.live_players() {
        spots.entry(avatar).or_default().push(color);
    }
    let mut shared: Vec<(Avatar, Vec<Color>)> = spots.into_iter().filter(|(_, colors)| colors.len() > 1).collect();
    shared.sort();
    for (at, colors) in shared {
        events.push(BoardEvent::Collided { colors: colors.clone(), at });
        outcome.collisions.push(colors);
    }

    (state, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Port;
    use std::sync::{Arc, Mutex};

    fn pos(x: u8, y: u8) -> BoardPosition {
        BoardPosition::new(x, y).unwrap()
    }

    fn straight() -> Tile {
        // Every port connects straight across.
        Tile::from_pairs(&[(0, 5), (1, 4), (2, 7), (3, 6)]).unwrap()
    }

    #[test]
    fn test_initial_move_and_repeat_rejected() {
        let mut board = Board::new();
        let mv = InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop);
        board.initial_move(mv).unwrap();
        assert_eq!(board.phase(), BoardPhase::InProgress);

        let again = InitialMove::new(Color::Black, pos(0, 2), straight(), Port::RightTop);
        assert_eq!(
            board.initial_move(again),
            Err(TsuroError::IllegalMove(MoveViolation::Occupied(pos(0, 2))))
        );
    }

    #[test]
    fn test_player_already_placed() {
        let mut board = Board::new();
        board
            .initial_move(InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop))
            .unwrap();
        let err = board
            .initial_move(InitialMove::new(Color::White, pos(0, 6), straight(), Port::RightTop))
            .unwrap_err();
        assert_eq!(err, TsuroError::IllegalMove(MoveViolation::AlreadyPlaced(Color::White)));
    }

    #[test]
    fn test_place_tile_moves_avatar_along_path() {
        let mut board = Board::new();
        board
            .initial_move(InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop))
            .unwrap();
        let outcome = board
            .place_tile(IntermediateMove::new(Color::White, pos(1, 2), straight()))
            .unwrap();

        assert!(outcome.exited.is_empty());
        let avatar = board.state().get_position_of_player(Color::White).unwrap();
        assert_eq!(avatar, Avatar::new(pos(1, 2), Port::RightTop));
    }

    #[test]
    fn test_exit_removes_avatar() {
        let mut board = Board::new();
        // Facing right from (8, 0): a straight tile at (9, 0) carries the avatar off the right edge.
        board
            .initial_move(InitialMove::new(Color::White, pos(8, 0), straight(), Port::RightTop))
            .unwrap();
        let outcome = board
            .place_tile(IntermediateMove::new(Color::White, pos(9, 0), straight()))
            .unwrap();
        assert_eq!(outcome.exited, vec![Color::White]);
        assert_eq!(board.phase(), BoardPhase::Terminal);
    }

    #[test]
    fn test_failed_move_leaves_state_unchanged() {
        let mut board = Board::new();
        board
            .initial_move(InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop))
            .unwrap();
        let before = board.snapshot();

        let wrong_cell = IntermediateMove::new(Color::White, pos(5, 5), straight());
        assert!(board.place_tile(wrong_cell).is_err());
        let not_live = IntermediateMove::new(Color::Red, pos(1, 2), straight());
        assert!(board.place_tile(not_live).is_err());

        assert_eq!(board.snapshot(), before);
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn test_snapshots_survive_later_moves() {
        let mut board = Board::new();
        board
            .initial_move(InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop))
            .unwrap();
        let earlier = board.snapshot();
        board
            .place_tile(IntermediateMove::new(Color::White, pos(1, 2), straight()))
            .unwrap();

        assert_eq!(earlier.tile_count(), 1);
        assert_eq!(earlier.get_position_of_player(Color::White).unwrap().position, pos(0, 2));
        assert_eq!(board.state().tile_count(), 2);
    }

    #[test]
    fn test_observers_see_committed_events_only() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut board = Board::new();
        board.add_observer(Box::new(move |e: &BoardEvent| -> anyhow::Result<()> {
            sink.lock().unwrap().push(e.clone());
            Ok(())
        }));

        let bad = InitialMove::new(Color::White, pos(4, 4), straight(), Port::RightTop);
        assert!(board.initial_move(bad).is_err());
        assert!(events.lock().unwrap().is_empty());

        board
            .initial_move(InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop))
            .unwrap();
        assert!(matches!(events.lock().unwrap()[0], BoardEvent::Placed { .. }));
    }

    #[test]
    fn test_replay_reproduces_state() {
        let board = Board::create_board_from_moves(
            &[InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop)],
            &[IntermediateMove::new(Color::White, pos(1, 2), straight())],
        )
        .unwrap();
        let replayed = Board::replay(board.history()).unwrap();
        assert_eq!(replayed.snapshot(), board.snapshot());
    }

    #[test]
    fn test_remove_player() {
        let mut board = Board::new();
        board
            .initial_move(InitialMove::new(Color::White, pos(0, 2), straight(), Port::RightTop))
            .unwrap();
        board.remove_player(Color::White).unwrap();
        assert_eq!(board.remove_player(Color::White), Err(TsuroError::PlayerNotFound(Color::White)));
        assert_eq!(board.phase(), BoardPhase::Terminal);
    }
}

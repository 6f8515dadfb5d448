//! Runs one game of Tsuro.
//!
//! ## Lifecycle
//!
//! `Uninitialized -> PlayersSet -> Configured -> Running -> ShutDown`
//!
//! Players are set once; the rule checker and tile supply may be set in any
//! order before the game runs. A referee runs exactly one game.
//!
//! ## Untrusted players
//!
//! Every call into a player goes through a [`PlayerHandle`] with the
//! configured time budget. A player that times out, fails, panics, or answers
//! with an illegal move is removed from the board, marked as a cheater and
//! never called again during the game. The game carries on without them.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::board::{Board, BoardState};
use crate::core::error::{Result, TsuroError};
use crate::core::{Color, Hand, InitialMove, IntermediateMove, Observer, ObserverList, RefereeConfig};
use crate::players::{InitialOffer, Notification, TurnOffer};
use crate::rules::{GameResult, RuleChecker};

use super::event::{CheatReason, RefereeEvent};
use super::handle::PlayerHandle;
use super::supply::TileSupply;

/// Smallest game.
pub const MIN_PLAYERS: usize = 3;

/// Largest game.
pub const MAX_PLAYERS: usize = 5;

/// Lifecycle stage of a referee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefereeStage {
    Uninitialized,
    PlayersSet,
    Configured,
    Running,
    ShutDown,
}

struct Seat {
    color: Color,
    player: PlayerHandle,
}

/// Orchestrates a single game.
pub struct Referee {
    config: RefereeConfig,
    stage: RefereeStage,
    seats: Vec<Seat>,
    rule_checker: Option<Box<dyn RuleChecker>>,
    tiles: Option<TileSupply>,
    board: Board,
    observers: ObserverList<RefereeEvent>,
}

impl Default for Referee {
    fn default() -> Self {
        Self::new(RefereeConfig::default())
    }
}

impl Referee {
    #[must_use]
    pub fn new(config: RefereeConfig) -> Self {
        Self {
            config,
            stage: RefereeStage::Uninitialized,
            seats: Vec::new(),
            rule_checker: None,
            tiles: None,
            board: Board::new(),
            observers: ObserverList::new(),
        }
    }

    #[must_use]
    pub fn stage(&self) -> RefereeStage {
        self.stage
    }

    /// Colors in turn order.
    #[must_use]
    pub fn colors(&self) -> Vec<Color> {
        self.seats.iter().map(|s| s.color).collect()
    }

    /// The current board state.
    #[must_use]
    pub fn board_state(&self) -> BoardState {
        self.board.snapshot()
    }

    /// Seat 3 to 5 players, each given with their age.
    ///
    /// Turn order is by descending age, ties kept in the given order. Colors
    /// are handed out in turn order. The returned colors line up with the
    /// input: `colors[i]` belongs to `players[i]`.
    pub fn set_players(&mut self, players: Vec<(PlayerHandle, u32)>) -> Result<Vec<Color>> {
        if self.stage != RefereeStage::Uninitialized {
            return Err(TsuroError::config("players have already been set"));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(TsuroError::InvalidPlayerCount { count: players.len() });
        }

        let mut order: Vec<usize> = (0..players.len()).collect();
        order.sort_by(|&a, &b| players[b].1.cmp(&players[a].1));

        let mut assigned = vec![Color::White; players.len()];
        for (seat, &index) in order.iter().enumerate() {
            assigned[index] = Color::ALL[seat];
        }

        let mut handles: Vec<Option<PlayerHandle>> = players.into_iter().map(|(h, _)| Some(h)).collect();
        self.seats = order
            .iter()
            .enumerate()
            .filter_map(|(seat, &index)| {
                handles[index].take().map(|player| Seat {
                    color: Color::ALL[seat],
                    player,
                })
            })
            .collect();

        self.stage = RefereeStage::PlayersSet;
        self.refresh_stage();
        self.observers.notify(&RefereeEvent::PlayersAdded(self.colors()));
        Ok(assigned)
    }

    pub fn set_rule_checker(&mut self, rule_checker: Box<dyn RuleChecker>) -> Result<()> {
        self.ensure_configurable()?;
        self.rule_checker = Some(rule_checker);
        self.refresh_stage();
        Ok(())
    }

    /// Set the supply hands are drawn from. It must never run out.
    pub fn set_tile_iterator(&mut self, tiles: TileSupply) -> Result<()> {
        self.ensure_configurable()?;
        self.tiles = Some(tiles);
        self.refresh_stage();
        Ok(())
    }

    /// Register an observer. Observer failures never reach the game.
    pub fn add_observer(&mut self, observer: Box<dyn Observer<RefereeEvent>>) -> Result<()> {
        if self.stage == RefereeStage::ShutDown {
            return Err(TsuroError::config("the referee has shut down"));
        }
        self.observers.add(observer);
        Ok(())
    }

    fn ensure_configurable(&self) -> Result<()> {
        match self.stage {
            RefereeStage::Running | RefereeStage::ShutDown => {
                Err(TsuroError::config("cannot reconfigure a referee after its game started"))
            }
            _ => Ok(()),
        }
    }

    fn refresh_stage(&mut self) {
        if self.stage == RefereeStage::PlayersSet && self.rule_checker.is_some() && self.tiles.is_some() {
            self.stage = RefereeStage::Configured;
        }
    }

    /// Play the game to the end and return its result.
    pub fn run_game(&mut self) -> Result<GameResult> {
        match self.stage {
            RefereeStage::Configured => {}
            RefereeStage::Running | RefereeStage::ShutDown => {
                return Err(TsuroError::config("this referee has already run its game"));
            }
            _ => return Err(TsuroError::config("players, rule checker and tile supply must be set first")),
        }
        let mut rules = self
            .rule_checker
            .take()
            .ok_or_else(|| TsuroError::config("no rule checker"))?;
        let mut tiles = self.tiles.take().ok_or_else(|| TsuroError::config("no tile supply"))?;

        self.stage = RefereeStage::Running;
        let colors = self.colors();
        info!(players = ?colors, "game started");

        rules.begin_game(&colors);
        self.introduce_players(rules.as_mut());
        self.play_initial_phase(rules.as_mut(), &mut tiles)?;
        self.play_rounds(rules.as_mut(), &mut tiles)?;

        let result = rules.get_leaderboard()?;
        self.deliver_result(rules.as_ref(), &result);
        self.observers.notify(&RefereeEvent::GameOver(result.clone()));
        self.stage = RefereeStage::ShutDown;
        info!(ranking = ?result.ranking, cheaters = ?result.cheaters, "game finished");
        Ok(result)
    }

    fn introduce_players(&mut self, rules: &mut dyn RuleChecker) {
        let colors = self.colors();
        let timeout = self.config.player_timeout;
        for index in 0..self.seats.len() {
            let color = self.seats[index].color;
            let others: Vec<Color> = colors.iter().copied().filter(|&c| c != color).collect();
            let player = &self.seats[index].player;

            let answer = player
                .call(Notification::PlayingAs, timeout, move |p| p.playing_as(color))
                .and_then(|()| player.call(Notification::Others, timeout, move |p| p.others(&others)));
            if let Err(fault) = answer {
                self.eject(rules, 0, color, CheatReason::Fault(fault));
            }
        }
    }

    fn play_initial_phase(&mut self, rules: &mut dyn RuleChecker, tiles: &mut TileSupply) -> Result<()> {
        for index in 0..self.seats.len() {
            let color = self.seats[index].color;
            if !rules.can_player_move(color) {
                continue;
            }

            let hand = draw(tiles, self.config.initial_hand_size)?;
            let state = self.board.snapshot();
            self.observers.notify(&RefereeEvent::InitialMoveOffered {
                color,
                hand: hand.to_vec(),
                state: state.clone(),
            });

            let offer = InitialOffer { hand: hand.clone(), state: state.clone() };
            let answer = self.seats[index].player.call(
                Notification::InitialMove,
                self.config.player_timeout,
                move |p| p.initial_move(&offer),
            );
            let action = match answer {
                Ok(action) => action,
                Err(fault) => {
                    self.eject(rules, 0, color, CheatReason::Fault(fault));
                    continue;
                }
            };

            let mv = InitialMove::from_action(color, action);
            self.observers.notify(&RefereeEvent::InitialMovePlayed { color, mv, state: state.clone() });
            let applied = rules
                .validate_initial_move(&state, &hand, &mv)
                .and_then(|()| self.board.initial_move(mv));
            match applied {
                Ok(outcome) => {
                    debug!(%color, position = %mv.position, port = %mv.port, "initial move");
                    rules.tick(self.board.state(), 0, color);
                    self.report_eliminations(outcome.eliminated());
                }
                Err(err) => self.eject(rules, 0, color, CheatReason::Rejected(err)),
            }
        }
        Ok(())
    }

    fn play_rounds(&mut self, rules: &mut dyn RuleChecker, tiles: &mut TileSupply) -> Result<()> {
        let mut round = 0;
        while !rules.is_game_over(self.board.state()) {
            round += 1;
            debug!(round, live = self.board.state().live_count(), "round started");
            for index in 0..self.seats.len() {
                if rules.is_game_over(self.board.state()) {
                    break;
                }
                let color = self.seats[index].color;
                if !self.board.state().is_live(color) || !rules.can_player_move(color) {
                    continue;
                }
                self.play_turn(rules, tiles, round, index)?;
            }
        }
        Ok(())
    }

    fn play_turn(&mut self, rules: &mut dyn RuleChecker, tiles: &mut TileSupply, round: u32, index: usize) -> Result<()> {
        let color = self.seats[index].color;
        let state = self.board.snapshot();
        let Some(position) = state.calculate_adjacent_position_of_player(color)? else {
            warn!(%color, "live avatar is facing off the board");
            return Ok(());
        };

        let hand = draw(tiles, self.config.turn_hand_size)?;
        self.observers.notify(&RefereeEvent::TurnOffered {
            color,
            hand: hand.to_vec(),
            state: state.clone(),
        });

        let offer = TurnOffer { hand: hand.clone(), state: state.clone() };
        let answer = self.seats[index].player.call(
            Notification::TakeTurn,
            self.config.player_timeout,
            move |p| p.take_turn(&offer),
        );
        let tile = match answer {
            Ok(tile) => tile,
            Err(fault) => {
                self.eject(rules, round, color, CheatReason::Fault(fault));
                return Ok(());
            }
        };

        let mv = IntermediateMove::new(color, position, tile);
        self.observers.notify(&RefereeEvent::TurnPlayed { color, mv, state: state.clone() });
        let applied = rules
            .validate_move(&state, &hand, &mv)
            .and_then(|()| self.board.place_tile(mv));
        match applied {
            Ok(outcome) => {
                rules.tick(self.board.state(), round, color);
                self.report_eliminations(outcome.eliminated());
            }
            Err(err) => self.eject(rules, round, color, CheatReason::Rejected(err)),
        }
        Ok(())
    }

    fn report_eliminations(&mut self, eliminated: impl Iterator<Item = Color>) {
        let state = self.board.snapshot();
        for color in eliminated {
            info!(%color, "player eliminated");
            self.observers.notify(&RefereeEvent::PlayerEliminated { color, state: state.clone() });
        }
    }

    fn eject(&mut self, rules: &mut dyn RuleChecker, round: u32, color: Color, reason: CheatReason) {
        warn!(%color, %reason, "removing cheater");
        rules.mark_cheater(color);
        if self.board.state().is_live(color) {
            // Only fails if the avatar is gone, which was just checked.
            let _ = self.board.remove_player(color);
        }
        rules.tick(self.board.state(), round, color);
        self.observers.notify(&RefereeEvent::CheaterRemoved {
            color,
            reason,
            state: self.board.snapshot(),
        });
    }

    fn deliver_result(&self, rules: &dyn RuleChecker, result: &GameResult) {
        let cheaters: BTreeSet<Color> = result.cheaters.clone();
        for seat in &self.seats {
            if cheaters.contains(&seat.color) || !rules.can_player_move(seat.color) {
                continue;
            }
            let result = result.clone();
            if let Err(fault) = seat.player.call(
                Notification::GameResult,
                self.config.player_timeout,
                move |p| p.game_result(&result),
            ) {
                warn!(color = %seat.color, %fault, "could not deliver game result");
            }
        }
    }
}

fn draw(tiles: &mut TileSupply, count: usize) -> Result<Hand> {
    let hand: Hand = tiles.by_ref().take(count).collect();
    if hand.len() < count {
        return Err(TsuroError::config("the tile supply ran out"));
    }
    Ok(hand)
}

impl std::fmt::Debug for Referee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Referee")
            .field("stage", &self.stage)
            .field("colors", &self.colors())
            .finish_non_exhaustive()
    }
}

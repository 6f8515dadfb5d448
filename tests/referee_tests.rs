//! Referee integration tests.
//!
//! Full games between local players, with misbehaving players mixed in: a
//! player that hangs, one that errors, and one that plays tiles it was never
//! offered. The game must finish and rank everyone exactly once.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rust_tsuro::core::{Color, InitialAction, PlayerFault, RefereeConfig, Tile, TileSupplyConfig, TsuroError};
use rust_tsuro::players::{FirstLegalStrategy, InitialOffer, Player, PlayerEvent, StrategyPlayer, TurnOffer};
use rust_tsuro::referee::{tile_supply, CheatReason, PlayerHandle, Referee, RefereeEvent, RefereeStage};
use rust_tsuro::rules::{GameResult, StandardRuleChecker};

#[derive(Clone, Copy)]
enum Misbehaviour {
    None,
    HangOnInitialMove,
    FailOnTurn,
    PlayUnofferedTile,
}

/// A first-legal player that misbehaves on cue.
struct Scripted {
    inner: StrategyPlayer<FirstLegalStrategy>,
    mode: Misbehaviour,
}

impl Scripted {
    fn boxed(mode: Misbehaviour) -> Box<dyn Player> {
        Box::new(Self {
            inner: StrategyPlayer::new(FirstLegalStrategy),
            mode,
        })
    }
}

impl Player for Scripted {
    fn playing_as(&mut self, color: Color) -> anyhow::Result<()> {
        self.inner.playing_as(color)
    }

    fn others(&mut self, colors: &[Color]) -> anyhow::Result<()> {
        self.inner.others(colors)
    }

    fn initial_move(&mut self, offer: &InitialOffer) -> anyhow::Result<InitialAction> {
        if let Misbehaviour::HangOnInitialMove = self.mode {
            thread::sleep(Duration::from_secs(2));
        }
        self.inner.initial_move(offer)
    }

    fn take_turn(&mut self, offer: &TurnOffer) -> anyhow::Result<Tile> {
        match self.mode {
            Misbehaviour::FailOnTurn => anyhow::bail!("lost my train of thought"),
            Misbehaviour::PlayUnofferedTile => {
                let unoffered = Tile::deck()
                    .iter()
                    .find(|tile| !offer.hand.contains(tile))
                    .copied()
                    .ok_or_else(|| anyhow::anyhow!("every tile was offered"))?;
                Ok(unoffered)
            }
            _ => self.inner.take_turn(offer),
        }
    }

    fn game_result(&mut self, result: &GameResult) -> anyhow::Result<()> {
        self.inner.game_result(result)
    }

    fn end_of_tournament(&mut self, won: bool) -> anyhow::Result<()> {
        self.inner.end_of_tournament(won)
    }
}

fn quick_referee() -> Referee {
    Referee::new(RefereeConfig::default().with_player_timeout(Duration::from_millis(500)))
}

fn configure(referee: &mut Referee, supply: TileSupplyConfig) {
    referee
        .set_rule_checker(Box::new(StandardRuleChecker::new()))
        .unwrap();
    referee.set_tile_iterator(tile_supply(supply, None)).unwrap();
}

fn play(modes: &[Misbehaviour]) -> (GameResult, Vec<Color>, Vec<RefereeEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut referee = quick_referee();
    referee
        .add_observer(Box::new(move |e: &RefereeEvent| -> anyhow::Result<()> {
            sink.lock().unwrap().push(e.clone());
            Ok(())
        }))
        .unwrap();
    let players = modes
        .iter()
        .enumerate()
        .map(|(i, &mode)| (PlayerHandle::new(Scripted::boxed(mode)), (modes.len() - i) as u32))
        .collect();
    let colors = referee.set_players(players).unwrap();
    configure(&mut referee, TileSupplyConfig::Deterministic);

    let result = referee.run_game().unwrap();
    let events = events.lock().unwrap().clone();
    (result, colors, events)
}

fn assert_ranked_once(result: &GameResult, colors: &[Color]) {
    let ranked: Vec<Color> = result.participants().collect();
    assert_eq!(ranked.len(), colors.len());
    assert_eq!(
        ranked.into_iter().collect::<BTreeSet<_>>(),
        colors.iter().copied().collect::<BTreeSet<_>>()
    );
}

#[test]
fn test_honest_game_ranks_everyone() {
    let modes = [Misbehaviour::None; 5];
    let (result, colors, events) = play(&modes);

    assert_ranked_once(&result, &colors);
    assert!(result.cheaters.is_empty());
    assert!(matches!(events.first(), Some(RefereeEvent::PlayersAdded(c)) if c.len() == 5));
    assert!(matches!(events.last(), Some(RefereeEvent::GameOver(r)) if *r == result));
}

#[test]
fn test_hanging_player_is_flagged_and_game_finishes() {
    let modes = [Misbehaviour::None, Misbehaviour::HangOnInitialMove, Misbehaviour::None];
    let (result, colors, events) = play(&modes);
    let hanger = colors[1];

    assert_ranked_once(&result, &colors);
    assert_eq!(result.cheaters, BTreeSet::from([hanger]));
    assert_eq!(result.ranking.last(), Some(&BTreeSet::from([hanger])));
    assert!(events.iter().any(|e| matches!(
        e,
        RefereeEvent::CheaterRemoved { color, reason: CheatReason::Fault(PlayerFault::Timeout(_)), .. }
            if *color == hanger
    )));
}

#[test]
fn test_failing_player_is_flagged() {
    let modes = [Misbehaviour::None, Misbehaviour::None, Misbehaviour::FailOnTurn, Misbehaviour::None];
    let (result, colors, events) = play(&modes);
    let failing = colors[2];

    assert_ranked_once(&result, &colors);
    assert!(result.is_cheater(failing));
    assert!(!result.is_winner(failing));
    assert!(events.iter().any(|e| matches!(
        e,
        RefereeEvent::CheaterRemoved { color, reason: CheatReason::Fault(PlayerFault::Failed(_)), .. }
            if *color == failing
    )));
}

#[test]
fn test_unoffered_tile_is_rejected() {
    let modes = [Misbehaviour::PlayUnofferedTile, Misbehaviour::None, Misbehaviour::None];
    let (result, colors, events) = play(&modes);
    let liar = colors[0];

    assert_ranked_once(&result, &colors);
    assert_eq!(result.cheaters, BTreeSet::from([liar]));
    assert!(events.iter().any(|e| matches!(
        e,
        RefereeEvent::CheaterRemoved { color, reason: CheatReason::Rejected(TsuroError::IllegalMove(_)), .. }
            if *color == liar
    )));
    let removed = events
        .iter()
        .find_map(|e| match e {
            RefereeEvent::CheaterRemoved { color, state, .. } if *color == liar => Some(state.clone()),
            _ => None,
        })
        .unwrap();
    assert!(!removed.is_live(liar));
}

#[test]
fn test_honest_players_receive_the_result() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut referee = quick_referee();
    let players = (0..3u32)
        .map(|age| {
            let sink = Arc::clone(&seen);
            let mut player = StrategyPlayer::new(FirstLegalStrategy);
            player.add_observer(Box::new(move |e: &PlayerEvent| -> anyhow::Result<()> {
                if let PlayerEvent::GameEnded(result) = e {
                    sink.lock().unwrap().push(result.clone());
                }
                Ok(())
            }));
            (PlayerHandle::new(Box::new(player)), age)
        })
        .collect();
    referee.set_players(players).unwrap();
    configure(&mut referee, TileSupplyConfig::Deterministic);

    let result = referee.run_game().unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|r| *r == result));
}

#[test]
fn test_same_seed_same_game() {
    let run = || {
        let mut referee = quick_referee();
        let players = (0..4u32)
            .map(|age| (PlayerHandle::new(Scripted::boxed(Misbehaviour::None)), age))
            .collect();
        referee.set_players(players).unwrap();
        configure(&mut referee, TileSupplyConfig::Shuffled { seed: 17 });
        let result = referee.run_game().unwrap();
        (result, referee.board_state())
    };

    let (first, first_board) = run();
    let (second, second_board) = run();
    assert_eq!(first, second);
    assert_eq!(first_board, second_board);
}

#[test]
fn test_lifecycle() {
    let mut referee = quick_referee();
    assert_eq!(referee.stage(), RefereeStage::Uninitialized);

    let players = (0..3u32)
        .map(|age| (PlayerHandle::new(Scripted::boxed(Misbehaviour::None)), age))
        .collect();
    referee.set_players(players).unwrap();
    assert_eq!(referee.stage(), RefereeStage::PlayersSet);

    let again = (0..3u32)
        .map(|age| (PlayerHandle::new(Scripted::boxed(Misbehaviour::None)), age))
        .collect();
    assert!(matches!(referee.set_players(again), Err(TsuroError::Configuration(_))));

    configure(&mut referee, TileSupplyConfig::Deterministic);
    assert_eq!(referee.stage(), RefereeStage::Configured);

    referee.run_game().unwrap();
    assert_eq!(referee.stage(), RefereeStage::ShutDown);
    assert!(referee
        .set_rule_checker(Box::new(StandardRuleChecker::new()))
        .is_err());
    assert!(referee
        .add_observer(Box::new(|_: &RefereeEvent| -> anyhow::Result<()> { Ok(()) }))
        .is_err());
}

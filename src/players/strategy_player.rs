//! A [`Player`] backed by a [`Strategy`], with observers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Color, InitialAction, Observer, ObserverList, Tile};
use crate::rules::GameResult;

use super::player::{InitialOffer, Player, TurnOffer};
use super::strategy::Strategy;

/// What a strategy-backed player saw and did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEvent {
    PlayingAs(Color),
    Others(Vec<Color>),
    InitialMoveOffered { hand: Vec<Tile> },
    InitialMovePlayed(InitialAction),
    TurnOffered { hand: Vec<Tile> },
    TurnPlayed(Tile),
    GameEnded(GameResult),
    TournamentEnded { won: bool },
}

/// Handles the referee conversation and delegates decisions to a strategy.
pub struct StrategyPlayer<S> {
    strategy: S,
    color: Option<Color>,
    observers: ObserverList<PlayerEvent>,
}

impl<S: Strategy> StrategyPlayer<S> {
    #[must_use]
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            color: None,
            observers: ObserverList::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer<PlayerEvent>>) {
        self.observers.add(observer);
    }

    /// The color assigned for the current game.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    fn require_color(&self) -> anyhow::Result<Color> {
        self.color.ok_or_else(|| anyhow::anyhow!("asked to move before being assigned a color"))
    }
}

impl<S: Strategy> Player for StrategyPlayer<S> {
    fn playing_as(&mut self, color: Color) -> anyhow::Result<()> {
        self.color = Some(color);
        self.observers.notify(&PlayerEvent::PlayingAs(color));
        Ok(())
    }

    fn others(&mut self, colors: &[Color]) -> anyhow::Result<()> {
        self.observers.notify(&PlayerEvent::Others(colors.to_vec()));
        Ok(())
    }

    fn initial_move(&mut self, offer: &InitialOffer) -> anyhow::Result<InitialAction> {
        let color = self.require_color()?;
        self.observers.notify(&PlayerEvent::InitialMoveOffered { hand: offer.hand.to_vec() });
        let action = self.strategy.initial_move(color, offer)?;
        debug!(%color, position = %action.position, port = %action.port, "chose initial move");
        self.observers.notify(&PlayerEvent::InitialMovePlayed(action));
        Ok(action)
    }

    fn take_turn(&mut self, offer: &TurnOffer) -> anyhow::Result<Tile> {
        let color = self.require_color()?;
        self.observers.notify(&PlayerEvent::TurnOffered { hand: offer.hand.to_vec() });
        let tile = self.strategy.take_turn(color, offer)?;
        self.observers.notify(&PlayerEvent::TurnPlayed(tile));
        Ok(tile)
    }

    fn game_result(&mut self, result: &GameResult) -> anyhow::Result<()> {
        self.observers.notify(&PlayerEvent::GameEnded(result.clone()));
        self.color = None;
        Ok(())
    }

    fn end_of_tournament(&mut self, won: bool) -> anyhow::Result<()> {
        self.observers.notify(&PlayerEvent::TournamentEnded { won });
        Ok(())
    }
}

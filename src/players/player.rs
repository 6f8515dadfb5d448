//! The interface every player implements, local or remote.
//!
//! Player implementations are untrusted. Every method returns
//! `anyhow::Result`; the referee wraps each call with a time budget and treats
//! an error, a panic, or a late answer the same way: the player is flagged as
//! a cheater for the rest of the game.

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::core::{Color, Hand, InitialAction, Tile};
use crate::rules::GameResult;

/// Tiles offered for an initial move plus a snapshot of the board.
#[derive(Clone, Debug)]
pub struct InitialOffer {
    pub hand: Hand,
    pub state: BoardState,
}

/// Tiles offered for an intermediate move plus a snapshot of the board.
#[derive(Clone, Debug)]
pub struct TurnOffer {
    pub hand: Hand,
    pub state: BoardState,
}

/// What a game or tournament tells a player, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    PlayingAs,
    Others,
    InitialMove,
    TakeTurn,
    GameResult,
    EndOfTournament,
}

/// A Tsuro player.
pub trait Player: Send {
    /// The color this player has in the coming game.
    fn playing_as(&mut self, color: Color) -> anyhow::Result<()>;

    /// The other colors in the coming game.
    fn others(&mut self, colors: &[Color]) -> anyhow::Result<()>;

    /// Pick a tile, an edge cell and a starting port.
    fn initial_move(&mut self, offer: &InitialOffer) -> anyhow::Result<InitialAction>;

    /// Pick one of the offered tiles, in some orientation.
    fn take_turn(&mut self, offer: &TurnOffer) -> anyhow::Result<Tile>;

    /// The result of the game just played.
    fn game_result(&mut self, result: &GameResult) -> anyhow::Result<()>;

    /// Whether this player won the tournament.
    fn end_of_tournament(&mut self, won: bool) -> anyhow::Result<()>;
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn playing_as(&mut self, color: Color) -> anyhow::Result<()> {
        (**self).playing_as(color)
    }

    fn others(&mut self, colors: &[Color]) -> anyhow::Result<()> {
        (**self).others(colors)
    }

    fn initial_move(&mut self, offer: &InitialOffer) -> anyhow::Result<InitialAction> {
        (**self).initial_move(offer)
    }

    fn take_turn(&mut self, offer: &TurnOffer) -> anyhow::Result<Tile> {
        (**self).take_turn(offer)
    }

    fn game_result(&mut self, result: &GameResult) -> anyhow::Result<()> {
        (**self).game_result(result)
    }

    fn end_of_tournament(&mut self, won: bool) -> anyhow::Result<()> {
        (**self).end_of_tournament(won)
    }
}

//! Server-side stand-in for a player on the other end of a connection.

use std::io::{Read, Write};

use anyhow::{bail, Context};
use tracing::debug;

use crate::core::{Color, InitialAction, Tile, TilePattern};
use crate::players::{InitialOffer, Player, TurnOffer};
use crate::rules::GameResult;

use super::protocol::{decode, expect_void, InitialActionPat, ServerMessage, WireOffer};
use super::stream::JsonStream;

/// A [`Player`] that forwards every call over a [`JsonStream`].
///
/// The connection is considered dead after the first transport or protocol
/// failure and after the end-of-tournament message; later calls fail
/// immediately.
pub struct RemotePlayer<R: Read, W: Write> {
    name: String,
    stream: JsonStream<R, W>,
    closed: bool,
}

impl<R: Read, W: Write> RemotePlayer<R, W> {
    pub fn new(name: impl Into<String>, stream: JsonStream<R, W>) -> Self {
        Self {
            name: name.into(),
            stream,
            closed: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn exchange(&mut self, message: ServerMessage) -> anyhow::Result<serde_json::Value> {
        if self.closed {
            bail!("connection to {} is closed", self.name);
        }
        debug!(player = %self.name, tag = message.tag(), "sending");
        let reply = self
            .stream
            .send(&message)
            .and_then(|()| self.stream.receive::<serde_json::Value>());
        if reply.is_err() {
            self.closed = true;
        }
        reply.with_context(|| format!("{} did not answer {}", self.name, message.tag()))
    }

    fn notify(&mut self, message: ServerMessage) -> anyhow::Result<()> {
        let reply = self.exchange(message)?;
        expect_void(&reply)?;
        Ok(())
    }
}

impl<R: Read + Send, W: Write + Send> Player for RemotePlayer<R, W> {
    fn playing_as(&mut self, color: Color) -> anyhow::Result<()> {
        self.notify(ServerMessage::PlayingAs(color))
    }

    fn others(&mut self, colors: &[Color]) -> anyhow::Result<()> {
        self.notify(ServerMessage::Others(colors.to_vec()))
    }

    fn initial_move(&mut self, offer: &InitialOffer) -> anyhow::Result<InitialAction> {
        let reply = self.exchange(ServerMessage::Initial(WireOffer::new(&offer.state, &offer.hand)))?;
        let pat: InitialActionPat = decode(reply)?;
        Ok(pat.to_action()?)
    }

    fn take_turn(&mut self, offer: &TurnOffer) -> anyhow::Result<Tile> {
        let reply = self.exchange(ServerMessage::TakeTurn(WireOffer::new(&offer.state, &offer.hand)))?;
        let pat: TilePattern = decode(reply)?;
        Ok(pat.to_tile()?)
    }

    /// The protocol has no game-result message.
    fn game_result(&mut self, _result: &GameResult) -> anyhow::Result<()> {
        Ok(())
    }

    fn end_of_tournament(&mut self, won: bool) -> anyhow::Result<()> {
        let answer = self.notify(ServerMessage::EndOfTournament(won));
        self.closed = true;
        answer
    }
}

impl<R: Read, W: Write> std::fmt::Debug for RemotePlayer<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemotePlayer")
            .field("name", &self.name)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

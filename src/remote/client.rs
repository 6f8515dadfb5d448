//! Client side: drives a local player from the server's messages.

use std::io::{Read, Write};

use tracing::{debug, info, warn};

use crate::core::error::{Result, TsuroError};
use crate::core::PlayerFault;
use crate::players::{InitialOffer, Player, TurnOffer};

use super::protocol::{InitialActionPat, ServerMessage, VOID};
use super::stream::JsonStream;

/// Answers server messages on behalf of a local [`Player`].
pub struct RemoteAdmin<P, R: Read, W: Write> {
    player: P,
    stream: JsonStream<R, W>,
}

impl<P: Player, R: Read, W: Write> RemoteAdmin<P, R, W> {
    pub fn new(player: P, stream: JsonStream<R, W>) -> Self {
        Self { player, stream }
    }

    /// Serve messages until the tournament ends.
    ///
    /// Returns whether the player won, or `None` if the server hung up first
    /// (which is what happens to players caught cheating).
    pub fn run(&mut self) -> Result<Option<bool>> {
        loop {
            let Some(raw) = self.stream.receive_value()? else {
                info!("server closed the connection");
                return Ok(None);
            };
            let message: ServerMessage = serde_json::from_value(raw)
                .map_err(|err| TsuroError::protocol(format!("malformed message: {}", err)))?;
            debug!(tag = message.tag(), "received");

            if let Some(won) = self.dispatch(message)? {
                return Ok(Some(won));
            }
        }
    }

    /// Handle one message. Returns the tournament outcome once it arrives.
    pub fn dispatch(&mut self, message: ServerMessage) -> Result<Option<bool>> {
        match message {
            ServerMessage::PlayingAs(color) => {
                self.player.playing_as(color).map_err(fault)?;
                self.stream.send(VOID)?;
            }
            ServerMessage::Others(colors) => {
                self.player.others(&colors).map_err(fault)?;
                self.stream.send(VOID)?;
            }
            ServerMessage::Initial(offer) => {
                let offer = InitialOffer {
                    hand: offer.tiles()?,
                    state: offer.board_state()?,
                };
                let action = self.player.initial_move(&offer).map_err(fault)?;
                self.stream.send(&InitialActionPat::from(action))?;
            }
            ServerMessage::TakeTurn(offer) => {
                let offer = TurnOffer {
                    hand: offer.tiles()?,
                    state: offer.board_state()?,
                };
                let tile = self.player.take_turn(&offer).map_err(fault)?;
                self.stream.send(&tile.pattern())?;
            }
            ServerMessage::EndOfTournament(won) => {
                if let Err(err) = self.player.end_of_tournament(won) {
                    warn!(error = %err, "player failed to take the tournament result");
                }
                self.stream.send(VOID)?;
                return Ok(Some(won));
            }
        }
        Ok(None)
    }

    pub fn into_player(self) -> P {
        self.player
    }
}

fn fault(err: anyhow::Error) -> TsuroError {
    TsuroError::PlayerFault(PlayerFault::from(err))
}

//! The JSON wire protocol between a server-side proxy and a remote player.
//!
//! ## Messages
//!
//! Every server message is a two-element array `[tag, payload]`:
//!
//! | tag | payload | reply |
//! |---|---|---|
//! | `playing-as` | `[color]` | `"void"` |
//! | `others` | `[color, ...]` | `"void"` |
//! | `initial` | `[state-pats, index, index, index]` | `[tile-pat, port, x, y]` |
//! | `take-turn` | `[state-pats, index, index]` | `tile-pat` |
//! | `end-of-tournament` | `[won]` | `"void"` |
//!
//! A `tile-pat` is `[deck index, clockwise angle]` and ports travel as the
//! letters `"A"` to `"H"`.
//!
//! ## State pats
//!
//! A board travels as a list of placements. A tile carrying a live avatar is
//! an `initial-place` (`[tile-pat, color, port, x, y]`), one per avatar; any
//! other tile is an `intermediate-place` (`[tile-pat, x, y]`).

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeSeq, SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{Avatar, BoardState};
use crate::core::error::{Result, TsuroError};
use crate::core::{BoardPosition, Color, Hand, InitialAction, Port, Tile, TilePattern};

/// Acknowledgement sent for notifications that need no answer.
pub const VOID: &str = "void";

/// A port as it travels on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortLetter(pub Port);

impl TryFrom<String> for PortLetter {
    type Error = TsuroError;

    fn try_from(letter: String) -> Result<Self> {
        Port::from_letter(&letter)
            .map(PortLetter)
            .ok_or_else(|| TsuroError::protocol(format!("unknown port letter {:?}", letter)))
    }
}

impl From<PortLetter> for String {
    fn from(port: PortLetter) -> Self {
        port.0.letter().to_string()
    }
}

/// One placement in the wire form of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatePat {
    /// A tile with a live avatar standing on it.
    InitialPlace(TilePattern, Color, PortLetter, u8, u8),
    /// A tile with no avatar on it.
    IntermediatePlace(TilePattern, u8, u8),
}

impl BoardState {
    /// The wire form of this state: avatars first in color order, then the
    /// remaining tiles in position order.
    #[must_use]
    pub fn to_state_pats(&self) -> Vec<StatePat> {
        let mut pats = Vec::with_capacity(self.tile_count());
        let mut occupied = Vec::new();
        for (color, avatar) in self.live_players() {
            if let Some(tile) = self.get_tile(avatar.position) {
                pats.push(StatePat::InitialPlace(
                    tile.pattern(),
                    color,
                    PortLetter(avatar.port),
                    avatar.position.x(),
                    avatar.position.y(),
                ));
                occupied.push(avatar.position);
            }
        }

        let mut rest: Vec<(BoardPosition, Tile)> = self.tiles().filter(|(pos, _)| !occupied.contains(pos)).collect();
        rest.sort_by_key(|(pos, _)| (pos.y(), pos.x()));
        pats.extend(
            rest.into_iter()
                .map(|(pos, tile)| StatePat::IntermediatePlace(tile.pattern(), pos.x(), pos.y())),
        );
        pats
    }

    /// Rebuild a state from its wire form, exactly as described: avatars are
    /// put where the pats say and no movement is resolved.
    pub fn from_state_pats(pats: &[StatePat]) -> Result<BoardState> {
        let mut state = BoardState::new();
        for pat in pats {
            let (pattern, x, y) = match *pat {
                StatePat::InitialPlace(pattern, _, _, x, y) | StatePat::IntermediatePlace(pattern, x, y) => {
                    (pattern, x, y)
                }
            };
            let position = BoardPosition::new(x, y)?;
            let tile = pattern.to_tile()?;
            match state.get_tile(position) {
                Some(existing) if !existing.same_orientation(&tile) => {
                    return Err(TsuroError::protocol(format!("two different tiles at {}", position)));
                }
                Some(_) => {}
                None => state = state.with_tile(position, tile),
            }

            if let StatePat::InitialPlace(_, color, PortLetter(port), _, _) = *pat {
                if state.is_live(color) {
                    return Err(TsuroError::protocol(format!("{} is placed twice", color)));
                }
                state = state.with_avatar(color, Avatar::new(position, port));
            }
        }
        Ok(state)
    }
}

/// A move offer on the wire: the board plus the deck indices of the hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireOffer {
    pub state: Vec<StatePat>,
    pub hand: Vec<u8>,
}

impl WireOffer {
    #[must_use]
    pub fn new(state: &BoardState, hand: &[Tile]) -> Self {
        Self {
            state: state.to_state_pats(),
            hand: hand.iter().map(Tile::index).collect(),
        }
    }

    pub fn board_state(&self) -> Result<BoardState> {
        BoardState::from_state_pats(&self.state)
    }

    /// The offered tiles, unrotated.
    pub fn tiles(&self) -> Result<Hand> {
        self.hand.iter().map(|&index| Tile::from_index(index)).collect()
    }
}

impl Serialize for WireOffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.hand.len() + 1))?;
        seq.serialize_element(&self.state)?;
        for index in &self.hand {
            seq.serialize_element(index)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for WireOffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let items: Vec<Value> = Vec::deserialize(deserializer)?;
        let mut items = items.into_iter();
        let state = items
            .next()
            .ok_or_else(|| <D::Error as de::Error>::custom("offer is missing its board"))?;
        let state: Vec<StatePat> = from_value::<_, D::Error>(state)?;
        let hand = items.map(from_value::<u8, D::Error>).collect::<std::result::Result<_, _>>()?;
        Ok(Self { state, hand })
    }
}

/// A message from the server to a remote player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    PlayingAs(Color),
    Others(Vec<Color>),
    Initial(WireOffer),
    TakeTurn(WireOffer),
    EndOfTournament(bool),
}

impl ServerMessage {
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            ServerMessage::PlayingAs(_) => "playing-as",
            ServerMessage::Others(_) => "others",
            ServerMessage::Initial(_) => "initial",
            ServerMessage::TakeTurn(_) => "take-turn",
            ServerMessage::EndOfTournament(_) => "end-of-tournament",
        }
    }
}

impl Serialize for ServerMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut message = serializer.serialize_tuple(2)?;
        message.serialize_element(self.tag())?;
        match self {
            ServerMessage::PlayingAs(color) => message.serialize_element(&[color])?,
            ServerMessage::Others(colors) => message.serialize_element(colors)?,
            ServerMessage::Initial(offer) | ServerMessage::TakeTurn(offer) => message.serialize_element(offer)?,
            ServerMessage::EndOfTournament(won) => message.serialize_element(&[won])?,
        }
        message.end()
    }
}

impl<'de> Deserialize<'de> for ServerMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (tag, payload): (String, Value) = Deserialize::deserialize(deserializer)?;
        match tag.as_str() {
            "playing-as" => {
                let [color]: [Color; 1] = from_value::<_, D::Error>(payload)?;
                Ok(ServerMessage::PlayingAs(color))
            }
            "others" => Ok(ServerMessage::Others(from_value::<_, D::Error>(payload)?)),
            "initial" => Ok(ServerMessage::Initial(from_value::<_, D::Error>(payload)?)),
            "take-turn" => Ok(ServerMessage::TakeTurn(from_value::<_, D::Error>(payload)?)),
            "end-of-tournament" => {
                let [won]: [bool; 1] = from_value::<_, D::Error>(payload)?;
                Ok(ServerMessage::EndOfTournament(won))
            }
            other => Err(de::Error::custom(format!("unknown message {:?}", other))),
        }
    }
}

/// Reply to an `initial` message: `[tile-pat, port, x, y]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialActionPat(pub TilePattern, pub PortLetter, pub u8, pub u8);

impl InitialActionPat {
    pub fn to_action(self) -> Result<InitialAction> {
        let InitialActionPat(pattern, PortLetter(port), x, y) = self;
        Ok(InitialAction::new(pattern.to_tile()?, port, BoardPosition::new(x, y)?))
    }
}

impl From<InitialAction> for InitialActionPat {
    fn from(action: InitialAction) -> Self {
        InitialActionPat(
            action.tile.pattern(),
            PortLetter(action.port),
            action.position.x(),
            action.position.y(),
        )
    }
}

/// Check that a reply is the `"void"` acknowledgement.
pub fn expect_void(reply: &Value) -> Result<()> {
    match reply.as_str() {
        Some(VOID) => Ok(()),
        _ => Err(TsuroError::protocol(format!("expected \"void\", got {}", reply))),
    }
}

/// Decode a reply into `T`.
pub fn decode<T: DeserializeOwned>(reply: Value) -> Result<T> {
    serde_json::from_value(reply).map_err(|err| TsuroError::protocol(format!("malformed reply: {}", err)))
}

fn from_value<T: DeserializeOwned, E: de::Error>(value: Value) -> std::result::Result<T, E> {
    serde_json::from_value(value).map_err(E::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::core::InitialMove;
    use serde_json::json;

    #[test]
    fn test_port_letters() {
        assert_eq!(serde_json::to_value(PortLetter(Port::ALL[2])).unwrap(), json!("C"));
        let port: PortLetter = serde_json::from_value(json!("H")).unwrap();
        assert_eq!(port.0, Port::ALL[7]);
        assert!(serde_json::from_value::<PortLetter>(json!("Z")).is_err());
    }

    #[test]
    fn test_state_pats_shapes() {
        let pats: Vec<StatePat> =
            serde_json::from_value(json!([[[0, 90], "red", "A", 0, 3], [[4, 0], 5, 5]])).unwrap();
        assert!(matches!(pats[0], StatePat::InitialPlace(TilePattern(0, 90), Color::Red, _, 0, 3)));
        assert!(matches!(pats[1], StatePat::IntermediatePlace(TilePattern(4, 0), 5, 5)));
    }

    #[test]
    fn test_board_state_through_state_pats() {
        let mut board = Board::new();
        let pos = BoardPosition::new(0, 3).unwrap();
        let tile = Tile::deck()[3].rotate();
        board
            .initial_move(InitialMove::new(Color::Red, pos, tile, Port::ALL[2]))
            .unwrap();
        let state = board.snapshot();

        let rebuilt = BoardState::from_state_pats(&state.to_state_pats()).unwrap();
        assert_eq!(rebuilt, state);
        assert!(rebuilt.get_tile(pos).unwrap().same_orientation(&tile));
    }

    #[test]
    fn test_conflicting_tiles_rejected() {
        let pats = [
            StatePat::IntermediatePlace(TilePattern(1, 0), 2, 2),
            StatePat::IntermediatePlace(TilePattern(2, 0), 2, 2),
        ];
        assert!(matches!(BoardState::from_state_pats(&pats), Err(TsuroError::Protocol(_))));
    }

    #[test]
    fn test_server_messages() {
        let message = ServerMessage::PlayingAs(Color::Blue);
        assert_eq!(serde_json::to_value(&message).unwrap(), json!(["playing-as", ["blue"]]));

        let message = ServerMessage::EndOfTournament(true);
        assert_eq!(serde_json::to_value(&message).unwrap(), json!(["end-of-tournament", [true]]));

        let parsed: ServerMessage = serde_json::from_value(json!(["take-turn", [[], 4, 17]])).unwrap();
        assert_eq!(
            parsed,
            ServerMessage::TakeTurn(WireOffer { state: Vec::new(), hand: vec![4, 17] })
        );

        assert!(serde_json::from_value::<ServerMessage>(json!(["dance", []])).is_err());
    }

    #[test]
    fn test_initial_action_pat() {
        let pat: InitialActionPat = serde_json::from_value(json!([[2, 180], "D", 9, 4])).unwrap();
        let action = pat.to_action().unwrap();
        assert_eq!(action.port, Port::ALL[3]);
        assert_eq!(action.position, BoardPosition::new(9, 4).unwrap());
        assert!(action.tile.same_orientation(&TilePattern(2, 180).to_tile().unwrap()));
        assert_eq!(InitialActionPat::from(action).to_action().unwrap(), action);
    }

    #[test]
    fn test_void() {
        assert!(expect_void(&json!("void")).is_ok());
        assert!(expect_void(&json!(null)).is_err());
    }
}

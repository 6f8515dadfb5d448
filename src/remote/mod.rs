//! Remote play over TCP.
//!
//! ## Key Components
//!
//! - [`protocol`]: JSON messages, state pats and replies
//! - [`JsonStream`]: consecutive JSON values over a reader/writer pair
//! - [`RemotePlayer`]: server-side proxy implementing [`Player`](crate::players::Player)
//! - [`RemoteAdmin`]: client-side loop driving a local player
//! - [`Server`]: registration, house players and one tournament

pub mod client;
pub mod protocol;
pub mod proxy;
pub mod server;
pub mod stream;

pub use client::RemoteAdmin;
pub use protocol::{InitialActionPat, PortLetter, ServerMessage, StatePat, WireOffer};
pub use proxy::RemotePlayer;
pub use server::{Server, ServerConfig, ServerReport, MAX_CLIENTS, REGISTRATION_WINDOW};
pub use stream::JsonStream;

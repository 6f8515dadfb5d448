//! The tournament server.
//!
//! ## Flow
//!
//! 1. Accept connections until the registration window closes or the client
//!    cap is reached. Each connection becomes a [`RemotePlayer`].
//! 2. Add the house players, which run locally with [`FirstLegalStrategy`].
//! 3. Run one tournament with a [`SimpleBracketStrategy`].
//! 4. Report winners and cheaters by name.
//!
//! Earlier registrations count as older players.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::admin::{Administrator, SimpleBracketStrategy, TournamentResult};
use crate::core::error::{Result, TsuroError};
use crate::core::{PlayerId, TournamentConfig};
use crate::players::{FirstLegalStrategy, Player, StrategyPlayer};

use super::proxy::RemotePlayer;
use super::stream::JsonStream;

/// How long clients may take to connect.
pub const REGISTRATION_WINDOW: Duration = Duration::from_secs(60);

/// Most remote clients accepted.
pub const MAX_CLIENTS: usize = 20;

const ACCEPT_POLL: Duration = Duration::from_millis(25);

/// Server settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub registration_window: Duration,
    pub max_clients: usize,
    /// Read/write timeout on client sockets, so a silent client cannot pin a
    /// player thread forever.
    pub io_timeout: Option<Duration>,
    pub tournament: TournamentConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 45678)),
            registration_window: REGISTRATION_WINDOW,
            max_clients: MAX_CLIENTS,
            io_timeout: Some(REGISTRATION_WINDOW),
            tournament: TournamentConfig::default(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    #[must_use]
    pub fn with_registration_window(mut self, window: Duration) -> Self {
        self.registration_window = window;
        self
    }

    #[must_use]
    pub fn with_max_clients(mut self, max: usize) -> Self {
        self.max_clients = max;
        self
    }

    #[must_use]
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_tournament(mut self, tournament: TournamentConfig) -> Self {
        self.tournament = tournament;
        self
    }
}

/// What the server prints once the tournament is over.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerReport {
    /// Leaderboard groups by name, best first, cheaters left out.
    pub winners: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cheaters: Vec<String>,
}

impl ServerReport {
    /// Name the players in `result`.
    #[must_use]
    pub fn from_result(result: &TournamentResult, names: &BTreeMap<PlayerId, String>) -> Self {
        let name = |id: &PlayerId| names.get(id).cloned().unwrap_or_else(|| id.to_string());
        let winners = result
            .leaderboard
            .iter()
            .map(|group| {
                let mut group: Vec<String> = group.iter().filter(|id| !result.cheaters.contains(*id)).map(name).collect();
                group.sort();
                group
            })
            .filter(|group| !group.is_empty())
            .collect();
        let mut cheaters: Vec<String> = result.cheaters.iter().map(name).collect();
        cheaters.sort();
        Self { winners, cheaters }
    }
}

/// A registered participant before the tournament starts.
struct Entry {
    name: String,
    player: Box<dyn Player>,
}

/// Listens for clients and runs a tournament.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    listener: TcpListener,
}

impl Server {
    /// Bind the listening socket.
    pub fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind)
            .map_err(|err| TsuroError::config(format!("could not bind {}: {}", config.bind, err)))?;
        Ok(Self { config, listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|err| TsuroError::config(format!("no local address: {}", err)))
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the whole flow. `names` name remote clients in connection order;
    /// clients beyond the list get generated names. Each `house` name adds
    /// one local player.
    pub fn run(self, names: &[String], house: &[String]) -> Result<ServerReport> {
        let mut entries = self.accept_clients(names)?;
        entries.extend(house.iter().map(|name| Entry {
            name: name.clone(),
            player: Box::new(StrategyPlayer::new(FirstLegalStrategy)) as Box<dyn Player>,
        }));
        info!(players = entries.len(), house = house.len(), "registration closed");

        let mut admin = Administrator::new(self.config.tournament.clone());
        let total = entries.len() as u32;
        let mut by_id = BTreeMap::new();
        for (order, entry) in entries.into_iter().enumerate() {
            let id = admin.add_player(entry.player, total - order as u32)?;
            by_id.insert(id, entry.name);
        }

        let result = admin.run_tournament(&mut SimpleBracketStrategy::new())?;
        Ok(ServerReport::from_result(&result, &by_id))
    }

    fn accept_clients(&self, names: &[String]) -> Result<Vec<Entry>> {
        let deadline = Instant::now() + self.config.registration_window;
        self.listener
            .set_nonblocking(true)
            .map_err(|err| TsuroError::config(format!("could not poll listener: {}", err)))?;

        let mut entries = Vec::new();
        while entries.len() < self.config.max_clients && Instant::now() < deadline {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    let name = names
                        .get(entries.len())
                        .cloned()
                        .unwrap_or_else(|| format!("client-{}", entries.len() + 1));
                    match self.connect(stream, &name) {
                        Ok(player) => {
                            info!(%addr, %name, "client registered");
                            entries.push(Entry { name, player });
                        }
                        Err(err) => warn!(%addr, %err, "dropping client"),
                    }
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
                Err(err) => warn!(%err, "accept failed"),
            }
        }
        debug!(clients = entries.len(), "stopped accepting");
        Ok(entries)
    }

    fn connect(&self, stream: TcpStream, name: &str) -> Result<Box<dyn Player>> {
        let setup = |err: std::io::Error| TsuroError::protocol(format!("could not set up connection: {}", err));
        stream.set_nonblocking(false).map_err(setup)?;
        stream.set_read_timeout(self.config.io_timeout).map_err(setup)?;
        stream.set_write_timeout(self.config.io_timeout).map_err(setup)?;
        stream.set_nodelay(true).map_err(setup)?;
        Ok(Box::new(RemotePlayer::new(name, JsonStream::from_tcp(stream)?)))
    }
}

//! Tsuro tournament server.
//!
//! Reads a JSON array of player specs (`[{"name": "..."}, ...]`) from stdin
//! naming the remote clients in the order they connect, accepts clients for
//! the registration window, fills up with house players and prints the
//! results as JSON on stdout.

use std::io::Read;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_tsuro::core::{RefereeConfig, TileSupplyConfig, TournamentConfig};
use rust_tsuro::remote::{Server, ServerConfig, MAX_CLIENTS};

/// Run one Tsuro tournament for TCP clients
#[derive(Parser, Debug)]
#[command(name = "tsuro-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(default_value = "45678")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Seconds to wait for clients
    #[arg(long, default_value = "60")]
    window: u64,

    /// Most clients to accept
    #[arg(long, default_value_t = MAX_CLIENTS)]
    max_clients: usize,

    /// Add a local player with this name (repeatable)
    #[arg(long = "house")]
    house: Vec<String>,

    /// Milliseconds a player gets per call
    #[arg(long, default_value = "3000")]
    player_timeout_ms: u64,

    /// Shuffle tiles with this seed instead of dealing the deck in order
    #[arg(long)]
    seed: Option<u64>,

    /// Run the games of a round in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Deserialize)]
struct PlayerSpec {
    name: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading player specs from stdin")?;
    let names: Vec<String> = if input.trim().is_empty() {
        Vec::new()
    } else {
        let specs: Vec<PlayerSpec> = serde_json::from_str(&input).context("player specs must be a JSON array")?;
        specs.into_iter().map(|spec| spec.name).collect()
    };

    let referee = RefereeConfig::default().with_player_timeout(Duration::from_millis(args.player_timeout_ms));
    let tile_supply = args
        .seed
        .map_or(TileSupplyConfig::Deterministic, |seed| TileSupplyConfig::Shuffled { seed });
    let tournament = TournamentConfig::default()
        .with_referee(referee)
        .with_tile_supply(tile_supply)
        .with_parallel_games(args.parallel);
    let config = ServerConfig::default()
        .with_bind(SocketAddr::new(args.host, args.port))
        .with_registration_window(Duration::from_secs(args.window))
        .with_max_clients(args.max_clients)
        .with_tournament(tournament);

    let server = Server::bind(config)?;
    info!(addr = %server.local_addr()?, "waiting for clients");
    let report = server.run(&names, &args.house)?;

    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

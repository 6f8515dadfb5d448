//! Tsuro client: connects to a server and plays with a local strategy.
//!
//! Prints `true` or `false` on stdout once the tournament result arrives.

use std::net::TcpStream;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rust_tsuro::players::{FirstLegalStrategy, StrategyPlayer};
use rust_tsuro::remote::{JsonStream, RemoteAdmin};

/// Play in a Tsuro tournament over TCP
#[derive(Parser, Debug)]
#[command(name = "tsuro-client")]
#[command(version, about, long_about = None)]
struct Args {
    /// Server host
    #[arg(default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(default_value = "45678")]
    port: u16,

    /// Strategy to play with
    #[arg(long, value_enum, default_value_t = StrategyKind::First)]
    strategy: StrategyKind,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyKind {
    /// First legal placement, first non-losing tile
    First,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let connection = TcpStream::connect((args.host.as_str(), args.port))
        .with_context(|| format!("connecting to {}:{}", args.host, args.port))?;
    info!(host = %args.host, port = args.port, strategy = ?args.strategy, "connected");

    let player = match args.strategy {
        StrategyKind::First => StrategyPlayer::new(FirstLegalStrategy),
    };
    let mut admin = RemoteAdmin::new(player, JsonStream::from_tcp(connection)?);
    match admin.run()? {
        Some(won) => println!("{}", won),
        None => warn!("disconnected before the tournament ended"),
    }
    Ok(())
}

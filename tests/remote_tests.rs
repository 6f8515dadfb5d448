//! Remote play over loopback TCP.
//!
//! A real server on an ephemeral port with clients on their own threads:
//! honest clients play through to the end-of-tournament message, and a client
//! that answers nonsense is reported as a cheater and hung up on.

use std::collections::BTreeSet;
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

use rust_tsuro::core::{RefereeConfig, TournamentConfig};
use rust_tsuro::players::{FirstLegalStrategy, StrategyPlayer};
use rust_tsuro::remote::{JsonStream, RemoteAdmin, Server, ServerConfig};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn server(max_clients: usize) -> Server {
    let tournament = TournamentConfig::default()
        .with_referee(RefereeConfig::default().with_player_timeout(Duration::from_secs(5)));
    let config = ServerConfig::default()
        .with_bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .with_registration_window(Duration::from_secs(10))
        .with_max_clients(max_clients)
        .with_io_timeout(Some(Duration::from_secs(10)))
        .with_tournament(tournament);
    Server::bind(config).unwrap()
}

fn play_remotely(addr: SocketAddr) -> Option<bool> {
    let socket = TcpStream::connect(addr).unwrap();
    let stream = JsonStream::from_tcp(socket).unwrap();
    let mut client = RemoteAdmin::new(StrategyPlayer::new(FirstLegalStrategy), stream);
    client.run().unwrap()
}

#[test]
fn test_remote_clients_play_a_tournament() {
    let server = server(3);
    let addr = server.local_addr().unwrap();
    let remote = names(&["ann", "ben", "cat"]);
    let house = names(&["house-1", "house-2"]);

    let host = thread::spawn(move || server.run(&remote, &house).unwrap());
    let clients: Vec<_> = (0..3)
        .map(|_| thread::spawn(move || play_remotely(addr)))
        .collect();
    let outcomes: Vec<Option<bool>> = clients.into_iter().map(|c| c.join().unwrap()).collect();
    let report = host.join().unwrap();

    let everyone: BTreeSet<String> = report.winners.iter().flatten().cloned().collect();
    assert_eq!(everyone, names(&["ann", "ben", "cat", "house-1", "house-2"]).into_iter().collect());
    assert_eq!(report.winners.iter().map(Vec::len).sum::<usize>(), 5);
    assert!(report.cheaters.is_empty());

    assert!(outcomes.iter().all(Option::is_some));
    let remote_winners = report.winners[0].iter().filter(|n| !n.starts_with("house")).count();
    let told_they_won = outcomes.iter().filter(|o| **o == Some(true)).count();
    assert_eq!(told_they_won, remote_winners);
}

#[test]
fn test_nonsense_answers_make_a_cheater() {
    let server = server(1);
    let addr = server.local_addr().unwrap();
    let remote = names(&["rogue"]);
    let house = names(&["house-1", "house-2", "house-3"]);

    let host = thread::spawn(move || server.run(&remote, &house).unwrap());
    let rogue = thread::spawn(move || {
        let socket = TcpStream::connect(addr).unwrap();
        let mut stream = JsonStream::from_tcp(socket).unwrap();
        let mut heard = 0;
        while let Ok(Some(_)) = stream.receive_value() {
            heard += 1;
            if stream.send("hello").is_err() {
                break;
            }
        }
        heard
    });

    let report = host.join().unwrap();
    let heard = rogue.join().unwrap();

    assert_eq!(report.cheaters, names(&["rogue"]));
    assert!(report.winners.iter().flatten().all(|n| n != "rogue"));
    assert_eq!(report.winners.iter().map(Vec::len).sum::<usize>(), 3);
    assert_eq!(heard, 1);
}

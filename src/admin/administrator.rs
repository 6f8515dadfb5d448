//! Runs a knockout tournament of Tsuro games.
//!
//! ## Rounds
//!
//! Each round the bracket strategy splits the live players into games, one
//! referee runs each game, and the strategy decides who is knocked out. A
//! round with a single game is the final: its ranking heads the leaderboard.
//! If the live players can no longer be split into games after the first
//! round, whoever is left shares first place. A round that removes nobody
//! ends the tournament with the remaining players ranked by their last game.
//!
//! ## Leaderboard
//!
//! Final ranking first, then players knocked out in later rounds ahead of
//! earlier ones, grouped by the rank they reached in their last game.
//! Cheaters form the last group and are never told the outcome.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::error::{Result, TsuroError};
use crate::core::{Color, Entrant, GameRng, Observer, ObserverList, PlayerId, TileSupplyConfig, TournamentConfig};
use crate::players::{Notification, Player};
use crate::referee::{tile_supply, PlayerHandle, Referee, MAX_PLAYERS, MIN_PLAYERS};
use crate::rules::StandardRuleChecker;

use super::bracket::BracketStrategy;
use super::event::TournamentEvent;
use super::result::{GameRecord, TournamentResult};

struct Registration {
    entrant: Entrant,
    player: PlayerHandle,
}

/// One game of a round, ready to hand to a referee.
struct Table {
    seats: Vec<(PlayerId, PlayerHandle, u32)>,
    rng: Option<GameRng>,
}

/// Registers players and runs the tournament.
pub struct Administrator {
    config: TournamentConfig,
    registrations: Vec<Registration>,
    rng: Option<GameRng>,
    started: bool,
    observers: ObserverList<TournamentEvent>,
}

impl Default for Administrator {
    fn default() -> Self {
        Self::new(TournamentConfig::default())
    }
}

impl Administrator {
    #[must_use]
    pub fn new(config: TournamentConfig) -> Self {
        let rng = match config.tile_supply {
            TileSupplyConfig::Shuffled { seed } => Some(GameRng::new(seed)),
            TileSupplyConfig::Deterministic => None,
        };
        Self {
            config,
            registrations: Vec::new(),
            rng,
            started: false,
            observers: ObserverList::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Registered players, in registration order.
    #[must_use]
    pub fn entrants(&self) -> Vec<Entrant> {
        self.registrations.iter().map(|r| r.entrant).collect()
    }

    /// Register a player of the given age. Ids are handed out in order.
    pub fn add_player(&mut self, player: Box<dyn Player>, age: u32) -> Result<PlayerId> {
        if self.started {
            return Err(TsuroError::config("cannot add players once the tournament has started"));
        }
        let id = PlayerId(self.registrations.len() as u32);
        self.registrations.push(Registration {
            entrant: Entrant::new(id, age),
            player: PlayerHandle::new(player),
        });
        debug!(%id, age, "player registered");
        self.observers.notify(&TournamentEvent::PlayerAdded { id, age });
        Ok(id)
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer<TournamentEvent>>) {
        self.observers.add(observer);
    }

    /// Run the whole tournament. Can only be called once.
    pub fn run_tournament(&mut self, strategy: &mut dyn BracketStrategy) -> Result<TournamentResult> {
        if self.started {
            return Err(TsuroError::config("the tournament has already been run"));
        }
        if self.registrations.len() < MIN_PLAYERS {
            return Err(TsuroError::StrategyCannotBucket {
                players: self.registrations.len(),
            });
        }
        self.started = true;
        info!(players = self.registrations.len(), "tournament started");

        let mut live: Vec<Entrant> = self.entrants();
        let mut cheaters: BTreeSet<PlayerId> = BTreeSet::new();
        // Knocked-out groups per round, best rank first.
        let mut knocked_out: Vec<Vec<BTreeSet<PlayerId>>> = Vec::new();
        let mut last_rank: BTreeMap<PlayerId, usize> = BTreeMap::new();
        let mut round: u32 = 0;

        let podium = loop {
            round += 1;
            let buckets = match strategy.bucket_players(&live) {
                Ok(buckets) => buckets,
                Err(err) if round == 1 => return Err(err),
                Err(err) => {
                    info!(round, %err, remaining = live.len(), "no more games; remaining players share first place");
                    break vec![live.iter().map(|e| e.id).collect::<BTreeSet<_>>()];
                }
            };
            self.check_buckets(&live, &buckets)?;
            info!(round, games = buckets.len(), "round started");
            self.observers.notify(&TournamentEvent::RoundStarted {
                round,
                games: buckets.clone(),
            });

            let records = self.play_round(round, &buckets)?;
            for record in &records {
                self.observers.notify(&TournamentEvent::GameCompleted(record.clone()));
            }

            if let [final_game] = records.as_slice() {
                if !final_game.cheaters.is_empty() {
                    cheaters.extend(final_game.cheaters.iter().copied());
                    self.observers.notify(&TournamentEvent::PlayersCheated {
                        round,
                        players: final_game.cheaters.clone(),
                    });
                }
                break without(&final_game.ranking, &final_game.cheaters);
            }

            let live_ids: BTreeSet<PlayerId> = live.iter().map(|e| e.id).collect();
            let elimination = strategy.eliminate_players(&live_ids, &records)?;
            let cheated: BTreeSet<PlayerId> = elimination.cheated.intersection(&live_ids).copied().collect();
            let eliminated: BTreeSet<PlayerId> = elimination
                .eliminated
                .iter()
                .copied()
                .filter(|p| live_ids.contains(p) && !cheated.contains(p))
                .collect();

            if !cheated.is_empty() {
                cheaters.extend(cheated.iter().copied());
                self.observers.notify(&TournamentEvent::PlayersCheated {
                    round,
                    players: cheated.clone(),
                });
            }
            if !eliminated.is_empty() {
                info!(round, players = ?eliminated, "players eliminated");
                self.observers.notify(&TournamentEvent::PlayersEliminated {
                    round,
                    players: eliminated.clone(),
                });
            }

            for record in &records {
                for player in record.players() {
                    if let Some(rank) = record.rank_of(player) {
                        last_rank.insert(player, rank);
                    }
                }
            }
            knocked_out.push(group_by_rank(&eliminated, &last_rank));
            live.retain(|e| !eliminated.contains(&e.id) && !cheated.contains(&e.id));

            if eliminated.is_empty() && cheated.is_empty() {
                warn!(round, "round removed nobody; ending the tournament");
                let remaining: BTreeSet<PlayerId> = live.iter().map(|e| e.id).collect();
                break group_by_rank(&remaining, &last_rank);
            }
            if live.is_empty() {
                break Vec::new();
            }
        };

        let mut leaderboard: Vec<BTreeSet<PlayerId>> = podium.into_iter().filter(|g| !g.is_empty()).collect();
        leaderboard.extend(knocked_out.into_iter().rev().flatten().filter(|g| !g.is_empty()));
        if !cheaters.is_empty() {
            leaderboard.push(cheaters.clone());
        }
        let result = TournamentResult { leaderboard, cheaters };

        self.notify_players(&result);
        info!(winners = ?result.winners(), cheaters = ?result.cheaters, "tournament finished");
        self.observers.notify(&TournamentEvent::TournamentCompleted(result.clone()));
        Ok(result)
    }

    fn check_buckets(&self, live: &[Entrant], buckets: &[Vec<PlayerId>]) -> Result<()> {
        let live_ids: BTreeSet<PlayerId> = live.iter().map(|e| e.id).collect();
        let mut seen = BTreeSet::new();
        for bucket in buckets {
            if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&bucket.len()) {
                return Err(TsuroError::InvalidPlayerCount { count: bucket.len() });
            }
            for id in bucket {
                if !live_ids.contains(id) || !seen.insert(*id) {
                    return Err(TsuroError::config(format!(
                        "bracket placed {} in a game they cannot play",
                        id
                    )));
                }
            }
        }
        if seen != live_ids {
            return Err(TsuroError::config("bracket left live players without a game"));
        }
        Ok(())
    }

    fn play_round(&mut self, round: u32, buckets: &[Vec<PlayerId>]) -> Result<Vec<GameRecord>> {
        let handles: BTreeMap<PlayerId, (PlayerHandle, u32)> = self
            .registrations
            .iter()
            .map(|r| (r.entrant.id, (r.player.clone(), r.entrant.age)))
            .collect();

        let mut tables = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let mut seats = Vec::with_capacity(bucket.len());
            for id in bucket {
                let (player, age) = handles.get(id).cloned().ok_or_else(|| {
                    TsuroError::config(format!("{} is not registered", id))
                })?;
                seats.push((*id, player, age));
            }
            let rng = self.rng.as_mut().map(GameRng::fork);
            tables.push(Table { seats, rng });
        }

        let config = &self.config;
        if config.parallel_games {
            tables.par_iter().map(|table| play_game(config, round, table)).collect()
        } else {
            tables.iter().map(|table| play_game(config, round, table)).collect()
        }
    }

    fn notify_players(&self, result: &TournamentResult) {
        let winners = result.winners();
        for registration in &self.registrations {
            let id = registration.entrant.id;
            if result.cheaters.contains(&id) {
                continue;
            }
            let won = winners.contains(&id);
            if let Err(fault) = registration.player.call(
                Notification::EndOfTournament,
                self.config.notify_timeout,
                move |p| p.end_of_tournament(won),
            ) {
                warn!(%id, %fault, "could not deliver tournament result");
            }
        }
    }
}

fn play_game(config: &TournamentConfig, round: u32, table: &Table) -> Result<GameRecord> {
    let mut referee = Referee::new(config.referee.clone());
    let colors = referee.set_players(
        table
            .seats
            .iter()
            .map(|(_, player, age)| (player.clone(), *age))
            .collect(),
    )?;
    referee.set_rule_checker(Box::new(StandardRuleChecker::from_config(&config.referee)))?;
    referee.set_tile_iterator(tile_supply(config.tile_supply, table.rng.clone()))?;

    let result = referee.run_game()?;
    let seats: BTreeMap<Color, PlayerId> = colors
        .into_iter()
        .zip(table.seats.iter().map(|(id, _, _)| *id))
        .collect();
    Ok(GameRecord::from_game_result(round, &result, &seats))
}

fn without(ranking: &[BTreeSet<PlayerId>], excluded: &BTreeSet<PlayerId>) -> Vec<BTreeSet<PlayerId>> {
    ranking
        .iter()
        .map(|group| group.difference(excluded).copied().collect::<BTreeSet<_>>())
        .filter(|group| !group.is_empty())
        .collect()
}

fn group_by_rank(players: &BTreeSet<PlayerId>, ranks: &BTreeMap<PlayerId, usize>) -> Vec<BTreeSet<PlayerId>> {
    let mut groups: BTreeMap<usize, BTreeSet<PlayerId>> = BTreeMap::new();
    for &player in players {
        let rank = ranks.get(&player).copied().unwrap_or(usize::MAX);
        groups.entry(rank).or_default().insert(player);
    }
    groups.into_values().collect()
}

impl std::fmt::Debug for Administrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Administrator")
            .field("config", &self.config)
            .field("players", &self.registrations.len())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

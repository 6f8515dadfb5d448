//! Time-bounded calls into untrusted players.
//!
//! Each call runs on its own thread and the caller waits at most the given
//! budget for the answer. A player that hangs keeps its thread (and its lock)
//! but never blocks the caller; later calls on the same handle simply time out
//! as well. A panic inside the player surfaces as [`PlayerFault::Panicked`].

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::core::PlayerFault;
use crate::players::{Notification, Player};

/// A shareable, timeout-guarded reference to a player.
#[derive(Clone)]
pub struct PlayerHandle {
    player: Arc<Mutex<Box<dyn Player>>>,
}

impl PlayerHandle {
    #[must_use]
    pub fn new(player: Box<dyn Player>) -> Self {
        Self {
            player: Arc::new(Mutex::new(player)),
        }
    }

    /// Run `f` against the player, giving up after `timeout`.
    pub fn call<T, F>(&self, what: Notification, timeout: Duration, f: F) -> Result<T, PlayerFault>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Player) -> anyhow::Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let player = Arc::clone(&self.player);

        let spawned = thread::Builder::new()
            .name(format!("player-{:?}", what))
            .spawn(move || {
                let answer = match player.lock() {
                    Ok(mut guard) => f(&mut **guard).map_err(PlayerFault::from),
                    Err(_) => Err(PlayerFault::Panicked),
                };
                // The caller may have stopped waiting.
                let _ = tx.send(answer);
            });
        if let Err(err) = spawned {
            return Err(PlayerFault::Failed(format!("could not start player call: {}", err)));
        }

        let answer = match rx.recv_timeout(timeout) {
            Ok(answer) => answer,
            Err(RecvTimeoutError::Timeout) => Err(PlayerFault::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(PlayerFault::Panicked),
        };
        if let Err(fault) = &answer {
            warn!(call = ?what, %fault, "player call failed");
        }
        answer
    }
}

impl std::fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerHandle").finish_non_exhaustive()
    }
}

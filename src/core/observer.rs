//! Observer plumbing shared by the board, referee, players and administrator.
//!
//! Each subject defines its own event enum and keeps an [`ObserverList`] of
//! that event type. Observers are untrusted: an observer that returns an error
//! or panics is logged and skipped, and the subject carries on.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

/// Receives events of type `E`.
pub trait Observer<E>: Send {
    fn notify(&mut self, event: &E) -> anyhow::Result<()>;
}

impl<E, F> Observer<E> for F
where
    F: FnMut(&E) -> anyhow::Result<()> + Send,
{
    fn notify(&mut self, event: &E) -> anyhow::Result<()> {
        self(event)
    }
}

/// Zero or more observers of one subject.
pub struct ObserverList<E> {
    observers: Vec<Box<dyn Observer<E>>>,
}

impl<E> Default for ObserverList<E> {
    fn default() -> Self {
        Self { observers: Vec::new() }
    }
}

impl<E: std::fmt::Debug> ObserverList<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, observer: Box<dyn Observer<E>>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `event` to every observer, swallowing failures.
    pub fn notify(&mut self, event: &E) {
        for (index, observer) in self.observers.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| observer.notify(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(observer = index, ?event, error = %err, "observer failed"),
                Err(_) => warn!(observer = index, ?event, "observer panicked"),
            }
        }
    }
}

impl<E> std::fmt::Debug for ObserverList<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverList").field("len", &self.observers.len()).finish()
    }
}

//! Latest-request-wins slot
//!
//! A slot runs at most one request of a kind at a time. Starting a new
//! request aborts the one in flight, and the result of a request that has
//! been replaced is never delivered, even if it finished in the meantime.

use std::future::Future;
use std::panic;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;
use tracing::debug;

/// Result of running a request through a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The request was the latest of its kind; its result was delivered
    Current(T),
    /// A newer request replaced this one, or the slot was cancelled
    Superseded,
}

impl<T> Outcome<T> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }
}

impl<T, E> Outcome<Result<T, E>> {
    /// Moves the error of a delivered result out of the outcome.
    pub fn transpose(self) -> Result<Outcome<T>, E> {
        match self {
            Outcome::Current(result) => result.map(Outcome::Current),
            Outcome::Superseded => Ok(Outcome::Superseded),
        }
    }
}

#[derive(Debug, Default)]
struct SlotState {
    /// Bumped on every start and cancel; a run is current while it matches
    generation: u64,
    in_flight: Option<AbortHandle>,
}

/// Aborts the spawned request when the caller stops waiting for it.
///
/// Disarmed once the task has been joined.
struct InFlightGuard<'a> {
    slot: &'a RequestSlot,
    generation: u64,
    abort: AbortHandle,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.abort.abort();
        let mut state = self.slot.lock();
        if state.generation == self.generation {
            state.in_flight = None;
            debug!(slot = self.slot.name, "caller went away, aborted request");
        }
    }
}

/// Runs requests of one kind, keeping only the latest.
#[derive(Debug)]
pub struct RequestSlot {
    name: &'static str,
    state: Mutex<SlotState>,
}

impl RequestSlot {
    /// Creates an idle slot. The name only shows up in log output.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(SlotState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `request` on a tokio task, replacing any request in flight.
    ///
    /// When the request finishes and is still the latest one, `deliver` is
    /// called with its output while the slot is locked, so no newer request
    /// can start between the check and the delivery. Otherwise `deliver` is
    /// never called and `Outcome::Superseded` is returned.
    ///
    /// Dropping the returned future aborts the request.
    ///
    /// A panic inside `request` is resumed on the caller.
    pub async fn run<F, T, R, D>(&self, request: F, deliver: D) -> Outcome<R>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        D: FnOnce(T) -> R,
    {
        let task = tokio::spawn(request);
        let abort = task.abort_handle();

        let generation = {
            let mut state = self.lock();
            if let Some(previous) = state.in_flight.replace(task.abort_handle()) {
                previous.abort();
                debug!(slot = self.name, "aborted in-flight request");
            }
            state.generation += 1;
            state.generation
        };

        let mut guard = InFlightGuard {
            slot: self,
            generation,
            abort,
            armed: true,
        };
        let joined = task.await;
        guard.armed = false;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(slot = self.name, generation, "dropping superseded result");
            return Outcome::Superseded;
        }
        state.in_flight = None;

        match joined {
            Ok(output) => Outcome::Current(deliver(output)),
            Err(e) if e.is_cancelled() => Outcome::Superseded,
            Err(e) => panic::resume_unwind(e.into_panic()),
        }
    }

    /// Aborts the request in flight, if any. Its caller sees
    /// `Outcome::Superseded`.
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.generation += 1;
        if let Some(previous) = state.in_flight.take() {
            previous.abort();
            debug!(slot = self.name, "cancelled in-flight request");
        }
    }

    /// Whether a request is currently running in this slot.
    pub fn is_busy(&self) -> bool {
        self.lock().in_flight.is_some()
    }
}

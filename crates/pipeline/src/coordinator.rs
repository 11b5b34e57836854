//! Turn coordinator
//!
//! Tracks how many fragments of the current turn are still in flight
//! (queued for synthesis, queued for playback, or mid-playback) and
//! exposes the completion barrier: `await_complete` unblocks exactly
//! when the counter reaches zero. Production happens on the
//! turn-driving path and consumption on the player worker, so the
//! counter lives behind a single lock.

use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct TurnState {
    in_flight: usize,
    cancelled: bool,
    epoch: u64,
}

/// Per-turn in-flight accounting with a completion barrier.
#[derive(Debug, Default)]
pub struct TurnCoordinator {
    state: Mutex<TurnState>,
    complete: Notify,
}

impl TurnCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh turn: zero the counter, clear cancellation, and
    /// advance the epoch so fragments of the abandoned turn can no
    /// longer touch the counter.
    pub fn begin_turn(&self) {
        let mut state = self.state.lock();
        state.in_flight = 0;
        state.cancelled = false;
        state.epoch += 1;
    }

    /// One fragment was queued for this turn. Returns the current
    /// epoch; the fragment carries it through the stages and hands it
    /// back at consumption.
    pub fn fragment_produced(&self) -> u64 {
        let mut state = self.state.lock();
        state.in_flight += 1;
        state.epoch
    }

    /// One fragment finished playback (or was dropped on failure).
    ///
    /// A fragment stamped with an earlier epoch belongs to an
    /// abandoned turn and is ignored: a fragment mid-playback when the
    /// turn was pre-empted still finishes on the device, but must not
    /// debit the new turn's counter. Also saturates at zero for the
    /// window between `cancel` and the next `begin_turn`.
    pub fn fragment_consumed(&self, epoch: u64) {
        let mut state = self.state.lock();
        if state.epoch != epoch {
            return;
        }
        state.in_flight = state.in_flight.saturating_sub(1);
        let done = state.in_flight == 0;
        drop(state);
        if done {
            self.complete.notify_waiters();
        }
    }

    /// Suspend until every produced fragment of this turn has been
    /// consumed.
    pub async fn await_complete(&self) {
        loop {
            let notified = self.complete.notified();
            if self.state.lock().in_flight == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Abandon the current turn: set the cancellation flag, force the
    /// counter to zero, and release any barrier waiter. The caller is
    /// responsible for draining the stage channels first.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.cancelled = true;
        state.in_flight = 0;
        drop(state);
        self.complete.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }
}

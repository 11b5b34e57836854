//! Stage channel
//!
//! FIFO handoff between pipeline stages. A payload queue plus an
//! explicit end-of-stream sentinel (`close`). Consumers block on
//! `recv`; cancellation drains pending payloads from the outside
//! without disturbing the consumer.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

struct State<T> {
    queue: VecDeque<T>,
    closed: bool,
}

/// Internally synchronized FIFO shared between one producer side and
/// one consuming stage worker.
pub struct StageChannel<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> Default for StageChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StageChannel<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Enqueue a payload. Returns `false` if the sentinel was already
    /// sent; late payloads are dropped.
    pub fn send(&self, item: T) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.queue.push_back(item);
        self.available.notify_one();
        true
    }

    /// Send the end-of-stream sentinel. Idempotent; payloads queued
    /// before the close are still delivered in FIFO order.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.available.notify_all();
    }

    /// Blocking take. `None` means the sentinel was observed and the
    /// queue is fully drained; the consumer stops.
    pub fn recv(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.queue.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Discard all pending payloads without blocking; returns how many
    /// were dropped. Used when cancelling a turn.
    pub fn drain(&self) -> usize {
        let mut state = self.state.lock();
        let dropped = state.queue.len();
        state.queue.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }
}

//! Virtual-clock scheduler for tests.
//!
//! Nothing runs until [`ManualScheduler::advance`] moves the clock; due tasks then run on the
//! calling thread in deadline order (ties in scheduling order). Tasks scheduled while the
//! clock is moving are picked up in the same call if they fall inside the window.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::scheduler::{Cancellable, Scheduler, Task};

struct Pending {
    id: u64,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ClockState>>,
}

struct ManualAbort {
    id: u64,
    state: Arc<Mutex<ClockState>>,
}

impl Cancellable for ManualAbort {
    fn abort(&self) {
        self.state.lock().pending.retain(|p| p.id != self.id);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Move the clock forward by `by`, running every task that comes due.
    pub fn advance(&self, by: Duration) {
        let target = self.state.lock().now + by;
        loop {
            // The lock is released before the task runs so it can schedule follow-ups.
            let task = {
                let mut state = self.state.lock();
                let next = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.id))
                    .map(|(idx, _)| idx);
                match next {
                    Some(idx) => {
                        let pending = state.pending.swap_remove(idx);
                        state.now = pending.due;
                        pending.task
                    }
                    None => {
                        state.now = target;
                        return;
                    }
                }
            };
            task();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn Cancellable> {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + delay;
        state.pending.push(Pending { id, due, task });
        Box::new(ManualAbort {
            id,
            state: self.state.clone(),
        })
    }
}

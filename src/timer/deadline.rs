//! Per-player turn-deadline scheduler.
//!
//! Once a turn opens the player hears "30" right away, then 15, 5, 3 and 1 as each stage's
//! wait elapses; the wait after the last stage raises the deadline-expired signal. Every
//! transition (announce, install the next handle, schedule it, or publish the expiry) runs
//! inside the registry's critical section, so once [`DeadlineScheduler::cancel`] returns
//! nothing more is emitted for the cancelled handle, even if its task was already running.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use log::{debug, info, trace};
use tokio_util::sync::CancellationToken;

use super::handle::TimerHandle;
use super::notify::{ConnectionRef, ExpiryPublisher, send_remaining_time};
use super::registry::TimerRegistry;
use super::scheduler::Scheduler;
use super::stage::{Stage, StageSequencer, Transition};
use crate::protocol::PlayerId;

/// Cheap to clone; clones share the same registry and substrate.
#[derive(Clone)]
pub struct DeadlineScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Arc<TimerRegistry>,
    scheduler: Arc<dyn Scheduler>,
    publisher: Arc<dyn ExpiryPublisher>,
    sequencer: StageSequencer,
    tickets: AtomicU64,
}

impl DeadlineScheduler {
    pub fn new(
        registry: Arc<TimerRegistry>,
        scheduler: Arc<dyn Scheduler>,
        publisher: Arc<dyn ExpiryPublisher>,
        sequencer: StageSequencer,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                scheduler,
                publisher,
                sequencer,
                tickets: AtomicU64::new(0),
            }),
        }
    }

    /// Open a countdown for `player` at the first stage.
    pub fn start_turn_timer(&self, player: PlayerId, connection: ConnectionRef) {
        match self.inner.begin(player, connection) {
            Some(previous) => debug!(
                "[TurnTimer] Countdown started for player={} (replaced stage {})",
                player, previous
            ),
            None => info!("[TurnTimer] Countdown started for player={}", player),
        }
    }

    /// Restart the player's countdown from the first stage. A player without a live
    /// countdown simply gets a fresh one.
    pub fn reset(&self, player: PlayerId, connection: ConnectionRef) {
        match self.inner.begin(player, connection) {
            Some(previous) => info!(
                "[TurnTimer] Countdown reset for player={} (was at stage {})",
                player, previous
            ),
            None => info!("[TurnTimer] Countdown reset for idle player={}", player),
        }
    }

    /// Stop the player's countdown, returning the stage it was on, or `None` when the player
    /// had no live countdown.
    pub fn cancel(&self, player: PlayerId) -> Option<Stage> {
        let stage = self.inner.registry.take(player).map(TimerHandle::cancel);
        match stage {
            Some(stage) => debug!("[TurnTimer] Countdown cancelled for player={} at stage {}", player, stage),
            None => trace!("[TurnTimer] No countdown to cancel for player={}", player),
        }
        stage
    }

    pub fn is_active(&self, player: PlayerId) -> bool {
        self.inner.registry.is_active(player)
    }
}

impl Inner {
    /// Announce the initial stage and install its handle, cancelling any handle displaced.
    /// A displaced handle that fires before its cancel lands finds a foreign ticket and stops.
    fn begin(self: &Arc<Self>, player: PlayerId, connection: ConnectionRef) -> Option<Stage> {
        let stage = self.sequencer.initial();
        let previous = self.registry.install(player, || {
            send_remaining_time(player, &*connection, stage);
            self.arm(player, stage, connection)
        });
        previous.map(TimerHandle::cancel)
    }

    /// Schedule the fire of `stage` and wrap it in a handle. Caller installs the handle.
    fn arm(self: &Arc<Self>, player: PlayerId, stage: Stage, connection: ConnectionRef) -> TimerHandle {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let wait = self.sequencer.wait_after(stage);

        let weak: Weak<Self> = Arc::downgrade(self);
        let fire_token = token.clone();
        let task = self.scheduler.schedule(
            wait,
            Box::new(move || {
                if fire_token.is_cancelled() {
                    return;
                }
                if let Some(inner) = weak.upgrade() {
                    inner.on_fire(player, ticket, stage, connection);
                }
            }),
        );
        trace!("[TurnTimer] Stage {} armed for player={} ticket={} wait={:?}", stage, player, ticket, wait);
        TimerHandle::new(player, stage, ticket, token, task)
    }

    fn on_fire(self: &Arc<Self>, player: PlayerId, ticket: u64, stage: Stage, connection: ConnectionRef) {
        self.registry.with_slot(player, |slot| {
            if slot.as_ref().map(TimerHandle::ticket) != Some(ticket) {
                // Cancelled or replaced while this task was on its way in.
                trace!("[TurnTimer] Stale fire ignored for player={} ticket={}", player, ticket);
                return;
            }
            // The fired handle is consumed; dropping it does not abort the running task.
            slot.take();

            match self.sequencer.next_stage(stage) {
                Transition::Advance(next) => {
                    send_remaining_time(player, &*connection, next);
                    *slot = Some(self.arm(player, next, connection));
                }
                Transition::Expire => {
                    info!("[TurnTimer] Deadline expired for player={}", player);
                    self.publisher.publish(player, connection);
                }
            }
        });
    }
}

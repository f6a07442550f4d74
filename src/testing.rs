//! Test doubles shared by the scenario tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::protocol::{FinishState, PlayerId, ServerboundPacket};
use crate::timer::manual::ManualScheduler;
use crate::timer::{
    Connection, ConnectionRef, CountdownPacing, DeadlineScheduler, ExpiryPublisher, SendError,
    StageSequencer, TimerRegistry,
};

/// Connection that keeps every packet it is given.
#[derive(Default)]
pub struct RecordingConnection {
    sent: Mutex<Vec<ServerboundPacket>>,
    closed: AtomicBool,
}

impl RecordingConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn packets(&self) -> Vec<ServerboundPacket> {
        self.sent.lock().clone()
    }

    /// Seconds announced by remaining-time notices, in order.
    pub fn remaining_times(&self) -> Vec<u8> {
        self.sent
            .lock()
            .iter()
            .filter_map(|p| match p {
                ServerboundPacket::RemainingTime(rt) => Some(rt.stage.seconds()),
                _ => None,
            })
            .collect()
    }

    pub fn game_end(&self) -> Option<FinishState> {
        self.sent.lock().iter().find_map(|p| match p {
            ServerboundPacket::GameEnd(end) => Some(end.state),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl Connection for RecordingConnection {
    fn send(&self, packet: ServerboundPacket) -> Result<(), SendError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SendError::Closed);
        }
        self.sent.lock().push(packet);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    expired: Mutex<Vec<PlayerId>>,
}

impl RecordingPublisher {
    pub fn expired(&self) -> Vec<PlayerId> {
        self.expired.lock().clone()
    }
}

impl ExpiryPublisher for RecordingPublisher {
    fn publish(&self, player: PlayerId, _connection: ConnectionRef) {
        self.expired.lock().push(player);
    }
}

/// A deadline scheduler on a virtual clock.
pub struct Fixture {
    pub clock: ManualScheduler,
    pub registry: Arc<TimerRegistry>,
    pub publisher: Arc<RecordingPublisher>,
    pub deadlines: DeadlineScheduler,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_pacing(CountdownPacing::Inherited)
    }

    pub fn with_pacing(pacing: CountdownPacing) -> Self {
        let clock = ManualScheduler::new();
        let registry = Arc::new(TimerRegistry::new());
        let publisher = Arc::new(RecordingPublisher::default());
        let deadlines = DeadlineScheduler::new(
            registry.clone(),
            Arc::new(clock.clone()),
            publisher.clone(),
            StageSequencer::new(pacing),
        );
        Self {
            clock,
            registry,
            publisher,
            deadlines,
        }
    }
}

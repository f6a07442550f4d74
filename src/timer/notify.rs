//! Outbound edges of the countdown: remaining-time notices and the expiry signal.

use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

use super::stage::Stage;
use crate::protocol::{PlayerId, ServerboundPacket};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("connection closed")]
    Closed,
}

/// Transport-level session of one player. Sending must not block and must not call back
/// into the deadline scheduler.
pub trait Connection: Send + Sync {
    fn send(&self, packet: ServerboundPacket) -> Result<(), SendError>;
}

pub type ConnectionRef = Arc<dyn Connection>;

/// Receives the deadline-expired signal. Same non-blocking contract as [`Connection::send`].
pub trait ExpiryPublisher: Send + Sync {
    fn publish(&self, player: PlayerId, connection: ConnectionRef);
}

/// Push a remaining-time notice. Failures are logged and otherwise ignored; the countdown
/// keeps its schedule whether or not the player received it.
pub fn send_remaining_time(player: PlayerId, connection: &dyn Connection, stage: Stage) {
    match connection.send(ServerboundPacket::remaining_time(stage)) {
        Ok(()) => debug!("[TurnTimer] Remaining time {} sent to player={}", stage, player),
        Err(e) => warn!(
            "[TurnTimer] Failed to send remaining time {} to player={}: {}",
            stage, player, e
        ),
    }
}

use std::fmt;

use tokio_util::sync::CancellationToken;

use super::scheduler::Cancellable;
use super::stage::Stage;
use crate::protocol::PlayerId;

/// One scheduled stage-fire for one player.
///
/// `ticket` is unique per handle; a firing task only acts if the registry still holds the
/// handle with its ticket.
pub struct TimerHandle {
    player: PlayerId,
    stage: Stage,
    ticket: u64,
    token: CancellationToken,
    task: Box<dyn Cancellable>,
}

impl TimerHandle {
    pub fn new(
        player: PlayerId,
        stage: Stage,
        ticket: u64,
        token: CancellationToken,
        task: Box<dyn Cancellable>,
    ) -> Self {
        Self {
            player,
            stage,
            ticket,
            token,
            task,
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Cancel the token and abort the pending task, returning the stage it was on.
    pub fn cancel(self) -> Stage {
        self.token.cancel();
        self.task.abort();
        self.stage
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("player", &self.player)
            .field("stage", &self.stage)
            .field("ticket", &self.ticket)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

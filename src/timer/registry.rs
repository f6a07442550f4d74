//! Player → live countdown handle.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::handle::TimerHandle;
use crate::protocol::PlayerId;

/// Shared registry of live countdowns, at most one per player.
///
/// Every operation runs as a single critical section over the player's slot, so a
/// remove-then-insert is never observable half done. Entries are replaced whole, never
/// updated in place.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: Mutex<HashMap<PlayerId, TimerHandle>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, player: PlayerId) -> bool {
        self.timers.lock().contains_key(&player)
    }

    /// Store the handle `build` returns, returning whatever it displaced so the caller can
    /// cancel it. `build` runs with the registry locked and must not touch it.
    pub fn install(&self, player: PlayerId, build: impl FnOnce() -> TimerHandle) -> Option<TimerHandle> {
        self.with_slot(player, |slot| slot.replace(build()))
    }

    /// Remove and return the player's handle. Firing and cancelling both come through here.
    pub fn take(&self, player: PlayerId) -> Option<TimerHandle> {
        self.with_slot(player, Option::take)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.timers.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.timers.lock().is_empty()
    }

    /// Run `f` over the player's slot with the registry locked. Whatever the slot holds when
    /// `f` returns becomes the new entry. `f` must not touch the registry again.
    pub fn with_slot<R>(&self, player: PlayerId, f: impl FnOnce(&mut Option<TimerHandle>) -> R) -> R {
        let mut timers = self.timers.lock();
        let mut slot = timers.remove(&player);
        let out = f(&mut slot);
        if let Some(handle) = slot {
            timers.insert(player, handle);
        }
        out
    }
}

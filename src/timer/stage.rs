//! Countdown cascade stages and their transition table.
//!
//! A turn countdown walks through a fixed sequence of stages (30, 15, 5, 3, 1 seconds).
//! Each stage is announced to the player as a remaining-time notice; after the wait that
//! follows the terminal stage the player's deadline expires.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One step of the countdown cascade. The discriminant is the announced value in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Stage {
    Thirty = 30,
    Fifteen = 15,
    Five = 5,
    Three = 3,
    One = 1,
}

impl Stage {
    /// All stages in cascade order.
    pub const ALL: [Stage; 5] = [Stage::Thirty, Stage::Fifteen, Stage::Five, Stage::Three, Stage::One];

    /// Value announced to the client, in seconds.
    pub fn seconds(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

/// A raw stage value outside {30, 15, 5, 3, 1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid countdown stage: {0}")]
pub struct InvalidStage(pub u8);

impl TryFrom<u8> for Stage {
    type Error = InvalidStage;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            30 => Ok(Stage::Thirty),
            15 => Ok(Stage::Fifteen),
            5 => Ok(Stage::Five),
            3 => Ok(Stage::Three),
            1 => Ok(Stage::One),
            other => Err(InvalidStage(other)),
        }
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> u8 {
        stage.seconds()
    }
}

/// What happens when a stage's wait elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Announce and schedule the given stage.
    Advance(Stage),
    /// The countdown is over: publish the deadline expiry.
    Expire,
}

/// How long the scheduler waits after announcing a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownPacing {
    /// Wait for the *next* stage's value (announcing 30 is followed by a 15 s wait).
    /// The whole cascade lasts 25 s.
    #[default]
    Inherited,
    /// Wait for the gap between this stage and the next, so each announced value is the
    /// real time left. The whole cascade lasts 30 s.
    Announced,
}

/// Stateless transition table of the countdown cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageSequencer {
    pacing: CountdownPacing,
}

impl StageSequencer {
    pub fn new(pacing: CountdownPacing) -> Self {
        Self { pacing }
    }

    /// Stage a fresh countdown starts from.
    pub fn initial(&self) -> Stage {
        Stage::Thirty
    }

    /// Transition taken when `current`'s wait elapses.
    pub fn next_stage(&self, current: Stage) -> Transition {
        match current {
            Stage::Thirty => Transition::Advance(Stage::Fifteen),
            Stage::Fifteen => Transition::Advance(Stage::Five),
            Stage::Five => Transition::Advance(Stage::Three),
            Stage::Three => Transition::Advance(Stage::One),
            Stage::One => Transition::Expire,
        }
    }

    /// Raw-value variant of [`next_stage`](Self::next_stage).
    ///
    /// An `Err` here means the caller handed over a value it never got from this table;
    /// callers treat it as a bug, not as input to recover from.
    pub fn next_for_value(&self, value: u8) -> Result<Transition, InvalidStage> {
        Stage::try_from(value).map(|stage| self.next_stage(stage))
    }

    /// Wait between announcing `current` and firing it.
    pub fn wait_after(&self, current: Stage) -> Duration {
        let secs = match (self.pacing, self.next_stage(current)) {
            (CountdownPacing::Inherited, Transition::Advance(next)) => next.seconds(),
            (CountdownPacing::Inherited, Transition::Expire) => current.seconds(),
            (CountdownPacing::Announced, Transition::Advance(next)) => {
                current.seconds() - next.seconds()
            }
            (CountdownPacing::Announced, Transition::Expire) => current.seconds(),
        };
        Duration::from_secs(u64::from(secs))
    }
}

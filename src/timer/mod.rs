//! Turn-deadline countdown.
//!
//! - [`stage`]: the fixed cascade (30, 15, 5, 3, 1) and its transition table
//! - [`registry`]: at most one live countdown per player
//! - [`deadline`]: scheduling, firing, cancellation and reset
//! - [`scheduler`]: the substrate that runs delayed callbacks
//! - [`notify`]: remaining-time notices and the deadline-expired signal

pub mod deadline;
pub mod handle;
#[cfg(test)]
pub mod manual;
pub mod notify;
pub mod registry;
pub mod scheduler;
pub mod stage;

pub use deadline::DeadlineScheduler;
pub use notify::{Connection, ConnectionRef, ExpiryPublisher, SendError};
pub use registry::TimerRegistry;
pub use scheduler::{Scheduler, TokioScheduler};
pub use stage::{CountdownPacing, Stage, StageSequencer};

//! Scheduling substrate for countdown stages.
//!
//! The deadline scheduler never sleeps itself: it hands a delay and a callback to a
//! [`Scheduler`] and keeps the returned [`Cancellable`]. Production code runs callbacks on a
//! dedicated multi-threaded tokio runtime; tests drive a virtual clock instead.

use std::io;
use std::time::Duration;

use log::trace;
use tokio::runtime::{Builder, Handle, Runtime};

/// A callback run once its delay has elapsed.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled task. Aborting a task that already ran is a no-op.
pub trait Cancellable: Send + Sync {
    fn abort(&self);
}

impl Cancellable for tokio::task::AbortHandle {
    fn abort(&self) {
        tokio::task::AbortHandle::abort(self);
    }
}

/// Runs tasks after a delay, without blocking the caller.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn Cancellable>;
}

/// Scheduler backed by a tokio runtime: one spawned sleep per scheduled task.
#[derive(Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Box<dyn Cancellable> {
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            trace!("[TurnTimer] Task fired after {:?}", delay);
            task();
        });
        Box::new(join.abort_handle())
    }
}

/// Build the worker pool that runs countdown callbacks.
pub fn timer_runtime(workers: usize) -> io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(workers.max(1))
        .thread_name("turn-timer")
        .enable_time()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let scheduler = TokioScheduler::new(Handle::current());
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        scheduler.schedule(
            Duration::from_secs(5),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_task_never_runs() {
        let scheduler = TokioScheduler::new(Handle::current());
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let handle = scheduler.schedule(
            Duration::from_secs(1),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        handle.abort();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_timer_runtime_builds() {
        let runtime = timer_runtime(0).expect("runtime should build");
        let scheduler = TokioScheduler::new(runtime.handle().clone());
        let (tx, rx) = std::sync::mpsc::channel();
        scheduler.schedule(
            Duration::from_millis(5),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }
}

//! Scheduler adapters: tokio timers for production, virtual time for tests.
//!
//! The history service only sees the `Scheduler` port, so the 64-second
//! soft-delete window runs on real tokio timers in the binary and on
//! `ManualScheduler::advance` in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ports::{Scheduler, TaskHandle};

/// Scheduler backed by `tokio::time`.
///
/// Must be used from within a tokio runtime; `schedule` spawns a task that
/// sleeps for the delay and then runs the callback. Cancellation aborts the
/// spawned task.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl TokioScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Handle to a tokio-scheduled task.
pub struct TokioTaskHandle {
    inner: tokio::task::JoinHandle<()>,
}

impl TaskHandle for TokioTaskHandle {
    fn cancel(&self) {
        self.inner.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTaskHandle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> Self::Handle {
        let inner = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        TokioTaskHandle { inner }
    }
}

struct ManualEntry {
    fire_at: Duration,
    cancelled: Arc<AtomicBool>,
    task: Box<dyn FnOnce() + Send>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    queue: Vec<ManualEntry>,
}

/// Deterministic scheduler driven by explicitly advancing a virtual clock.
///
/// Tasks fire synchronously inside [`ManualScheduler::advance`], in
/// scheduling order, once the virtual clock passes their deadline. No real
/// time is involved.
#[derive(Default, Clone)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

/// Handle to a manually scheduled task.
pub struct ManualTaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle for ManualTaskHandle {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the virtual clock, firing every due, non-cancelled task.
    ///
    /// Tasks run outside the scheduler lock, so they may schedule further
    /// tasks or cancel handles without deadlocking.
    pub fn advance(&self, by: Duration) {
        let due: Vec<ManualEntry> = {
            let mut state = self.state.lock().expect("manual scheduler mutex poisoned");
            state.now += by;
            let now = state.now;
            let (due, rest) = state
                .queue
                .drain(..)
                .partition(|entry| entry.fire_at <= now);
            state.queue = rest;
            due
        };

        for entry in due {
            if !entry.cancelled.load(Ordering::SeqCst) {
                (entry.task)();
            }
        }
    }

    /// Number of scheduled tasks that are neither fired nor cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .expect("manual scheduler mutex poisoned")
            .queue
            .iter()
            .filter(|entry| !entry.cancelled.load(Ordering::SeqCst))
            .count()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTaskHandle;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> Self::Handle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut state = self.state.lock().expect("manual scheduler mutex poisoned");
        let fire_at = state.now + delay;
        state.queue.push(ManualEntry {
            fire_at,
            cancelled: Arc::clone(&cancelled),
            task,
        });
        ManualTaskHandle { cancelled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_task(counter: &Arc<AtomicUsize>) -> Box<dyn FnOnce() + Send> {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_fires_only_when_due() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.schedule(Duration::from_secs(64), counter_task(&fired));

        scheduler.advance(Duration::from_secs(63));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule(Duration::from_secs(10), counter_task(&fired));

        handle.cancel();
        scheduler.advance(Duration::from_secs(60));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_independent_deadlines() {
        let scheduler = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let _a = scheduler.schedule(Duration::from_secs(5), counter_task(&fired));
        scheduler.advance(Duration::from_secs(3));
        let _b = scheduler.schedule(Duration::from_secs(5), counter_task(&fired));

        scheduler.advance(Duration::from_secs(2));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        scheduler.advance(Duration::from_secs(3));
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tokio_scheduler_fires() {
        let scheduler = TokioScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.schedule(Duration::from_millis(10), counter_task(&fired));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tokio_scheduler_cancel() {
        let scheduler = TokioScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule(Duration::from_millis(20), counter_task(&fired));

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}

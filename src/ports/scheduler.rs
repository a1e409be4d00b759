//! Scheduler port: deferred, cancellable one-shot tasks.
//!
//! The soft-delete countdown needs exactly this: schedule a task to fire
//! once after a delay, with the option to cancel before it fires. Modelling
//! it as a port keeps the history state machine testable with simulated
//! time instead of real sleeps.

use std::time::Duration;

/// Handle to one scheduled task.
pub trait TaskHandle: Send {
    /// Cancel the task if it has not fired yet. Cancelling a fired or
    /// already-cancelled task is a no-op.
    fn cancel(&self);
}

/// Trait for scheduling deferred one-shot tasks.
pub trait Scheduler: Send + Sync {
    /// Handle type returned by `schedule`.
    type Handle: TaskHandle + 'static;

    /// Run `task` once after `delay`, unless the returned handle is
    /// cancelled first. Fire-and-forget: no caller awaits the task.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) -> Self::Handle;
}

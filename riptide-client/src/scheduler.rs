//! Timer abstraction for debounce and cooldown windows.
//!
//! Ambient `setTimeout`-style timers make the overscroll state machine
//! untestable without wall-clock waits, so the components take a
//! [`Scheduler`] instead. Production uses [`TokioScheduler`]; tests use a
//! manually-fired scheduler.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A callback scheduled to run after a delay.
pub type ScheduledTask = Box<dyn FnOnce() + Send>;

/// Schedule-after/cancel timer primitives.
pub trait Scheduler: Send + Sync {
    /// Run `task` after `delay` unless the returned guard is cancelled first.
    fn schedule_after(&self, delay: Duration, task: ScheduledTask) -> TimerGuard;
}

/// Handle to a scheduled task. Cancellation is explicit, not drop-based:
/// dropping the guard lets the timer fire.
#[derive(Debug, Clone)]
pub struct TimerGuard {
    cancelled: Arc<AtomicBool>,
}

impl TimerGuard {
    /// Create a guard around a shared cancellation flag.
    #[must_use]
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self { cancelled }
    }

    /// Cancel the pending task. Safe to call more than once.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether the task was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// [`Scheduler`] backed by `tokio::time::sleep` on the current runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, task: ScheduledTask) -> TimerGuard {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::SeqCst) {
                task();
            }
        });
        TimerGuard::new(cancelled)
    }
}

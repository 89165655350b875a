//! Overscroll backfill trigger.
//!
//! Converts a continuous overscroll gesture (a `delta_y` per sample) into
//! discrete, rate-limited backfill requests. A small debounced state
//! machine: samples accumulate while a debounce timer keeps being re-armed;
//! when the timer finally fires with enough accumulated upward overscroll
//! and the cooldown gate clear, one backfill is dispatched and the gate
//! closes for the lockout period.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use riptide_shared::ThreadConfig;

use crate::scheduler::{Scheduler, TimerGuard};
use crate::thread::CommentThread;

/// Gate closure invoked when the trigger fires. Returns whether a backfill
/// was actually dispatched; the cooldown is only armed when it was.
pub type BackfillGate = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Default)]
struct TriggerState {
    accumulated: f64,
    debounce: Option<TimerGuard>,
    cooling_down: bool,
    cooldown: Option<TimerGuard>,
}

/// Debounced, cooldown-gated backfill trigger.
pub struct OverscrollTrigger {
    scheduler: Arc<dyn Scheduler>,
    gate: BackfillGate,
    threshold: f64,
    debounce_window: Duration,
    cooldown_window: Duration,
    state: Arc<Mutex<TriggerState>>,
}

impl fmt::Debug for OverscrollTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverscrollTrigger")
            .field("threshold", &self.threshold)
            .field("debounce_window", &self.debounce_window)
            .field("cooldown_window", &self.cooldown_window)
            .finish()
    }
}

fn lock(state: &Arc<Mutex<TriggerState>>) -> MutexGuard<'_, TriggerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OverscrollTrigger {
    /// Build a trigger with an explicit gate closure.
    #[must_use]
    pub fn new(config: &ThreadConfig, scheduler: Arc<dyn Scheduler>, gate: BackfillGate) -> Self {
        Self {
            scheduler,
            gate,
            threshold: config.overscroll_threshold,
            debounce_window: config.overscroll_debounce,
            cooldown_window: config.overscroll_cooldown,
            state: Arc::new(Mutex::new(TriggerState::default())),
        }
    }

    /// Build a trigger wired to a thread's backfill load.
    ///
    /// The gate refuses once pagination is exhausted, so a terminated feed
    /// never arms the cooldown or issues requests.
    #[must_use]
    pub fn for_thread(thread: &CommentThread, scheduler: Arc<dyn Scheduler>) -> Self {
        let config = thread.config().clone();
        let thread = thread.clone();
        Self::new(
            &config,
            scheduler,
            Arc::new(move || {
                if !thread.has_more() || thread.is_destroyed() {
                    return false;
                }
                let thread = thread.clone();
                tokio::spawn(async move { thread.load(false).await });
                true
            }),
        )
    }

    /// Feed one gesture sample.
    ///
    /// Cancels any pending debounce timer, accumulates the delta, and arms
    /// a fresh timer. Samples arriving during cooldown reset the
    /// accumulator instead of piling up uselessly.
    pub fn overscroll(&self, delta_y: f64) {
        let mut state = lock(&self.state);

        if let Some(timer) = state.debounce.take() {
            timer.cancel();
        }

        if state.cooling_down {
            state.accumulated = 0.0;
            return;
        }

        state.accumulated += delta_y;

        let shared = Arc::clone(&self.state);
        let scheduler = Arc::clone(&self.scheduler);
        let gate = Arc::clone(&self.gate);
        let threshold = self.threshold;
        let cooldown_window = self.cooldown_window;

        state.debounce = Some(self.scheduler.schedule_after(
            self.debounce_window,
            Box::new(move || {
                Self::evaluate(&shared, &scheduler, &gate, threshold, cooldown_window);
            }),
        ));
    }

    /// Debounce timer body: fire at most one backfill, then reset the
    /// accumulator regardless of outcome.
    fn evaluate(
        shared: &Arc<Mutex<TriggerState>>,
        scheduler: &Arc<dyn Scheduler>,
        gate: &BackfillGate,
        threshold: f64,
        cooldown_window: Duration,
    ) {
        let should_fire = {
            let mut state = lock(shared);
            let should_fire = state.accumulated < threshold && !state.cooling_down;
            state.accumulated = 0.0;
            should_fire
        };

        if !should_fire {
            return;
        }

        // Gate may refuse (nothing left to load); only a dispatched
        // backfill locks the trigger out.
        if !gate() {
            return;
        }

        let mut state = lock(shared);
        state.cooling_down = true;
        let release = Arc::clone(shared);
        state.cooldown = Some(scheduler.schedule_after(
            cooldown_window,
            Box::new(move || {
                let mut state = lock(&release);
                state.cooling_down = false;
                state.cooldown = None;
            }),
        ));
    }

    /// Cancel pending timers; called on component teardown.
    pub fn cancel(&self) {
        let mut state = lock(&self.state);
        if let Some(timer) = state.debounce.take() {
            timer.cancel();
        }
        if let Some(timer) = state.cooldown.take() {
            timer.cancel();
        }
    }
}

//! Delayed repeating timers
//!
//! A [`DelayedTimer`] waits `interval`, runs its callback, and repeats that
//! `repeats` times before running its completion callback. Cancelling only
//! marks the timer finished: a wait already in progress runs to its end and
//! the flag is checked afterwards, so one late fire can still be observed
//! but the completion callback never runs after a cancel. The lifecycle
//! token is the exception; it interrupts the wait for session teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::{GameError, GameResult};

/// Callback run on every repeat
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Callback run once after the last repeat
pub type CompletionFn = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug)]
struct TimerShared {
    remaining: AtomicU32,
    finished: AtomicBool,
}

/// Handle to a scheduled repeating callback
///
/// Dropping the handle does not stop the timer; call [`DelayedTimer::cancel`].
#[derive(Debug)]
pub struct DelayedTimer {
    shared: Arc<TimerShared>,
    interval: Duration,
    handle: JoinHandle<()>,
}

impl DelayedTimer {
    /// Start a timer on the current Tokio runtime
    ///
    /// With `repeats == 0` only `on_completion` runs, right away. A missing
    /// `on_tick` is skipped silently.
    pub fn start(
        interval: Duration,
        repeats: u32,
        on_tick: Option<TickFn>,
        on_completion: Option<CompletionFn>,
    ) -> Self {
        Self::start_scoped(interval, repeats, on_tick, on_completion, CancellationToken::new())
    }

    /// Start a timer that also stops when `lifecycle` is cancelled
    pub fn start_scoped(
        interval: Duration,
        repeats: u32,
        on_tick: Option<TickFn>,
        on_completion: Option<CompletionFn>,
        lifecycle: CancellationToken,
    ) -> Self {
        let shared = Arc::new(TimerShared {
            remaining: AtomicU32::new(repeats),
            finished: AtomicBool::new(false),
        });
        let handle = tokio::spawn(run(
            shared.clone(),
            interval,
            on_tick,
            on_completion,
            lifecycle,
        ));
        Self {
            shared,
            interval,
            handle,
        }
    }

    /// Mark the timer finished
    pub fn cancel(&self) {
        self.shared.finished.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.shared.finished.load(Ordering::SeqCst)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Repeats still to run
    ///
    /// Fails once the timer has completed or been cancelled.
    pub fn remaining_repeats(&self) -> GameResult<u32> {
        if self.is_finished() {
            return Err(GameError::TimerFinished);
        }
        Ok(self.shared.remaining.load(Ordering::SeqCst))
    }

    /// Wait for the timer task to exit
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

async fn run(
    shared: Arc<TimerShared>,
    interval: Duration,
    mut on_tick: Option<TickFn>,
    mut on_completion: Option<CompletionFn>,
    lifecycle: CancellationToken,
) {
    loop {
        if shared.finished.load(Ordering::SeqCst) {
            break;
        }
        if shared.remaining.load(Ordering::SeqCst) == 0 {
            if let Some(done) = on_completion.take() {
                done();
            }
            break;
        }

        tokio::select! {
            _ = lifecycle.cancelled() => {
                trace!("timer stopped by lifecycle");
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        if shared.finished.load(Ordering::SeqCst) {
            break;
        }
        if let Some(tick) = on_tick.as_mut() {
            tick();
        }
        shared.remaining.fetch_sub(1, Ordering::SeqCst);
    }
    shared.finished.store(true, Ordering::SeqCst);
}

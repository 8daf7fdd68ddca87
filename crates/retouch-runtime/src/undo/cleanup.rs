#![forbid(unsafe_code)]

//! Periodic cleanup ticks for the history store.
//!
//! The timer thread never touches history. It only posts a tick on a
//! channel every interval; the owning [`HistoryStore`] drains those ticks
//! on its own thread via `run_pending_cleanup()`, so cleanup is serialized
//! with every other mutation by construction.
//!
//! [`HistoryStore`]: super::HistoryStore

use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;

use web_time::Duration;

/// Shared stop flag plus condvar so the timer wakes immediately on stop.
#[derive(Debug, Clone)]
pub(crate) struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create a new stop signal pair (signal, trigger).
    pub(crate) fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: Arc::clone(&inner),
        };
        (signal, StopTrigger { inner })
    }

    pub(crate) fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for either the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if timed out.
    pub(crate) fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            return true;
        }
        let (stopped, _) = cvar
            .wait_timeout_while(stopped, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }
}

#[derive(Debug)]
pub(crate) struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    pub(crate) fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        cvar.notify_all();
    }
}

/// Background ticker that requests cleanup every `interval`.
#[derive(Debug)]
pub struct CleanupTimer {
    interval: Duration,
    trigger: StopTrigger,
    ticks: mpsc::Receiver<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl CleanupTimer {
    /// Spawn the timer thread.
    ///
    /// Returns `None` if the OS refuses to spawn a thread; the history
    /// store then runs without periodic cleanup.
    pub fn start(interval: Duration) -> Option<Self> {
        let (signal, trigger) = StopSignal::new();
        let (sender, ticks) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("retouch-history-cleanup".to_string())
            .spawn(move || {
                loop {
                    if signal.wait_timeout(interval) {
                        break;
                    }
                    if sender.send(()).is_err() {
                        break;
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                tracing::debug!(
                    target: "retouch.undo",
                    interval_ms = interval.as_millis() as u64,
                    "cleanup timer started"
                );
                Some(Self {
                    interval,
                    trigger,
                    ticks,
                    thread: Some(handle),
                })
            }
            Err(err) => {
                tracing::warn!(
                    target: "retouch.undo",
                    error = %err,
                    "failed to spawn cleanup timer; periodic cleanup disabled"
                );
                None
            }
        }
    }

    /// The tick interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drain pending ticks. Returns `true` if at least one had fired.
    pub fn take_pending(&self) -> bool {
        let mut fired = false;
        while self.ticks.try_recv().is_ok() {
            fired = true;
        }
        fired
    }

    /// Stop the timer and join its thread.
    pub fn stop(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CleanupTimer {
    fn drop(&mut self) {
        self.trigger.stop();
        // Don't join in drop to avoid blocking
    }
}

//! Timer helpers on the ambient tokio runtime.
//!
//! Behaviours are driven from synchronous listeners, so delayed work is
//! spawned onto whatever runtime is current. Without a runtime the delayed
//! step is skipped with a warning instead of panicking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Runs `f` after `delay` on the current tokio runtime.
///
/// Returns `None` (and drops `f`) when called outside a runtime.
pub fn set_timeout<F>(delay: Duration, f: F) -> Option<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    let Ok(handle) = Handle::try_current() else {
        tracing::warn!(delay_ms = delay.as_millis(), "no tokio runtime, timer skipped");
        return None;
    };
    Some(handle.spawn(async move {
        tokio::time::sleep(delay).await;
        f();
    }))
}

/// Leading-edge rate limiter: the first call passes, later calls within the
/// interval are dropped.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Creates a throttle with the given interval.
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Whether a call made now should run. Records the call when it does.
    pub fn ready(&self) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock().expect("throttle lock poisoned");
        match *last {
            Some(previous) if now.duration_since(previous) < self.interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

/// Trailing-edge debouncer: only the last call in a burst runs, `delay`
/// after the burst ends.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debounce {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedules `f`, superseding any call still waiting.
    ///
    /// Outside a tokio runtime `f` runs immediately.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let Ok(handle) = Handle::try_current() else {
            f();
            return;
        };
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::Acquire) == ticket {
                f();
            }
        });
    }
}

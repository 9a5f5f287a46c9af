use std::{
    sync::{Mutex, MutexGuard},
    time::Duration,
};
use tracing::{error, info, warn};

/// Interval used when the controller state cannot be trusted.
pub const SAFE_INTERVAL: Duration = Duration::from_millis(60_000);

/// Adaptive poll interval: doubles on delivery failure up to a ceiling and
/// snaps back to the base interval on the first success.
#[derive(Debug)]
pub struct BackoffController {
    base: Duration,
    max: Duration,
    current: Mutex<Duration>,
}

impl BackoffController {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        Self {
            base,
            max: max.max(base),
            current: Mutex::new(base),
        }
    }

    pub fn from_millis(base_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(base_ms), Duration::from_millis(max_ms))
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Interval the scheduler should wait before the next tick.
    pub fn current(&self) -> Duration {
        match self.current.lock() {
            Ok(current) => *current,
            Err(_) => SAFE_INTERVAL,
        }
    }

    /// Escalates the interval. A no-op once the ceiling is reached.
    pub fn on_failure(&self) -> Duration {
        let mut current = match self.lock() {
            Some(guard) => guard,
            None => return SAFE_INTERVAL,
        };

        if *current < self.max {
            *current = current.saturating_mul(2).min(self.max);
            warn!(
                interval_ms = current.as_millis() as u64,
                "Poll interval increased after delivery failure"
            );
        }
        *current
    }

    /// Restores the base interval if it had been escalated.
    pub fn on_success(&self) -> Duration {
        let mut current = match self.lock() {
            Some(guard) => guard,
            None => return SAFE_INTERVAL,
        };

        if *current != self.base {
            *current = self.base;
            info!(
                interval_ms = self.base.as_millis() as u64,
                "Restoring poll interval"
            );
        }
        *current
    }

    /// Locks the interval. A poisoned lock is reset to `SAFE_INTERVAL` and
    /// `None` is returned so the caller leaves it there.
    fn lock(&self) -> Option<MutexGuard<'_, Duration>> {
        match self.current.lock() {
            Ok(guard) => Some(guard),
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                *guard = SAFE_INTERVAL;
                self.current.clear_poison();
                error!(
                    interval_ms = SAFE_INTERVAL.as_millis() as u64,
                    "Poll interval state was poisoned, falling back to safe interval"
                );
                None
            }
        }
    }
}

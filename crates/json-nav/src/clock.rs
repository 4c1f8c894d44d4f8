//! Time source for history timestamps.
//!
//! Production code uses [`SystemClock`]; tests hand a [`FixedClock`] to the
//! workspace so commit timestamps are predictable.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A time provider.
pub trait Clock: Send + Sync + Debug {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// ```
/// use json_nav::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1000);
/// assert_eq!(clock.now_millis(), 1000);
/// assert_eq!(clock.now_millis(), 1001);
///
/// let frozen = FixedClock::with_step(5, 0);
/// assert_eq!(frozen.now_millis(), frozen.now_millis());
/// ```
#[derive(Debug)]
pub struct FixedClock {
    millis: AtomicU64,
    step: u64,
}

impl FixedClock {
    pub fn new(millis: u64) -> Self {
        Self::with_step(millis, 1)
    }

    pub fn with_step(millis: u64, step: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
            step,
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.millis.fetch_add(self.step, Ordering::SeqCst)
    }
}

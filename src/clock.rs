//! Time sources for trial measurement and analysis
//!
//! The trial runner needs a monotonic clock and a way to sleep; the analysis
//! step needs the local wall-clock hour; persistence needs a date and time
//! stamp. All three go through [`Clock`] so tests can script them with
//! [`crate::testing::ScriptedClock`].

use chrono::{Local, NaiveDateTime};
use std::time::{Duration, Instant};

/// Source of monotonic readings, delays, and local calendar time
pub trait Clock {
    /// Monotonic reading. Only differences between two readings are meaningful.
    fn now(&mut self) -> Duration;

    /// Block the current thread for `duration`
    fn sleep(&mut self, duration: Duration);

    /// Local calendar date and time
    fn wall_time(&self) -> NaiveDateTime;
}

/// Clock backed by the operating system
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn wall_time(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Convert a duration to fractional milliseconds
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

//! Sources of the current time.
//!
//! The agent reads "now" through a [`Clock`] rather than calling `Local::now()`
//! directly, so tests can drive schedule matching deterministically.

use chrono::{DateTime, Local};
use std::sync::Mutex;

/// Supplies the current local time
pub trait Clock: Send + Sync {
    /// The current instant in local time
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to
///
/// # Examples
///
/// ```
/// use shutdown_scheduler::clock::{Clock, ManualClock};
/// use chrono::{Duration, Local, TimeZone};
///
/// let start = Local.with_ymd_and_hms(2026, 6, 15, 20, 59, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(Duration::seconds(45));
/// assert_eq!(clock.now(), start + Duration::seconds(45));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    /// Create a clock reading `now`
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Set the current time
    pub fn set(&self, now: DateTime<Local>) {
        match self.now.lock() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    /// Move the clock forward by `by`
    pub fn advance(&self, by: chrono::Duration) {
        match self.now.lock() {
            Ok(mut guard) => *guard += by,
            Err(poisoned) => *poisoned.into_inner() += by,
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

//! Time sources for domain timestamps.
//!
//! # Responsibility
//! - Provide the single "now" used for `createdAt`/`updatedAt` stamping.
//! - Allow deterministic timestamps in tests.
//!
//! # Invariants
//! - Returned instants are UTC and truncated to millisecond precision, which
//!   is the precision persisted by the SQLite store.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::sync::Mutex;

/// Abstraction over wall-clock time for dependency injection.
pub trait Clock: Send + Sync {
    /// Returns the current instant, truncated to milliseconds.
    fn now(&self) -> DateTime<Utc>;
}

/// Default clock that reads the real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_to_millis(Utc::now())
    }
}

/// Manually driven clock for deterministic tests and tooling.
///
/// Every call to [`Clock::now`] returns the current value and then advances
/// it by the configured step, so consecutive mutations get strictly
/// increasing timestamps unless the step is zero.
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<ManualClockState>,
}

#[derive(Debug, Clone, Copy)]
struct ManualClockState {
    current: DateTime<Utc>,
    step: TimeDelta,
}

impl ManualClock {
    /// Creates a clock starting at `start` that advances one millisecond per read.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_step(start, TimeDelta::milliseconds(1))
    }

    /// Creates a clock starting at `start` that advances by `step` per read.
    pub fn with_step(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            state: Mutex::new(ManualClockState {
                current: truncate_to_millis(start),
                step,
            }),
        }
    }

    /// Creates a clock frozen at `instant`.
    pub fn frozen(instant: DateTime<Utc>) -> Self {
        Self::with_step(instant, TimeDelta::zero())
    }

    /// Moves the clock forward without consuming a reading.
    pub fn advance(&self, delta: TimeDelta) {
        let mut state = self.lock();
        state.current += delta;
    }

    /// Returns the value the next reading will produce.
    pub fn peek(&self) -> DateTime<Utc> {
        self.lock().current
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualClockState> {
        // A poisoned test clock still holds a valid instant.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut state = self.lock();
        let value = state.current;
        let step = state.step;
        state.current += step;
        value
    }
}

/// Drops sub-millisecond precision from `instant`.
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(TimeDelta::milliseconds(1))
        .unwrap_or(instant)
}

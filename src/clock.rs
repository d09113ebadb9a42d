use std::cell::Cell;
use std::time::{Duration, SystemTime};

/// Source of wall-clock time for the session and round timer.
///
/// All countdown arithmetic is done on deltas between readings of this
/// trait, never by counting ticks, so a suspended host process resumes
/// with the correct remaining time.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Production clock reading the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<SystemTime>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}

//! Wall-clock seam so deadline logic stays testable.

use std::sync::atomic::{AtomicI64, Ordering};

use life_core::TimestampMs;

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimestampMs;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimestampMs {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A hand-driven clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: TimestampMs) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set(&self, now: TimestampMs) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimestampMs {
        self.now.load(Ordering::SeqCst)
    }
}

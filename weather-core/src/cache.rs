//! Minimum interval between successful fetches.

use chrono::{DateTime, Utc};

pub const CACHE_DURATION_MS: i64 = 60_000;

/// Source of "now". Swapped for a fixed clock in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Gate over `last_fetch_time` (epoch milliseconds, `0` = never fetched).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGate {
    last_fetch_time: i64,
}

impl CacheGate {
    pub fn new(last_fetch_time: i64) -> Self {
        Self { last_fetch_time }
    }

    pub fn last_fetch_time(&self) -> i64 {
        self.last_fetch_time
    }

    pub fn is_valid(&self, now_ms: i64) -> bool {
        now_ms - self.last_fetch_time < CACHE_DURATION_MS
    }

    /// Whole seconds until the next fetch is allowed. Only meaningful while
    /// [`CacheGate::is_valid`] holds.
    pub fn seconds_remaining(&self, now_ms: i64) -> i64 {
        let remaining_ms = CACHE_DURATION_MS - (now_ms - self.last_fetch_time);
        (remaining_ms as f64 / 1000.0).ceil() as i64
    }

    pub fn record_fetch(&mut self, now_ms: i64) {
        self.last_fetch_time = now_ms;
    }

    /// Applies a location edit. Returns `true` if the gate was reset.
    ///
    /// Resets only when both values are non-empty and differ ignoring case.
    pub fn on_location_change(&mut self, previous: &str, next: &str) -> bool {
        let previous = previous.trim();
        let next = next.trim();
        if previous.is_empty() || next.is_empty() {
            return false;
        }
        if previous.to_lowercase() == next.to_lowercase() {
            return false;
        }
        self.last_fetch_time = 0;
        true
    }
}

//! Per-user rate limiting for inbound messages.
//!
//! A sliding window of request timestamps per key. Checks drop entries
//! older than the window, then accept and record below the ceiling or
//! reject without recording.

use chrono::{DateTime, Duration, Utc};
use copper_almanac_core::UserKey;
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

/// Sliding-window configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SlidingWindowConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration in seconds.
    pub window_seconds: u32,
}

impl SlidingWindowConfig {
    /// Creates a new sliding-window configuration.
    #[must_use]
    pub fn new(max_requests: u32, window_seconds: u32) -> Self {
        Self {
            max_requests,
            window_seconds,
        }
    }
}

impl Default for SlidingWindowConfig {
    fn default() -> Self {
        Self::new(10, 60)
    }
}

/// A per-key sliding-window rate limiter.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    config: SlidingWindowConfig,
    windows: Arc<RwLock<HashMap<UserKey, VecDeque<DateTime<Utc>>>>>,
}

impl SlidingWindowLimiter {
    /// Creates a limiter with the given configuration.
    #[must_use]
    pub fn new(config: SlidingWindowConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Checks whether a request is allowed right now, recording it if so.
    pub fn check_and_record(&self, key: &UserKey) -> bool {
        self.check_and_record_at(key, Utc::now())
    }

    /// Clock-explicit variant of [`check_and_record`].
    ///
    /// A rejected request is not recorded, so a user who keeps sending
    /// while limited is readmitted as soon as old entries age out.
    ///
    /// [`check_and_record`]: Self::check_and_record
    pub fn check_and_record_at(&self, key: &UserKey, now: DateTime<Utc>) -> bool {
        let mut windows = self.windows.write().unwrap();
        let window = windows.entry(key.clone()).or_default();

        let cutoff = now - Duration::seconds(i64::from(self.config.window_seconds));
        while window.front().is_some_and(|t| *t <= cutoff) {
            window.pop_front();
        }

        if window.len() >= self.config.max_requests as usize {
            return false;
        }
        window.push_back(now);
        true
    }

    /// Drops all recorded state for a key.
    pub fn reset(&self, key: &UserKey) {
        self.windows.write().unwrap().remove(key);
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &SlidingWindowConfig {
        &self.config
    }
}

impl Clone for SlidingWindowLimiter {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            windows: Arc::clone(&self.windows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> UserKey {
        UserKey::new(s)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn allows_up_to_the_ceiling() {
        let limiter = SlidingWindowLimiter::new(SlidingWindowConfig::new(3, 60));
        for i in 0..3 {
            assert!(limiter.check_and_record_at(&key("a"), at(i)));
        }
        assert!(!limiter.check_and_record_at(&key("a"), at(3)));
    }

    #[test]
    fn window_slides_rather_than_resets() {
        let limiter = SlidingWindowLimiter::new(SlidingWindowConfig::new(2, 60));
        assert!(limiter.check_and_record_at(&key("a"), at(0)));
        assert!(limiter.check_and_record_at(&key("a"), at(30)));
        assert!(!limiter.check_and_record_at(&key("a"), at(59)));

        // The first entry ages out after 60s; the second has not yet.
        assert!(limiter.check_and_record_at(&key("a"), at(61)));
        assert!(!limiter.check_and_record_at(&key("a"), at(62)));
    }

    #[test]
    fn rejected_requests_are_not_recorded() {
        let limiter = SlidingWindowLimiter::new(SlidingWindowConfig::new(1, 60));
        assert!(limiter.check_and_record_at(&key("a"), at(0)));
        for i in 1..50 {
            assert!(!limiter.check_and_record_at(&key("a"), at(i)));
        }
        // Readmitted exactly when the single recorded entry expires.
        assert!(limiter.check_and_record_at(&key("a"), at(61)));
    }

    #[test]
    fn keys_are_isolated() {
        let limiter = SlidingWindowLimiter::new(SlidingWindowConfig::new(1, 60));
        assert!(limiter.check_and_record_at(&key("a"), at(0)));
        assert!(limiter.check_and_record_at(&key("b"), at(0)));
        assert!(!limiter.check_and_record_at(&key("a"), at(1)));
    }

    #[test]
    fn reset_clears_state() {
        let limiter = SlidingWindowLimiter::new(SlidingWindowConfig::new(1, 60));
        assert!(limiter.check_and_record_at(&key("a"), at(0)));
        limiter.reset(&key("a"));
        assert!(limiter.check_and_record_at(&key("a"), at(1)));
    }
}

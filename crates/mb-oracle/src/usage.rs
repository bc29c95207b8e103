//! Rolling usage quota.
//!
//! The limiter persists `{count, lastReset}` under the usage key. A window
//! that is at least `window` old counts as expired and is replaced by a fresh
//! one. Unreadable data is treated as absent, so a corrupt record never locks
//! the user out.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OracleConfig;
use crate::storage::Storage;

/// Base name of the usage key.
pub const USAGE_KEY: &str = "usage";

/// Wire format of the usage record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageRecord {
    #[serde(default)]
    count: u32,
    #[serde(default)]
    last_reset: Option<i64>,
}

/// Draws consumed since the window started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageWindow {
    /// Draws consumed. May exceed the quota; only reports are clamped.
    pub count: u32,
    /// When the window began.
    pub window_start: DateTime<Utc>,
}

impl UsageWindow {
    /// A fresh window starting at `now`.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }
}

/// Quota readout at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageStatus {
    /// Draws left in the window, clamped at zero.
    pub remaining: u32,
    /// Whether no draws are left in an unexpired window.
    pub limited: bool,
    /// When the current window began.
    pub window_start: DateTime<Utc>,
    /// When the current window expires.
    pub resets_at: DateTime<Utc>,
}

/// Tracks draws against a quota per rolling window.
#[derive(Debug, Clone)]
pub struct UsageLimiter {
    key: String,
    quota: u32,
    window: TimeDelta,
}

impl UsageLimiter {
    /// Create a limiter over `key`.
    pub fn new(key: impl Into<String>, quota: u32, window: TimeDelta) -> Self {
        Self {
            key: key.into(),
            quota,
            window,
        }
    }

    /// Create a limiter with the config's key, quota and window.
    pub fn from_config(config: &OracleConfig) -> Self {
        Self::new(config.key(USAGE_KEY), config.quota, config.window)
    }

    /// Draws allowed per window.
    pub fn quota(&self) -> u32 {
        self.quota
    }

    /// Whether `window` has expired at `now`.
    pub fn is_expired(&self, window: &UsageWindow, now: DateTime<Utc>) -> bool {
        now - window.window_start >= self.window
    }

    /// Read the persisted window. Missing or malformed data yields `None`.
    pub fn load(&self, storage: &impl Storage) -> Option<UsageWindow> {
        let raw = match storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read usage window");
                return None;
            }
        };
        let record: UsageRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding malformed usage window");
                return None;
            }
        };
        let window_start = record
            .last_reset
            .and_then(DateTime::from_timestamp_millis)?;
        if window_start.checked_add_signed(self.window).is_none() {
            warn!(key = %self.key, %window_start, "discarding out-of-range usage window");
            return None;
        }
        Some(UsageWindow {
            count: record.count,
            window_start,
        })
    }

    /// The persisted window if it is still active at `now`.
    fn active(&self, storage: &impl Storage, now: DateTime<Utc>) -> Option<UsageWindow> {
        self.load(storage).filter(|w| !self.is_expired(w, now))
    }

    /// Report the quota at `now` without writing anything.
    pub fn peek(&self, storage: &impl Storage, now: DateTime<Utc>) -> UsageStatus {
        let window = self
            .active(storage, now)
            .unwrap_or_else(|| UsageWindow::fresh(now));
        self.status(&window)
    }

    /// Report the quota at `now`, persisting a fresh window first if the
    /// stored one is missing or expired.
    pub fn check_and_maybe_reset(
        &self,
        storage: &mut impl Storage,
        now: DateTime<Utc>,
    ) -> UsageStatus {
        let window = match self.active(storage, now) {
            Some(window) => window,
            None => {
                let fresh = UsageWindow::fresh(now);
                debug!(key = %self.key, "starting new usage window");
                self.save(storage, &fresh);
                fresh
            }
        };
        self.status(&window)
    }

    /// Record one completed draw and return the draws left.
    ///
    /// Keeps the current window if it is active, otherwise starts a new one
    /// at `now`. The count is stored unclamped.
    pub fn debit(&self, storage: &mut impl Storage, now: DateTime<Utc>) -> u32 {
        let mut window = self
            .active(storage, now)
            .unwrap_or_else(|| UsageWindow::fresh(now));
        window.count = window.count.saturating_add(1);
        self.save(storage, &window);
        let remaining = self.remaining(&window);
        debug!(count = window.count, remaining, "usage debited");
        remaining
    }

    fn remaining(&self, window: &UsageWindow) -> u32 {
        self.quota.saturating_sub(window.count)
    }

    fn status(&self, window: &UsageWindow) -> UsageStatus {
        let remaining = self.remaining(window);
        UsageStatus {
            remaining,
            limited: remaining == 0,
            window_start: window.window_start,
            resets_at: window
                .window_start
                .checked_add_signed(self.window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    fn save(&self, storage: &mut impl Storage, window: &UsageWindow) {
        let record = UsageRecord {
            count: window.count,
            last_reset: Some(window.window_start.timestamp_millis()),
        };
        let result = serde_json::to_string(&record)
            .map_err(Into::into)
            .and_then(|json| storage.set(&self.key, &json));
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "failed to persist usage window");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStorage, MemoryStorage};
    use proptest::prelude::*;

    fn limiter() -> UsageLimiter {
        UsageLimiter::new(USAGE_KEY, 3, TimeDelta::hours(2))
    }

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    const T0: i64 = 1_700_000_000_000;

    #[test]
    fn fresh_storage_resets_and_persists() {
        let mut storage = MemoryStorage::new();
        let status = limiter().check_and_maybe_reset(&mut storage, at(T0));
        assert_eq!(status.remaining, 3);
        assert!(!status.limited);

        let raw = storage.get(USAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["count"], 0);
        assert_eq!(json["lastReset"], T0);
    }

    #[test]
    fn debit_counts_down_to_limited() {
        let mut storage = MemoryStorage::new();
        let l = limiter();
        l.check_and_maybe_reset(&mut storage, at(T0));
        assert_eq!(l.debit(&mut storage, at(T0 + 100)), 2);
        assert_eq!(l.debit(&mut storage, at(T0 + 200)), 1);
        assert_eq!(l.debit(&mut storage, at(T0 + 300)), 0);

        let status = l.check_and_maybe_reset(&mut storage, at(T0 + 400));
        assert_eq!(status.remaining, 0);
        assert!(status.limited);
        assert_eq!(status.window_start, at(T0));
        assert_eq!(status.resets_at, at(T0) + TimeDelta::hours(2));
    }

    #[test]
    fn debit_past_quota_stores_unclamped_count() {
        let mut storage = MemoryStorage::new();
        let l = limiter();
        for _ in 0..5 {
            l.debit(&mut storage, at(T0));
        }
        assert_eq!(l.load(&storage).unwrap().count, 5);
        assert_eq!(l.peek(&storage, at(T0)).remaining, 0);
    }

    #[test]
    fn expired_window_resets() {
        let mut storage = MemoryStorage::new();
        let l = limiter();
        l.check_and_maybe_reset(&mut storage, at(T0));
        l.debit(&mut storage, at(T0));
        l.debit(&mut storage, at(T0));
        l.debit(&mut storage, at(T0));

        let later = at(T0) + TimeDelta::hours(2) + TimeDelta::milliseconds(1);
        let status = l.check_and_maybe_reset(&mut storage, later);
        assert_eq!(status.remaining, 3);
        assert!(!status.limited);
        assert_eq!(l.load(&storage).unwrap(), UsageWindow::fresh(later));
    }

    #[test]
    fn window_expires_exactly_at_duration() {
        let l = limiter();
        let w = UsageWindow::fresh(at(T0));
        assert!(!l.is_expired(&w, at(T0) + TimeDelta::hours(2) - TimeDelta::milliseconds(1)));
        assert!(l.is_expired(&w, at(T0) + TimeDelta::hours(2)));
    }

    #[test]
    fn debit_after_expiry_starts_new_window() {
        let mut storage = MemoryStorage::new();
        let l = limiter();
        l.debit(&mut storage, at(T0));
        l.debit(&mut storage, at(T0));

        let later = at(T0) + TimeDelta::hours(3);
        assert_eq!(l.debit(&mut storage, later), 2);
        assert_eq!(
            l.load(&storage).unwrap(),
            UsageWindow {
                count: 1,
                window_start: later
            }
        );
    }

    #[test]
    fn debit_keeps_active_window_start() {
        let mut storage = MemoryStorage::new();
        let l = limiter();
        l.check_and_maybe_reset(&mut storage, at(T0));
        l.debit(&mut storage, at(T0 + 60_000));
        assert_eq!(l.load(&storage).unwrap().window_start, at(T0));
    }

    #[test]
    fn malformed_record_is_treated_as_absent() {
        for raw in ["not json", "[1,2,3]", r#"{"count":-4,"lastReset":1}"#, "{}"] {
            let mut storage = MemoryStorage::new();
            storage.set(USAGE_KEY, raw).unwrap();
            let l = limiter();
            assert_eq!(l.peek(&storage, at(T0)).remaining, 3, "{raw}");
            let status = l.check_and_maybe_reset(&mut storage, at(T0));
            assert_eq!(status.remaining, 3);
            assert_eq!(l.load(&storage), Some(UsageWindow::fresh(at(T0))));
        }
    }

    #[test]
    fn far_future_window_start_is_treated_as_absent() {
        let mut storage = MemoryStorage::new();
        let last_reset = DateTime::<Utc>::MAX_UTC.timestamp_millis();
        storage
            .set(USAGE_KEY, &format!(r#"{{"count":1,"lastReset":{last_reset}}}"#))
            .unwrap();
        let l = limiter();
        assert_eq!(l.load(&storage), None);
        assert_eq!(l.peek(&storage, at(T0)).remaining, 3);
        let status = l.check_and_maybe_reset(&mut storage, at(T0));
        assert_eq!(status.remaining, 3);
        assert_eq!(status.resets_at, at(T0) + TimeDelta::hours(2));
        assert_eq!(l.load(&storage), Some(UsageWindow::fresh(at(T0))));
    }

    #[test]
    fn resets_at_saturates_for_huge_window() {
        let l = UsageLimiter::new(USAGE_KEY, 3, TimeDelta::MAX);
        let storage = MemoryStorage::new();
        assert_eq!(l.peek(&storage, at(T0)).resets_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn storage_failures_degrade_to_fresh_window() {
        let mut storage = FailingStorage;
        let l = limiter();
        assert_eq!(l.load(&storage), None);
        assert_eq!(l.check_and_maybe_reset(&mut storage, at(T0)).remaining, 3);
        assert_eq!(l.debit(&mut storage, at(T0 + 1)), 2);
        assert_eq!(l.peek(&storage, at(T0 + 2)).remaining, 3);
    }

    #[test]
    fn missing_count_defaults_to_zero() {
        let mut storage = MemoryStorage::new();
        storage
            .set(USAGE_KEY, &format!(r#"{{"lastReset":{T0}}}"#))
            .unwrap();
        let status = limiter().peek(&storage, at(T0 + 1));
        assert_eq!(status.remaining, 3);
        assert_eq!(status.window_start, at(T0));
    }

    #[test]
    fn peek_does_not_write() {
        let storage = MemoryStorage::new();
        let status = limiter().peek(&storage, at(T0));
        assert_eq!(status.remaining, 3);
        assert!(storage.is_empty());
    }

    #[test]
    fn check_is_idempotent_at_same_instant() {
        let mut storage = MemoryStorage::new();
        let l = limiter();
        l.debit(&mut storage, at(T0));
        let a = l.check_and_maybe_reset(&mut storage, at(T0 + 5));
        let b = l.check_and_maybe_reset(&mut storage, at(T0 + 5));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_quota_is_always_limited() {
        let mut storage = MemoryStorage::new();
        let l = UsageLimiter::new(USAGE_KEY, 0, TimeDelta::hours(2));
        let status = l.check_and_maybe_reset(&mut storage, at(T0));
        assert_eq!(status.remaining, 0);
        assert!(status.limited);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Debit,
        Advance(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Debit),
            (0i64..3 * 60 * 60 * 1000).prop_map(Op::Advance),
        ]
    }

    proptest! {
        #[test]
        fn remaining_tracks_debits(ops in proptest::collection::vec(op(), 1..40)) {
            let mut storage = MemoryStorage::new();
            let l = limiter();
            let mut now = at(T0);
            l.check_and_maybe_reset(&mut storage, now);

            for op in ops {
                match op {
                    Op::Debit => {
                        let before = l.check_and_maybe_reset(&mut storage, now);
                        let after = l.debit(&mut storage, now);
                        prop_assert_eq!(after, before.remaining.saturating_sub(1));
                    }
                    Op::Advance(ms) => now += TimeDelta::milliseconds(ms),
                }
                let status = l.peek(&storage, now);
                prop_assert!(status.remaining <= 3);
                prop_assert_eq!(status.limited, status.remaining == 0);
            }
        }

        #[test]
        fn expired_window_always_resets(count in 0u32..50, extra in 0i64..10_000_000) {
            let mut storage = MemoryStorage::new();
            storage
                .set(USAGE_KEY, &format!(r#"{{"count":{count},"lastReset":{T0}}}"#))
                .unwrap();
            let l = limiter();
            let now = at(T0) + TimeDelta::hours(2) + TimeDelta::milliseconds(extra);
            let status = l.check_and_maybe_reset(&mut storage, now);
            prop_assert_eq!(status.remaining, 3);
            prop_assert!(!status.limited);
            prop_assert_eq!(l.load(&storage).unwrap().count, 0);
        }
    }
}

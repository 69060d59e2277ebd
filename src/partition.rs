//! Hourly partition window and timestamp tagging helpers.
//!
//! The clicks asset is declared against a fixed window of one-hour slots
//! (168 slots covering seven days from a configured start). A partition
//! key is the slot's start rendered as `%Y-%m-%d %H:%M:%S`; the
//! orchestrating caller picks one and the runner checks membership
//! before executing.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Opaque identifier scoping a partitioned asset's run to one time slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionKey(String);

impl PartitionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

const KEY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A contiguous window of one-hour slots starting at `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPartitions {
    start: NaiveDateTime,
    hours: u32,
}

impl HourlyPartitions {
    pub fn new(start: NaiveDateTime, hours: u32) -> Self {
        Self { start, hours }
    }

    /// The source window: one week of hourly slots from the Unix epoch.
    pub fn weekly_from_epoch() -> Self {
        Self::new(chrono::DateTime::UNIX_EPOCH.naive_utc(), 168)
    }

    pub fn len(&self) -> u32 {
        self.hours
    }

    pub fn is_empty(&self) -> bool {
        self.hours == 0
    }

    /// The key for slot `index`, if it is inside the window.
    pub fn key(&self, index: u32) -> Option<PartitionKey> {
        if index >= self.hours {
            return None;
        }
        let slot = self.start + Duration::hours(i64::from(index));
        Some(PartitionKey::new(slot.format(KEY_FORMAT).to_string()))
    }

    /// Every key in the window, in slot order.
    pub fn keys(&self) -> Vec<PartitionKey> {
        (0..self.hours).filter_map(|i| self.key(i)).collect()
    }

    /// Whether `key` names one of this window's slots.
    ///
    /// Slots sit at whole-hour offsets from `start`, so membership is
    /// checked against the window's own grid rather than clock-hour
    /// alignment; a window with a non-aligned start accepts exactly the
    /// keys it generates.
    pub fn contains(&self, key: &PartitionKey) -> bool {
        let Ok(ts) = NaiveDateTime::parse_from_str(key.as_str(), KEY_FORMAT) else {
            return false;
        };
        let offset = ts - self.start;
        if offset < Duration::zero() || offset != Duration::hours(offset.num_hours()) {
            return false;
        }
        (offset.num_hours() as u64) < u64::from(self.hours)
    }
}

/// A timestamp with minutes, seconds and sub-seconds zeroed.
pub fn floor_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date()
        .and_hms_opt(ts.hour(), 0, 0)
        .expect("hour already validated by chrono")
}

/// The calendar date of a timestamp, discarding time-of-day.
pub fn day_of(ts: NaiveDateTime) -> NaiveDate {
    ts.date()
}

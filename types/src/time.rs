//! Timestamp type and clock abstraction.
//!
//! Timestamps are UTC instants serialized as RFC 3339 strings, which is the
//! `createdAt` format clients already consume.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Build a timestamp from Unix epoch milliseconds. Out-of-range values
    /// clamp to the epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self(
            Utc.timestamp_millis_opt(millis)
                .single()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        )
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Milliseconds from `self` until `later`, zero if `later` is earlier.
    pub fn millis_until(&self, later: Timestamp) -> u64 {
        later.as_millis().saturating_sub(self.as_millis()).max(0) as u64
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// Source of the current time. Injected wherever a timestamp is minted so
/// tests can pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_rfc3339() {
        let ts = Timestamp::from_millis(1_700_000_000_000);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2023-11-14T22:13:20Z\"");
    }

    #[test]
    fn parses_javascript_iso_strings() {
        let ts: Timestamp = serde_json::from_str("\"2024-05-01T10:00:00.123Z\"").unwrap();
        assert_eq!(ts.as_millis() % 1000, 123);
    }

    #[test]
    fn millis_until_saturates() {
        let a = Timestamp::from_millis(5_000);
        let b = Timestamp::from_millis(7_500);
        assert_eq!(a.millis_until(b), 2_500);
        assert_eq!(b.millis_until(a), 0);
    }
}

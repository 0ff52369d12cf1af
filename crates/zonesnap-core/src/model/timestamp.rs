//! Backup timestamps and caller references

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Layout of a backup timestamp: UTC, second precision, lexicographically sortable
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Identifies a backup
///
/// Used both as the storage namespace prefix of a snapshot and as the
/// literal body of the latest-backup pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current time, truncated to the second
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Derive the creation token for restoring `resource_id` in an operation
    /// started at this timestamp
    pub fn caller_reference(&self, resource_id: &str) -> CallerReference {
        CallerReference(format!("{}-{}", self, resource_id))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|e| {
                Error::invalid_input(format!(
                    "Invalid backup timestamp '{}' (expected YYYY-MM-DDTHH:MM:SSZ): {}",
                    s, e
                ))
            })
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Client-supplied idempotency token for provider creation calls
///
/// Formatted as `{operation_timestamp}-{original_resource_id}`: stable for
/// retries within one restore run, distinct across resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerReference(String);

impl CallerReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Wall-clock timestamps with a canonical text form.
//!
//! Timestamps are naive local date-times (no zone), rendered as
//! `YYYY-MM-DDTHH:MM:SS.ffffff`. Values produced by [`Timestamp::now`] are
//! truncated to microseconds so that rendering and parsing them again
//! yields the same value.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical render format: always six fractional digits.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Parse format. The fractional part is optional and may be shorter than
/// six digits.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A microsecond-precision wall-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Reads the local wall clock.
    #[must_use]
    pub fn now() -> Self {
        Self(Local::now().naive_local().trunc_subsecs(6))
    }

    /// Wraps a date-time, truncating it to microseconds.
    #[must_use]
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self(dt.trunc_subsecs(6))
    }

    /// Returns the underlying date-time.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Parses the canonical text form.
    pub fn parse(s: &str) -> crate::Result<Self> {
        NaiveDateTime::parse_from_str(s, PARSE_FORMAT)
            .map(Self::from_naive)
            .map_err(|_| crate::Error::InvalidTimestamp(s.to_string()))
    }

    /// Returns the later of `self` and the current time.
    ///
    /// Used when refreshing `updated_at` so it never moves backwards if the
    /// wall clock is stepped back.
    #[must_use]
    pub fn max_with_now(self) -> Self {
        self.max(Self::now())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

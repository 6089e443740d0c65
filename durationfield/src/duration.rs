//! Duration value type with flexible serialization.

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration as StdDuration;

use crate::error::{DurationError, Result};
use crate::precision::{MICROS_PER_DAY, MICROS_PER_SECOND, Precision};

/// An absolute, calendar-independent span of time.
///
/// The value is kept normalized as days, seconds within the day and
/// microseconds within the second, and never carries a sign. Its total
/// magnitude is bounded by `i64::MAX` microseconds so that it always fits a
/// signed 64-bit column at any [`Precision`].
///
/// Serializes to the canonical string (e.g. `"1min30s"`) and deserializes
/// from either a string or an integer count of microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    days: u64,
    seconds: u32,
    microseconds: u32,
}

impl Duration {
    /// The empty duration.
    pub const ZERO: Duration = Duration {
        days: 0,
        seconds: 0,
        microseconds: 0,
    };

    /// The largest representable duration, `i64::MAX` microseconds.
    pub const MAX: Duration = Duration::from_micros_unchecked(i64::MAX as u64);

    /// Creates a Duration from days, seconds and microseconds, carrying any
    /// overflow of the smaller fields into the larger ones.
    pub fn new(days: u64, seconds: u64, microseconds: u64) -> Result<Self> {
        let total = days as u128 * MICROS_PER_DAY as u128
            + seconds as u128 * MICROS_PER_SECOND as u128
            + microseconds as u128;
        Self::from_micros_u128(total)
    }

    /// Creates a Duration from a total number of microseconds.
    pub fn from_micros(micros: u64) -> Result<Self> {
        Self::from_micros_u128(micros as u128)
    }

    /// Creates a Duration from seconds.
    pub fn from_secs(secs: u64) -> Result<Self> {
        Self::new(0, secs, 0)
    }

    /// Creates a Duration from days.
    pub fn from_days(days: u64) -> Result<Self> {
        Self::new(days, 0, 0)
    }

    /// Creates a Duration from a count of `precision` units.
    pub fn from_units(units: u64, precision: Precision) -> Result<Self> {
        Self::from_micros_u128(units as u128 * precision.unit_micros() as u128)
    }

    pub(crate) fn from_micros_u128(micros: u128) -> Result<Self> {
        if micros > i64::MAX as u128 {
            return Err(DurationError::OutOfRange);
        }
        Ok(Self::from_micros_unchecked(micros as u64))
    }

    const fn from_micros_unchecked(micros: u64) -> Self {
        Self {
            days: micros / MICROS_PER_DAY,
            seconds: ((micros % MICROS_PER_DAY) / MICROS_PER_SECOND) as u32,
            microseconds: (micros % MICROS_PER_SECOND) as u32,
        }
    }

    /// Returns the whole days.
    pub fn days(&self) -> u64 {
        self.days
    }

    /// Returns the seconds within the last day, in `0..86400`.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Returns the microseconds within the last second, in `0..1_000_000`.
    pub fn microseconds(&self) -> u32 {
        self.microseconds
    }

    /// Returns the total magnitude in microseconds.
    pub fn as_micros(&self) -> u64 {
        self.days * MICROS_PER_DAY
            + self.seconds as u64 * MICROS_PER_SECOND
            + self.microseconds as u64
    }

    /// Returns true if this duration is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Drops every component finer than `precision`.
    pub fn truncate(&self, precision: Precision) -> Self {
        let unit = precision.unit_micros();
        Self::from_micros_unchecked(self.as_micros() / unit * unit)
    }
}

impl From<Duration> for StdDuration {
    fn from(d: Duration) -> Self {
        StdDuration::from_micros(d.as_micros())
    }
}

impl TryFrom<StdDuration> for Duration {
    type Error = DurationError;

    /// Sub-microsecond nanoseconds are truncated.
    fn try_from(d: StdDuration) -> Result<Self> {
        Self::from_micros_u128(d.as_micros())
    }
}

impl From<Duration> for TimeDelta {
    fn from(d: Duration) -> Self {
        // Bounded by i64::MAX microseconds.
        TimeDelta::microseconds(d.as_micros() as i64)
    }
}

impl TryFrom<TimeDelta> for Duration {
    type Error = DurationError;

    /// Negative deltas become their absolute value.
    fn try_from(delta: TimeDelta) -> Result<Self> {
        let micros = delta.num_microseconds().ok_or(DurationError::OutOfRange)?;
        Self::from_micros(micros.unsigned_abs())
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DurationVisitor;

        impl<'de> serde::de::Visitor<'de> for DurationVisitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a duration string (e.g., '1h30min') or microseconds integer")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                v.parse().map_err(serde::de::Error::custom)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                Duration::from_micros(v.unsigned_abs()).map_err(serde::de::Error::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                Duration::from_micros(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

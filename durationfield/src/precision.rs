//! Storage precision of an encoded duration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DurationError;

pub(crate) const MICROS_PER_SECOND: u64 = 1_000_000;
pub(crate) const SECONDS_PER_DAY: u64 = 86_400;
pub(crate) const MICROS_PER_DAY: u64 = SECONDS_PER_DAY * MICROS_PER_SECOND;

/// The unit of the integer a duration is stored as.
///
/// A precision is chosen once per field and never changes afterwards.
/// Anything finer than the precision is truncated on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Microseconds,
    Seconds,
    Days,
}

impl Precision {
    /// All supported precisions, finest first.
    pub const ALL: [Precision; 3] = [Self::Microseconds, Self::Seconds, Self::Days];

    /// Returns the lowercase name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Microseconds => "microseconds",
            Self::Seconds => "seconds",
            Self::Days => "days",
        }
    }

    /// Number of microseconds in one unit of this precision.
    pub fn unit_micros(&self) -> u64 {
        match self {
            Self::Microseconds => 1,
            Self::Seconds => MICROS_PER_SECOND,
            Self::Days => MICROS_PER_DAY,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precision {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DurationError::UnsupportedPrecision(s.to_string()))
    }
}

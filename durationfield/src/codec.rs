//! Conversion between [`Duration`] and its single-integer storage form.

use chrono::TimeDelta;
use std::fmt;

use crate::duration::Duration;
use crate::error::{DurationError, Result};
use crate::parser::parse;
use crate::precision::Precision;

/// A value handed to [`decode`], tagged with its kind.
///
/// Covers everything a storage column, a serializer or a form may produce.
/// `Float` and `Bool` are representable but never decodable.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Duration(Duration),
    TimeDelta(TimeDelta),
}

impl RawValue {
    /// Returns the name of the kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Integer(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::Bool(_) => "bool",
            RawValue::Text(_) => "string",
            RawValue::Duration(_) => "duration",
            RawValue::TimeDelta(_) => "timedelta",
        }
    }

    /// Returns true for [`RawValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("null"),
            RawValue::Integer(v) => write!(f, "{v}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Bool(v) => write!(f, "{v}"),
            RawValue::Text(v) => write!(f, "{v:?}"),
            RawValue::Duration(v) => write!(f, "{v}"),
            RawValue::TimeDelta(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Integer(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Integer(v.into())
    }
}

impl From<u32> for RawValue {
    fn from(v: u32) -> Self {
        RawValue::Integer(v.into())
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<Duration> for RawValue {
    fn from(v: Duration) -> Self {
        RawValue::Duration(v)
    }
}

impl From<TimeDelta> for RawValue {
    fn from(v: TimeDelta) -> Self {
        RawValue::TimeDelta(v)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RawValue::Null, Into::into)
    }
}

/// Encodes `value` as a count of `precision` units.
///
/// Finer components are truncated, never rounded. The result is always
/// non-negative and fits in `i64` because [`Duration`] is bounded.
pub fn encode(value: Duration, precision: Precision) -> i64 {
    (value.as_micros() / precision.unit_micros()) as i64
}

/// Decodes a raw value into a [`Duration`].
///
/// Integers are read as counts of `precision` units, strings are parsed,
/// durations pass through; every result is the absolute value. `Null` yields
/// `Ok(None)`.
pub fn decode(raw: impl Into<RawValue>, precision: Precision) -> Result<Option<Duration>> {
    let duration = match raw.into() {
        RawValue::Null => return Ok(None),
        RawValue::Integer(units) => Duration::from_units(units.unsigned_abs(), precision)?,
        RawValue::Text(text) => parse(&text)?,
        RawValue::Duration(d) => d,
        RawValue::TimeDelta(delta) => Duration::try_from(delta)?,
        other @ (RawValue::Float(_) | RawValue::Bool(_)) => {
            return Err(DurationError::UnsupportedType {
                kind: other.kind(),
                input: other.to_string(),
            });
        }
    };
    Ok(Some(duration))
}

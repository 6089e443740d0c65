//! Duration value type with a compact text grammar and integer storage.
//!
//! This crate provides:
//!
//! - [`Duration`]: an absolute span of time, normalized to days, seconds and
//!   microseconds
//! - [`parse`] / [`format`]: the `"w d h min s ms us"` text form
//! - [`encode`] / [`decode`]: conversion to and from a single `i64` at a fixed
//!   [`Precision`]
//! - [`DurationField`]: a column configuration tying the above together
//!
//! # Example
//!
//! ```rust
//! use durationfield::{Duration, Precision, decode, encode, parse};
//!
//! let d = parse("1w2d3h").unwrap();
//! assert_eq!(d.to_string(), "1w2d3h");
//!
//! // Encoded at the column's precision, finer parts truncated
//! assert_eq!(encode(parse("1d").unwrap(), Precision::Seconds), 86400);
//! assert_eq!(encode(parse("1d").unwrap(), Precision::Days), 1);
//!
//! // Decoded from whatever the column or a form hands back
//! let d = decode(90_000_000i64, Precision::Microseconds).unwrap();
//! assert_eq!(d.map(|d| d.to_string()).as_deref(), Some("1min30s"));
//!
//! // Serializes to the canonical string
//! let json = serde_json::to_string(&Duration::from_secs(5400).unwrap()).unwrap();
//! assert_eq!(json, r#""1h30min""#);
//! ```

mod codec;
mod duration;
mod error;
mod field;
mod parser;
mod precision;

pub use codec::{RawValue, decode, encode};
pub use duration::Duration;
pub use error::{DurationError, Result};
pub use field::{DurationField, FieldConfig};
pub use parser::{format, parse};
pub use precision::Precision;

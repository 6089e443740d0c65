//! Duration text grammar: `parse` and its inverse `format`.
//!
//! A duration string is a sequence of `<amount><unit>` components, e.g.
//! `"1w2d3h4min5s6ms7us"` or `"1h 30min"`. Amounts are non-negative integers
//! or decimals; units are `w`, `d`, `h`, `min`, `s`, `ms` and `us`. Each unit
//! may appear at most once, in any order. A leading `-` is accepted and
//! dropped, since durations are always absolute.

use std::fmt;
use std::str::FromStr;

use crate::duration::Duration;
use crate::error::{DurationError, Result};

/// Fraction digits beyond this carry no weight at microsecond resolution.
const MAX_FRACTION_DIGITS: u32 = 20;

/// Sub-microsecond leftovers are kept in units of `1 / FRACTION_SCALE` us.
const FRACTION_SCALE: u128 = 10u128.pow(MAX_FRACTION_DIGITS);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Millis,
    Micros,
}

/// Largest first.
const UNITS: [Unit; 7] = [
    Unit::Weeks,
    Unit::Days,
    Unit::Hours,
    Unit::Minutes,
    Unit::Seconds,
    Unit::Millis,
    Unit::Micros,
];

impl Unit {
    fn name(self) -> &'static str {
        match self {
            Unit::Weeks => "w",
            Unit::Days => "d",
            Unit::Hours => "h",
            Unit::Minutes => "min",
            Unit::Seconds => "s",
            Unit::Millis => "ms",
            Unit::Micros => "us",
        }
    }

    fn micros(self) -> u64 {
        match self {
            Unit::Weeks => 7 * 86_400_000_000,
            Unit::Days => 86_400_000_000,
            Unit::Hours => 3_600_000_000,
            Unit::Minutes => 60_000_000,
            Unit::Seconds => 1_000_000,
            Unit::Millis => 1_000,
            Unit::Micros => 1,
        }
    }

    fn from_name(name: &str) -> Option<Unit> {
        UNITS.into_iter().find(|u| u.name() == name)
    }
}

/// A decimal amount: `whole + fraction / scale`.
struct Amount {
    whole: u128,
    fraction: u128,
    scale: u128,
}

impl Amount {
    /// Whole microseconds contributed by this amount of `unit`, and the
    /// sub-microsecond leftover in units of `1 / FRACTION_SCALE` us.
    fn micros(&self, unit: Unit) -> Result<(u128, u128)> {
        let unit = unit.micros() as u128;
        let fraction = self.fraction * unit;
        let whole = self
            .whole
            .checked_mul(unit)
            .and_then(|whole| whole.checked_add(fraction / self.scale))
            .ok_or(DurationError::OutOfRange)?;
        let leftover = fraction % self.scale * (FRACTION_SCALE / self.scale);
        Ok((whole, leftover))
    }
}

/// Splits a leading decimal amount off `s`.
fn split_amount<'a>(input: &str, s: &'a str) -> Result<(Amount, &'a str)> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let mut amount = Amount {
        whole: 0,
        fraction: 0,
        scale: 1,
    };

    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        amount.whole = amount
            .whole
            .checked_mul(10)
            .and_then(|w| w.checked_add((bytes[pos] - b'0') as u128))
            .ok_or(DurationError::OutOfRange)?;
        pos += 1;
    }
    let whole_digits = pos;

    let mut fraction_digits = 0;
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            if fraction_digits < MAX_FRACTION_DIGITS {
                amount.fraction = amount.fraction * 10 + (bytes[pos] - b'0') as u128;
                amount.scale *= 10;
            }
            fraction_digits += 1;
            pos += 1;
        }
        if fraction_digits == 0 {
            return Err(DurationError::invalid(input, "expected digits after '.'"));
        }
    }

    if whole_digits == 0 && fraction_digits == 0 {
        let found = s.chars().next().unwrap_or_default();
        return Err(DurationError::invalid(
            input,
            format!("expected a number, found {found:?}"),
        ));
    }

    Ok((amount, &s[pos..]))
}

/// Parses a duration string into a normalized [`Duration`].
///
/// Fails with [`DurationError::InvalidFormat`] when the text is empty, has a
/// component without a unit, uses an unknown unit or repeats a unit, and with
/// [`DurationError::OutOfRange`] when the total does not fit in `i64`
/// microseconds.
pub fn parse(text: &str) -> Result<Duration> {
    let trimmed = text.trim();
    let mut rest = trimmed.strip_prefix('-').unwrap_or(trimmed).trim_start();
    if rest.is_empty() {
        return Err(DurationError::invalid(text, "no duration components found"));
    }

    let mut seen = [false; UNITS.len()];
    let mut total: u128 = 0;
    let mut leftover: u128 = 0;

    while !rest.is_empty() {
        let (amount, after) = split_amount(text, rest)?;
        let after = after.trim_start();

        let unit_len = after.bytes().take_while(u8::is_ascii_alphabetic).count();
        if unit_len == 0 {
            return Err(DurationError::invalid(text, "missing unit after amount"));
        }
        let (name, after) = after.split_at(unit_len);
        let unit = Unit::from_name(name)
            .ok_or_else(|| DurationError::invalid(text, format!("unknown unit {name:?}")))?;

        if std::mem::replace(&mut seen[unit as usize], true) {
            return Err(DurationError::invalid(text, format!("duplicate unit {name:?}")));
        }

        let (whole, fraction) = amount.micros(unit)?;
        total = total.checked_add(whole).ok_or(DurationError::OutOfRange)?;
        leftover += fraction;
        rest = after.trim_start();
    }

    // Truncate once, on the exact sum.
    total = total
        .checked_add(leftover / FRACTION_SCALE)
        .ok_or(DurationError::OutOfRange)?;
    Duration::from_micros_u128(total)
}

/// Renders the canonical string for `d`, e.g. `"1min30s"`.
///
/// Equivalent to `d.to_string()`. Use `format!("{d:#}")` for the
/// space-separated form `"1min 30s"`; both are accepted by [`parse`].
pub fn format(d: &Duration) -> String {
    d.to_string()
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0s");
        }

        let separator = if f.alternate() { " " } else { "" };
        let mut rest = self.as_micros();
        let mut first = true;
        for unit in UNITS {
            let n = rest / unit.micros();
            rest %= unit.micros();
            if n == 0 {
                continue;
            }
            if !first {
                f.write_str(separator)?;
            }
            write!(f, "{}{}", n, unit.name())?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn micros(s: &str) -> u64 {
        parse(s).unwrap().as_micros()
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(micros("1w"), 604_800_000_000);
        assert_eq!(micros("1d"), 86_400_000_000);
        assert_eq!(micros("1h"), 3_600_000_000);
        assert_eq!(micros("1min"), 60_000_000);
        assert_eq!(micros("1s"), 1_000_000);
        assert_eq!(micros("1ms"), 1_000);
        assert_eq!(micros("1us"), 1);
    }

    #[test]
    fn test_parse_all_units() {
        let expected = 9 * 86_400_000_000
            + 3 * 3_600_000_000
            + 4 * 60_000_000
            + 5_000_000
            + 6_000
            + 7;
        assert_eq!(micros("1w2d3h4min5s6ms7us"), expected);
        assert_eq!(micros("1w 2d 3h 4min 5s 6ms 7us"), expected);
        assert_eq!(micros("7us6ms5s4min3h2d1w"), expected);
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(micros("  1h30min  "), 5_400_000_000);
        assert_eq!(micros("1h\t30 min"), 5_400_000_000);
    }

    #[test]
    fn test_parse_decimals_truncate() {
        assert_eq!(micros("1.5h"), 5_400_000_000);
        assert_eq!(micros("0.5s"), 500_000);
        assert_eq!(micros(".25s"), 250_000);
        assert_eq!(micros("1.9us"), 1);
        assert_eq!(micros("0.0000019s"), 1);
        assert_eq!(micros("0.333333333333333333333333s"), 333_333);
    }

    #[test]
    fn test_parse_fractions_sum_before_truncating() {
        assert_eq!(micros("0.0000005s 0.5us"), 1);
        assert_eq!(micros("0.6us 0.0000006s"), 1);
        assert_eq!(micros("0.0000004s 0.5us"), 0);
        assert_eq!(micros("1.5us 0.0005ms 0.0000000005min"), 2);
    }

    #[test]
    fn test_parse_negative_is_absolute() {
        assert_eq!(parse("-1h30min").unwrap(), parse("1h30min").unwrap());
        assert_eq!(parse(" - 5s").unwrap(), parse("5s").unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        for s in [
            "", "   ", "-", "5", "5 xyz", "h", "1h30", "1h-30min", "1.h", "1..5s", "1H",
            "1m", "1hh", "5 s x", "1µs",
        ] {
            assert!(
                matches!(parse(s), Err(DurationError::InvalidFormat { .. })),
                "expected InvalidFormat for {s:?}"
            );
        }
    }

    #[test]
    fn test_parse_duplicate_unit() {
        let err = parse("1h2h").unwrap_err();
        assert!(err.to_string().contains("duplicate unit"));
        assert!(parse("1s 1ms 1s").is_err());
    }

    #[test]
    fn test_parse_error_carries_input() {
        match parse("5 xyz") {
            Err(DurationError::InvalidFormat { input, reason }) => {
                assert_eq!(input, "5 xyz");
                assert!(reason.contains("xyz"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_out_of_range() {
        assert_eq!(parse("99999999999w"), Err(DurationError::OutOfRange));
        assert_eq!(
            parse("999999999999999999999999999999999999999999us"),
            Err(DurationError::OutOfRange)
        );
        assert_eq!(parse("9223372036854775807us").unwrap(), Duration::MAX);
    }

    #[test]
    fn test_format() {
        assert_eq!(Duration::ZERO.to_string(), "0s");
        assert_eq!(Duration::from_secs(90).unwrap().to_string(), "1min30s");
        assert_eq!(Duration::from_secs(3600).unwrap().to_string(), "1h");
        assert_eq!(Duration::from_days(15).unwrap().to_string(), "2w1d");
        assert_eq!(Duration::from_micros(1_001).unwrap().to_string(), "1ms1us");
        assert_eq!(format(&parse("1w2d3h4min5s6ms7us").unwrap()), "1w2d3h4min5s6ms7us");
    }

    #[test]
    fn test_format_alternate() {
        let d = Duration::from_secs(5_445).unwrap();
        assert_eq!(format!("{d:#}"), "1h 30min 45s");
        assert_eq!(format!("{:#}", Duration::ZERO), "0s");
    }

    #[test]
    fn test_format_parse_round_trip() {
        let samples = [
            0,
            1,
            999,
            1_000_000,
            90_000_000,
            86_399_999_999,
            604_800_000_001,
            1_234_567_890_123,
            i64::MAX as u64,
        ];
        for micros in samples {
            let d = Duration::from_micros(micros).unwrap();
            assert_eq!(parse(&d.to_string()).unwrap(), d);
            assert_eq!(parse(&format!("{d:#}")).unwrap(), d);
        }
    }
}

//! A storage field configured with a fixed [`Precision`].
//!
//! [`DurationField`] is what a persistence layer holds per column: it fixes
//! the precision once, describes the column it needs, and runs values through
//! [`encode`] on the way in and [`decode`] on the way out.

use serde::{Deserialize, Serialize};

use crate::codec::{RawValue, decode, encode};
use crate::duration::Duration;
use crate::error::{DurationError, Result};
use crate::precision::Precision;

/// Serializable description of a [`DurationField`], enough to rebuild it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub nullable: bool,
}

/// A duration column stored as a 64-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationField {
    precision: Precision,
    nullable: bool,
}

impl DurationField {
    /// Column type the field needs from the database.
    pub const COLUMN_TYPE: &'static str = "bigint";

    /// Name the field reports to the host framework.
    pub const INTERNAL_TYPE: &'static str = "DurationField";

    /// Creates a non-nullable field with the given precision.
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            nullable: false,
        }
    }

    /// Creates a field from a precision name such as `"seconds"`.
    pub fn from_precision_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// Allows or forbids null values.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn column_type(&self) -> &'static str {
        Self::COLUMN_TYPE
    }

    pub fn internal_type(&self) -> &'static str {
        Self::INTERNAL_TYPE
    }

    /// Returns the configuration that rebuilds this field.
    pub fn config(&self) -> FieldConfig {
        FieldConfig {
            precision: self.precision,
            nullable: self.nullable,
        }
    }

    /// Converts a value into the integer written to the column.
    ///
    /// Null passes through as `None` when the field is nullable and fails
    /// with [`DurationError::NullValue`] otherwise.
    pub fn prepare(&self, raw: impl Into<RawValue>) -> Result<Option<i64>> {
        let raw = raw.into();
        if raw.is_null() && !self.nullable {
            return Err(DurationError::NullValue);
        }
        let encoded = decode(raw, self.precision)?.map(|d| encode(d, self.precision));
        tracing::trace!(precision = %self.precision, ?encoded, "prepared duration value");
        Ok(encoded)
    }

    /// Converts a value read from the column, a form or a serializer.
    pub fn to_duration(&self, raw: impl Into<RawValue>) -> Result<Option<Duration>> {
        let raw = raw.into();
        let kind = raw.kind();
        let value = decode(raw, self.precision)?;
        tracing::trace!(precision = %self.precision, kind, ?value, "decoded duration value");
        Ok(value)
    }

    /// Renders a value for text output; null renders as an empty string.
    pub fn value_to_string(&self, value: Option<&Duration>) -> String {
        value.map(Duration::to_string).unwrap_or_default()
    }
}

impl From<FieldConfig> for DurationField {
    fn from(config: FieldConfig) -> Self {
        Self::new(config.precision).nullable(config.nullable)
    }
}

#[cfg(test)]
mod field_tests {
    use super::*;

    #[test]
    fn test_from_precision_name() {
        let field = DurationField::from_precision_name("seconds").unwrap();
        assert_eq!(field.precision(), Precision::Seconds);
        assert_eq!(
            DurationField::from_precision_name("weeks"),
            Err(DurationError::UnsupportedPrecision("weeks".to_string()))
        );
    }

    #[test]
    fn test_column_descriptors() {
        let field = DurationField::default();
        assert_eq!(field.precision(), Precision::Microseconds);
        assert_eq!(field.column_type(), "bigint");
        assert_eq!(field.internal_type(), "DurationField");
    }

    #[test]
    fn test_prepare() {
        let field = DurationField::new(Precision::Seconds);
        assert_eq!(field.prepare("1d").unwrap(), Some(86_400));
        assert_eq!(field.prepare(-90i64).unwrap(), Some(90));
        assert_eq!(field.prepare("1.9s").unwrap(), Some(1));

        let days = DurationField::new(Precision::Days);
        assert_eq!(days.prepare("1d").unwrap(), Some(1));
    }

    #[test]
    fn test_prepare_null() {
        let field = DurationField::new(Precision::Seconds);
        assert_eq!(field.prepare(RawValue::Null), Err(DurationError::NullValue));
        assert_eq!(field.prepare(None::<&str>), Err(DurationError::NullValue));
        assert_eq!(field.nullable(true).prepare(RawValue::Null).unwrap(), None);

        // Unsupported kinds are still reported as such, null or not.
        assert!(matches!(
            field.nullable(true).prepare(2.5),
            Err(DurationError::UnsupportedType { kind: "float", .. })
        ));
    }

    #[test]
    fn test_to_duration() {
        let field = DurationField::new(Precision::Microseconds).nullable(true);
        let d = field.to_duration(90_000_000i64).unwrap().unwrap();
        assert_eq!(field.value_to_string(Some(&d)), "1min30s");
        assert_eq!(field.to_duration(None::<i64>).unwrap(), None);
        assert_eq!(field.value_to_string(None), "");
    }

    #[test]
    fn test_config_rebuilds_field() {
        let field = DurationField::new(Precision::Days).nullable(true);
        assert_eq!(DurationField::from(field.config()), field);
    }
}

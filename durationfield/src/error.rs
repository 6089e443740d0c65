use thiserror::Error;

/// Errors returned by duration parsing, decoding and field configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("duration: {input:?} must be in \"w d h min s ms us\" format: {reason}")]
    InvalidFormat { input: String, reason: String },

    #[error("duration: value {input} of type {kind} could not be converted")]
    UnsupportedType { kind: &'static str, input: String },

    #[error("duration: null value on a non-nullable field")]
    NullValue,

    #[error("duration: precision {0:?} is not implemented")]
    UnsupportedPrecision(String),

    #[error("duration: magnitude exceeds the 64-bit microsecond range")]
    OutOfRange,
}

impl DurationError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for duration operations.
pub type Result<T> = std::result::Result<T, DurationError>;

//! Validation error taxonomy
//!
//! Error kinds:
//! - TypeMismatch: input is not coercible to the declared type
//! - OutOfStorageRange: violates the native width, before any user constraint
//! - ConstraintViolation: violates a declared ordering/length/pattern constraint
//! - PrecisionOverflow: decimal has too many integer or fractional digits
//! - ImpossibleConstraintSet: the declared constraints admit no value at all
//!
//! All errors are returned synchronously to the immediate caller; a value is
//! wholly valid or the first violated check aborts evaluation.

use std::fmt;

use thiserror::Error;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Error kind, independent of the message details
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TypeMismatch,
    OutOfStorageRange,
    ConstraintViolation,
    PrecisionOverflow,
    ImpossibleConstraintSet,
}

impl ErrorKind {
    /// Returns the kind name for error messages and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::OutOfStorageRange => "OUT_OF_STORAGE_RANGE",
            ErrorKind::ConstraintViolation => "CONSTRAINT_VIOLATION",
            ErrorKind::PrecisionOverflow => "PRECISION_OVERFLOW",
            ErrorKind::ImpossibleConstraintSet => "IMPOSSIBLE_CONSTRAINT_SET",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation error with the offending value and a human-readable detail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Wrong kind of input, not coercible to the declared type
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// Outside the native width of the storage type
    #[error("out of storage range: value {value} {detail}")]
    OutOfStorageRange { value: String, detail: String },

    /// Violates a declared constraint
    #[error("constraint violation: value {value} {detail}")]
    ConstraintViolation { value: String, detail: String },

    /// Decimal with too many integer or fractional digits
    #[error("precision overflow: value {value} {detail}")]
    PrecisionOverflow { value: String, detail: String },

    /// The declared constraints admit no value
    #[error("impossible constraint set: {detail}")]
    ImpossibleConstraintSet { detail: String },
}

impl ValidationError {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: &'static str, actual: impl fmt::Display) -> Self {
        Self::TypeMismatch {
            expected,
            actual: actual.to_string(),
        }
    }

    /// Create an out-of-storage-range error
    pub fn out_of_storage_range(value: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self::OutOfStorageRange {
            value: value.to_string(),
            detail: detail.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint_violation(value: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            value: value.to_string(),
            detail: detail.into(),
        }
    }

    /// Create a precision overflow error
    pub fn precision_overflow(value: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self::PrecisionOverflow {
            value: value.to_string(),
            detail: detail.into(),
        }
    }

    /// Create an impossible constraint set error
    pub fn impossible(detail: impl Into<String>) -> Self {
        Self::ImpossibleConstraintSet {
            detail: detail.into(),
        }
    }

    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ValidationError::OutOfStorageRange { .. } => ErrorKind::OutOfStorageRange,
            ValidationError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            ValidationError::PrecisionOverflow { .. } => ErrorKind::PrecisionOverflow,
            ValidationError::ImpossibleConstraintSet { .. } => ErrorKind::ImpossibleConstraintSet,
        }
    }

    /// Returns the offending value, if the error carries one
    pub fn value(&self) -> Option<&str> {
        match self {
            ValidationError::TypeMismatch { actual, .. } => Some(actual),
            ValidationError::OutOfStorageRange { value, .. }
            | ValidationError::ConstraintViolation { value, .. }
            | ValidationError::PrecisionOverflow { value, .. } => Some(value),
            ValidationError::ImpossibleConstraintSet { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            ValidationError::type_mismatch("integer", "\"abc\"").kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            ValidationError::out_of_storage_range(128, "outside TINYINT range").kind(),
            ErrorKind::OutOfStorageRange
        );
        assert_eq!(
            ValidationError::constraint_violation(0, "must be greater than 0").kind(),
            ErrorKind::ConstraintViolation
        );
        assert_eq!(
            ValidationError::precision_overflow("1000.00", "too many integer digits").kind(),
            ErrorKind::PrecisionOverflow
        );
        assert_eq!(
            ValidationError::impossible("no valid values").kind(),
            ErrorKind::ImpossibleConstraintSet
        );
    }

    #[test]
    fn test_display_includes_value_and_detail() {
        let err = ValidationError::constraint_violation(10, "must be greater than 10");
        let msg = format!("{}", err);
        assert!(msg.contains("10"));
        assert!(msg.contains("must be greater than 10"));
    }

    #[test]
    fn test_offending_value_accessor() {
        let err = ValidationError::constraint_violation(15, "must be a multiple of 10");
        assert_eq!(err.value(), Some("15"));

        let err = ValidationError::impossible("lower bound 100 conflicts with upper bound 10");
        assert_eq!(err.value(), None);
    }
}

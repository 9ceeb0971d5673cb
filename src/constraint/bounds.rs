//! Generic ordering and multiple-of bounds
//!
//! Shared by the integer, decimal and float types. Checks run in a fixed
//! order (gt, ge, lt, le, multiple_of) so the first violated constraint is
//! always the one reported, keeping error messages deterministic.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::errors::{ValidationError, ValidationResult};

/// Scalar values usable as constraint bounds
pub trait BoundValue: Copy + PartialOrd + fmt::Display {
    /// Whether `self` is an exact multiple of `step` (`step` is positive)
    fn is_multiple_of(self, step: Self) -> bool;

    /// Whether `self` is strictly positive
    fn is_strictly_positive(self) -> bool;
}

impl BoundValue for i64 {
    fn is_multiple_of(self, step: Self) -> bool {
        self % step == 0
    }

    fn is_strictly_positive(self) -> bool {
        self > 0
    }
}

impl BoundValue for f64 {
    fn is_multiple_of(self, step: Self) -> bool {
        if step == 0.0 {
            return false;
        }
        let ratio = self / step;
        (ratio - ratio.round()).abs() < 1e-9
    }

    fn is_strictly_positive(self) -> bool {
        self > 0.0
    }
}

impl BoundValue for Decimal {
    fn is_multiple_of(self, step: Self) -> bool {
        (self % step).is_zero()
    }

    fn is_strictly_positive(self) -> bool {
        self.is_sign_positive() && !self.is_zero()
    }
}

/// Declared ordering and multiple-of constraints for a numeric type.
///
/// All fields are optional; absent bounds fall back to the storage range of
/// the owning type. Build with the chainable setters and let the owning
/// type's constructor run [`NumericBounds::validate_declaration`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ge: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub le: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<T>,
}

impl<T> Default for NumericBounds<T> {
    fn default() -> Self {
        Self {
            gt: None,
            ge: None,
            lt: None,
            le: None,
            multiple_of: None,
        }
    }
}

impl<T: BoundValue> NumericBounds<T> {
    /// Unconstrained bounds
    pub fn none() -> Self {
        Self::default()
    }

    /// Value must be strictly greater than `v`
    pub fn gt(mut self, v: T) -> Self {
        self.gt = Some(v);
        self
    }

    /// Value must be greater than or equal to `v`
    pub fn ge(mut self, v: T) -> Self {
        self.ge = Some(v);
        self
    }

    /// Value must be strictly less than `v`
    pub fn lt(mut self, v: T) -> Self {
        self.lt = Some(v);
        self
    }

    /// Value must be less than or equal to `v`
    pub fn le(mut self, v: T) -> Self {
        self.le = Some(v);
        self
    }

    /// Value must be an exact multiple of `v`
    pub fn multiple_of(mut self, v: T) -> Self {
        self.multiple_of = Some(v);
        self
    }

    /// Whether no constraint is declared
    pub fn is_empty(&self) -> bool {
        self.gt.is_none()
            && self.ge.is_none()
            && self.lt.is_none()
            && self.le.is_none()
            && self.multiple_of.is_none()
    }

    /// Checks the declaration itself: `multiple_of` must be strictly
    /// positive and the ordering bounds must not be mutually contradictory.
    ///
    /// Contradictions detectable without search fail here with
    /// `ImpossibleConstraintSet`; storage bounds are deliberately not
    /// consulted (an out-of-width bound is merely ineffective).
    pub fn validate_declaration(&self) -> ValidationResult<()> {
        if let Some(step) = self.multiple_of {
            if !step.is_strictly_positive() {
                return Err(ValidationError::impossible(format!(
                    "multiple_of must be strictly positive, got {}",
                    step
                )));
            }
        }

        let lowers = [(self.gt, true), (self.ge, false)];
        let uppers = [(self.lt, true), (self.le, false)];
        for (lower, lower_strict) in lowers {
            for (upper, upper_strict) in uppers {
                let (Some(lo), Some(hi)) = (lower, upper) else {
                    continue;
                };
                let empty = lo > hi || (lo == hi && (lower_strict || upper_strict));
                if empty {
                    return Err(ValidationError::impossible(format!(
                        "lower bound {} conflicts with upper bound {}",
                        lo, hi
                    )));
                }
            }
        }
        Ok(())
    }

    /// Checks a value against the declared constraints in fixed order.
    ///
    /// Returns the human-readable detail of the first violated constraint.
    pub fn check(&self, value: T) -> Result<(), String> {
        if let Some(b) = self.gt {
            if value <= b {
                return Err(format!("must be greater than {}", b));
            }
        }
        if let Some(b) = self.ge {
            if value < b {
                return Err(format!("must be greater than or equal to {}", b));
            }
        }
        if let Some(b) = self.lt {
            if value >= b {
                return Err(format!("must be less than {}", b));
            }
        }
        if let Some(b) = self.le {
            if value > b {
                return Err(format!("must be less than or equal to {}", b));
            }
        }
        if let Some(step) = self.multiple_of {
            if !value.is_multiple_of(step) {
                return Err(format!("must be a multiple of {}", step));
            }
        }
        Ok(())
    }
}

//! Bounded integer column types
//!
//! Four signed widths (TINYINT through BIGINT) with optional ordering and
//! multiple-of constraints. Storage bounds are checked before declared
//! constraints so an out-of-width value always reports `OutOfStorageRange`,
//! and `mock` intersects the constraint domain with the storage range before
//! sampling so narrow constraints can never push a draw out of width.

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, NumericBounds};
use crate::mock::{first_multiple_at_or_above, sample_progression};
use crate::types::errors::{ValidationError, ValidationResult};
use crate::types::value::{SqlValue, StorageValue};

/// Native width of a signed SQL integer column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntWidth {
    /// 8-bit signed, -128..=127
    TinyInt,
    /// 16-bit signed
    SmallInt,
    /// 32-bit signed
    Integer,
    /// 64-bit signed
    BigInt,
}

impl IntWidth {
    /// Smallest storable value for this width
    pub fn storage_min(&self) -> i64 {
        match self {
            IntWidth::TinyInt => i8::MIN as i64,
            IntWidth::SmallInt => i16::MIN as i64,
            IntWidth::Integer => i32::MIN as i64,
            IntWidth::BigInt => i64::MIN,
        }
    }

    /// Largest storable value for this width
    pub fn storage_max(&self) -> i64 {
        match self {
            IntWidth::TinyInt => i8::MAX as i64,
            IntWidth::SmallInt => i16::MAX as i64,
            IntWidth::Integer => i32::MAX as i64,
            IntWidth::BigInt => i64::MAX,
        }
    }

    /// SQL type name
    pub fn sql_name(&self) -> &'static str {
        match self {
            IntWidth::TinyInt => "TINYINT",
            IntWidth::SmallInt => "SMALLINT",
            IntWidth::Integer => "INTEGER",
            IntWidth::BigInt => "BIGINT",
        }
    }
}

/// Integer column type: a width plus optional declared bounds.
///
/// Bounds wider than the storage range are accepted and simply have no
/// effect; contradictions among the bounds themselves fail construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegerType {
    pub width: IntWidth,
    #[serde(default, skip_serializing_if = "NumericBounds::is_empty")]
    pub bounds: NumericBounds<i64>,
}

impl IntegerType {
    /// Builds an integer type, rejecting constraint sets that admit no value.
    ///
    /// Emptiness is judged on the declared bounds alone (`gt=5, lt=6` admits
    /// no integer even though the reals in between exist); the storage range
    /// is not consulted here.
    pub fn new(width: IntWidth, bounds: NumericBounds<i64>) -> ValidationResult<Self> {
        bounds.validate_declaration()?;

        // Integer-specific emptiness: strict bounds collapse onto the lattice.
        let lo = declared_lower(&bounds);
        let hi = declared_upper(&bounds);
        if let (Some(lo), Some(hi)) = (lo, hi) {
            if lo > hi {
                return Err(ValidationError::impossible(
                    "no integers satisfy the declared bounds",
                ));
            }
            if let Some(step) = bounds.multiple_of {
                if first_multiple_at_or_above(lo, step as i128) > hi {
                    return Err(ValidationError::impossible(format!(
                        "no multiple of {} within the declared bounds",
                        step
                    )));
                }
            }
        }

        Ok(Self { width, bounds })
    }

    /// Unconstrained integer of the given width
    pub fn plain(width: IntWidth) -> Self {
        Self {
            width,
            bounds: NumericBounds::none(),
        }
    }

    /// Validates and normalizes a candidate value.
    ///
    /// Accepts native integers, integral floats, integral decimals and
    /// trimmed numeric strings. Check order: coercion, storage range,
    /// declared constraints.
    pub fn validate(&self, value: &SqlValue) -> ValidationResult<SqlValue> {
        let n = self.coerce(value)?;
        self.check_range(n)?;
        Ok(SqlValue::Int(n))
    }

    /// Serializes a validated value to its storage form
    pub fn serialize(&self, value: &SqlValue) -> ValidationResult<StorageValue> {
        match self.validate(value)? {
            SqlValue::Int(n) => Ok(StorageValue::Int(n)),
            other => Err(ValidationError::type_mismatch("integer", other.type_name())),
        }
    }

    /// Decodes a storage value back to the normalized form
    pub fn deserialize(&self, storage: &StorageValue) -> ValidationResult<SqlValue> {
        match storage {
            StorageValue::Int(n) => self.validate(&SqlValue::Int(*n)),
            other => Err(ValidationError::type_mismatch("integer", other.type_name())),
        }
    }

    /// Generates a random value satisfying the storage range and all
    /// declared constraints.
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<SqlValue> {
        let (lo, hi, step) = self.effective_domain()?;
        let v = sample_progression(rng, lo, hi, step);
        Ok(SqlValue::Int(v))
    }

    /// SQL rendering, e.g. `"INTEGER CHECK (> 0 AND <= 100)"`
    pub fn sql_type(&self) -> String {
        match crate::constraint::check_clause(&self.constraints()) {
            Some(clause) => format!("{} {}", self.width.sql_name(), clause),
            None => self.width.sql_name().to_string(),
        }
    }

    /// The declared constraint set in declaration order
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut out = Vec::new();
        if let Some(v) = self.bounds.gt {
            out.push(Constraint::GreaterThan { value: v.into() });
        }
        if let Some(v) = self.bounds.ge {
            out.push(Constraint::GreaterOrEqual { value: v.into() });
        }
        if let Some(v) = self.bounds.lt {
            out.push(Constraint::LessThan { value: v.into() });
        }
        if let Some(v) = self.bounds.le {
            out.push(Constraint::LessOrEqual { value: v.into() });
        }
        if let Some(v) = self.bounds.multiple_of {
            out.push(Constraint::MultipleOf { value: v.into() });
        }
        out
    }

    fn coerce(&self, value: &SqlValue) -> ValidationResult<i64> {
        match value {
            SqlValue::Int(n) => Ok(*n),
            SqlValue::Float(x) => {
                if !x.is_finite() || x.fract() != 0.0 {
                    return Err(ValidationError::type_mismatch("integer", value));
                }
                if *x < i64::MIN as f64 || *x >= i64::MAX as f64 {
                    return Err(ValidationError::out_of_storage_range(
                        value,
                        format!("is outside {} range", self.width.sql_name()),
                    ));
                }
                Ok(*x as i64)
            }
            SqlValue::Decimal(d) => {
                if !d.fract().is_zero() {
                    return Err(ValidationError::type_mismatch("integer", value));
                }
                match d.to_i64() {
                    Some(n) => Ok(n),
                    None => Err(ValidationError::out_of_storage_range(
                        value,
                        format!("is outside {} range", self.width.sql_name()),
                    )),
                }
            }
            SqlValue::Text(s) => {
                let trimmed = s.trim();
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Ok(n);
                }
                // Distinguish a well-formed but oversized number from garbage.
                if trimmed.parse::<i128>().is_ok() {
                    return Err(ValidationError::out_of_storage_range(
                        value,
                        format!("is outside {} range", self.width.sql_name()),
                    ));
                }
                Err(ValidationError::type_mismatch("integer", value))
            }
            other => Err(ValidationError::type_mismatch("integer", other.type_name())),
        }
    }

    fn check_range(&self, n: i64) -> ValidationResult<()> {
        if n < self.width.storage_min() || n > self.width.storage_max() {
            return Err(ValidationError::out_of_storage_range(
                n,
                format!(
                    "is outside {} range [{}, {}]",
                    self.width.sql_name(),
                    self.width.storage_min(),
                    self.width.storage_max()
                ),
            ));
        }
        self.bounds
            .check(n)
            .map_err(|detail| ValidationError::constraint_violation(n, detail))
    }

    /// Computes `(lo, hi, step)` of the sampling progression: declared bounds
    /// intersected with the storage range, then narrowed to the multiple-of
    /// lattice. Everything runs in i128 so strict bounds at the i64 extremes
    /// cannot wrap.
    fn effective_domain(&self) -> ValidationResult<(i64, i64, i64)> {
        let mut lo = self.width.storage_min() as i128;
        let mut hi = self.width.storage_max() as i128;
        if let Some(l) = declared_lower(&self.bounds) {
            lo = lo.max(l);
        }
        if let Some(h) = declared_upper(&self.bounds) {
            hi = hi.min(h);
        }
        if lo > hi {
            return Err(ValidationError::impossible(
                "declared bounds leave no storable values",
            ));
        }
        let step = self.bounds.multiple_of.unwrap_or(1) as i128;
        let first = first_multiple_at_or_above(lo, step);
        let last = hi - hi.rem_euclid(step);
        if first > last {
            return Err(ValidationError::impossible(format!(
                "no multiple of {} within the storable bounds",
                step
            )));
        }
        Ok((first as i64, last as i64, step as i64))
    }
}

fn declared_lower(bounds: &NumericBounds<i64>) -> Option<i128> {
    let from_gt = bounds.gt.map(|g| g as i128 + 1);
    let from_ge = bounds.ge.map(|g| g as i128);
    match (from_gt, from_ge) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn declared_upper(bounds: &NumericBounds<i64>) -> Option<i128> {
    let from_lt = bounds.lt.map(|l| l as i128 - 1);
    let from_le = bounds.le.map(|l| l as i128);
    match (from_lt, from_le) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::errors::ErrorKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_width_table() {
        assert_eq!(IntWidth::TinyInt.storage_min(), -128);
        assert_eq!(IntWidth::TinyInt.storage_max(), 127);
        assert_eq!(IntWidth::SmallInt.storage_max(), 32767);
        assert_eq!(IntWidth::Integer.storage_max(), 2147483647);
        assert_eq!(IntWidth::BigInt.storage_max(), i64::MAX);
    }

    #[test]
    fn test_storage_check_runs_before_constraints() {
        // 200 violates both the TINYINT width and le=100; width wins.
        let ty = IntegerType::new(IntWidth::TinyInt, NumericBounds::none().le(100)).unwrap();
        let err = ty.validate(&SqlValue::Int(200)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfStorageRange);
    }

    #[test]
    fn test_constraint_messages() {
        let ty =
            IntegerType::new(IntWidth::Integer, NumericBounds::none().gt(0).multiple_of(5))
                .unwrap();
        let err = ty.validate(&SqlValue::Int(0)).unwrap_err();
        assert!(err.to_string().contains("must be greater than 0"));
        let err = ty.validate(&SqlValue::Int(7)).unwrap_err();
        assert!(err.to_string().contains("must be a multiple of 5"));
        assert!(ty.validate(&SqlValue::Int(10)).is_ok());
    }

    #[test]
    fn test_coercions() {
        let ty = IntegerType::plain(IntWidth::Integer);
        assert_eq!(ty.validate(&SqlValue::Float(42.0)), Ok(SqlValue::Int(42)));
        assert_eq!(
            ty.validate(&SqlValue::Text("  -7 ".into())),
            Ok(SqlValue::Int(-7))
        );
        assert_eq!(
            ty.validate(&SqlValue::Float(1.5)).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            ty.validate(&SqlValue::Text("abc".into())).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            ty.validate(&SqlValue::Bool(true)).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_oversized_numeric_string_is_range_error() {
        let ty = IntegerType::plain(IntWidth::BigInt);
        let err = ty
            .validate(&SqlValue::Text("99999999999999999999".into()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfStorageRange);
    }

    #[test]
    fn test_impossible_at_construction() {
        let err =
            IntegerType::new(IntWidth::Integer, NumericBounds::none().ge(100).le(10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImpossibleConstraintSet);

        // No integer lies strictly between 5 and 6.
        let err =
            IntegerType::new(IntWidth::Integer, NumericBounds::none().gt(5).lt(6)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImpossibleConstraintSet);

        // No multiple of 20 in (10, 15).
        let err = IntegerType::new(
            IntWidth::Integer,
            NumericBounds::none().gt(10).lt(15).multiple_of(20),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImpossibleConstraintSet);
    }

    #[test]
    fn test_out_of_width_bound_is_clamped() {
        // le beyond the TINYINT max is accepted and has no effect.
        let ty =
            IntegerType::new(IntWidth::TinyInt, NumericBounds::none().le(10_000)).unwrap();
        assert!(ty.validate(&SqlValue::Int(127)).is_ok());
        let err = ty.validate(&SqlValue::Int(128)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfStorageRange);
    }

    #[test]
    fn test_mock_respects_storage_bounds() {
        let ty = IntegerType::new(IntWidth::TinyInt, NumericBounds::none().gt(5)).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let SqlValue::Int(v) = ty.mock(&mut rng).unwrap() else {
                panic!("integer mock must produce Int");
            };
            assert!(v > 5 && v <= 127, "mock {} escaped (5, 127]", v);
        }
    }

    #[test]
    fn test_mock_narrow_domain() {
        let ty =
            IntegerType::new(IntWidth::TinyInt, NumericBounds::none().gt(125).le(127)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let SqlValue::Int(v) = ty.mock(&mut rng).unwrap() else {
                panic!("integer mock must produce Int");
            };
            assert!(v == 126 || v == 127);
        }
    }

    #[test]
    fn test_mock_multiple_of_progression() {
        let ty = IntegerType::new(
            IntWidth::Integer,
            NumericBounds::none().gt(0).le(100).multiple_of(10),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let SqlValue::Int(v) = ty.mock(&mut rng).unwrap() else {
                panic!("integer mock must produce Int");
            };
            assert!(v % 10 == 0 && v >= 10 && v <= 100);
        }
    }

    #[test]
    fn test_mock_at_bigint_extremes() {
        // Strict bounds at the i64 edges must not wrap.
        let ty = IntegerType::new(
            IntWidth::BigInt,
            NumericBounds::none().gt(i64::MAX - 2),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let SqlValue::Int(v) = ty.mock(&mut rng).unwrap() else {
                panic!("integer mock must produce Int");
            };
            assert!(v > i64::MAX - 2);
        }
    }

    #[test]
    fn test_sql_type_rendering() {
        let ty = IntegerType::plain(IntWidth::BigInt);
        assert_eq!(ty.sql_type(), "BIGINT");
        let ty = IntegerType::new(
            IntWidth::Integer,
            NumericBounds::none().ge(0).le(100).multiple_of(10),
        )
        .unwrap();
        assert_eq!(ty.sql_type(), "INTEGER CHECK (>= 0 AND <= 100 AND % 10 = 0)");
    }

    #[test]
    fn test_round_trip() {
        let ty = IntegerType::plain(IntWidth::SmallInt);
        let stored = ty.serialize(&SqlValue::Int(-300)).unwrap();
        assert_eq!(stored, StorageValue::Int(-300));
        assert_eq!(ty.deserialize(&stored).unwrap(), SqlValue::Int(-300));
    }
}

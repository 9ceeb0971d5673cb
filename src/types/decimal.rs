//! Fixed-point decimal column types
//!
//! DECIMAL(precision, scale) backed by `rust_decimal`. All arithmetic,
//! constraint evaluation and mock sampling happen on exact decimals; a value
//! never passes through binary floating point.
//!
//! `validate` is strict about fractional digits (untrusted input), while
//! `deserialize` rounds half-up to the declared scale (trusted storage that
//! may predate a scale change). The asymmetry is deliberate.

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, NumericBounds};
use crate::mock::{first_multiple_at_or_above, sample_i128, sample_i128_progression, MAX_ATTEMPTS};
use crate::types::errors::{ValidationError, ValidationResult};
use crate::types::value::{SqlValue, StorageValue};

/// Largest supported precision. The backing 96-bit mantissa holds any
/// 28-digit number; 29 digits would silently truncate.
pub const MAX_PRECISION: u32 = 28;

/// Fixed-point decimal column type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimalType {
    /// Total significant digits
    pub precision: u32,
    /// Digits after the decimal point
    pub scale: u32,
    /// Render with the NUMERIC keyword instead of DECIMAL
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub numeric: bool,
    #[serde(default, skip_serializing_if = "NumericBounds::is_empty")]
    pub bounds: NumericBounds<Decimal>,
}

impl DecimalType {
    /// Builds a decimal type, validating precision/scale and the bounds.
    pub fn new(precision: u32, scale: u32, bounds: NumericBounds<Decimal>) -> ValidationResult<Self> {
        if precision == 0 {
            return Err(ValidationError::impossible("precision must be at least 1"));
        }
        if precision > MAX_PRECISION {
            return Err(ValidationError::impossible(format!(
                "precision {} exceeds the supported maximum {}",
                precision, MAX_PRECISION
            )));
        }
        if scale > precision {
            return Err(ValidationError::impossible(format!(
                "scale {} exceeds precision {}",
                scale, precision
            )));
        }
        bounds.validate_declaration()?;
        Ok(Self {
            precision,
            scale,
            numeric: false,
            bounds,
        })
    }

    /// Unconstrained DECIMAL(precision, scale)
    pub fn plain(precision: u32, scale: u32) -> ValidationResult<Self> {
        Self::new(precision, scale, NumericBounds::none())
    }

    /// NUMERIC(precision, scale): identical semantics, rendered with the
    /// NUMERIC keyword.
    pub fn numeric(
        precision: u32,
        scale: u32,
        bounds: NumericBounds<Decimal>,
    ) -> ValidationResult<Self> {
        let mut ty = Self::new(precision, scale, bounds)?;
        ty.numeric = true;
        Ok(ty)
    }

    /// Validates a candidate strictly: excess fractional digits are rejected
    /// with `PrecisionOverflow` rather than rounded.
    pub fn validate(&self, value: &SqlValue) -> ValidationResult<SqlValue> {
        let d = self.coerce(value)?;
        let d = self.check_precision(d, false)?;
        self.check_bounds(d)?;
        Ok(SqlValue::Decimal(d))
    }

    /// Serializes to a plain fixed-format string at the declared scale
    /// (no exponent notation, trailing zeros kept: `11` at scale 2 → "11.00").
    pub fn serialize(&self, value: &SqlValue) -> ValidationResult<StorageValue> {
        match self.validate(value)? {
            SqlValue::Decimal(d) => Ok(StorageValue::Text(d.to_string())),
            other => Err(ValidationError::type_mismatch("decimal", other.type_name())),
        }
    }

    /// Decodes a stored string leniently: excess fractional digits round
    /// half-up (away from zero) to the declared scale.
    pub fn deserialize(&self, storage: &StorageValue) -> ValidationResult<SqlValue> {
        let s = match storage {
            StorageValue::Text(s) => s,
            other => return Err(ValidationError::type_mismatch("decimal", other.type_name())),
        };
        let d = self.coerce(&SqlValue::Text(s.clone()))?;
        let d = self.check_precision(d, true)?;
        self.check_bounds(d)?;
        Ok(SqlValue::Decimal(d))
    }

    /// Generates a random value at the declared scale satisfying the
    /// precision limits and all declared constraints.
    ///
    /// Samples the mantissa uniformly from the constraint-narrowed interval.
    /// When `multiple_of` is exactly representable at the scale the sample
    /// walks its progression directly; otherwise rejection sampling runs
    /// under the shared retry budget.
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<SqlValue> {
        let (lo, hi) = self.mantissa_interval()?;
        let pow = ten_pow(self.scale);

        if let Some(step) = self.bounds.multiple_of {
            if let Some(step_m) = exact_mantissa(step, pow) {
                // Constraint lattice is representable at this scale.
                let first = first_multiple_at_or_above(lo, step_m);
                let last = hi - hi.rem_euclid(step_m);
                if first > last {
                    return Err(ValidationError::impossible(format!(
                        "no multiple of {} within the valid range",
                        step
                    )));
                }
                let m = sample_i128_progression(rng, first, last, step_m);
                return Ok(SqlValue::Decimal(decimal_from_mantissa(m, self.scale)));
            }
            for _ in 0..MAX_ATTEMPTS {
                let d = decimal_from_mantissa(sample_i128(rng, lo, hi), self.scale);
                if self.bounds.check(d).is_ok() {
                    return Ok(SqlValue::Decimal(d));
                }
            }
            return Err(ValidationError::impossible(format!(
                "no value satisfying multiple_of {} found within the retry budget",
                step
            )));
        }

        let m = sample_i128(rng, lo, hi);
        Ok(SqlValue::Decimal(decimal_from_mantissa(m, self.scale)))
    }

    /// SQL rendering, e.g. `"DECIMAL(10,2) CHECK (>= 0.01)"`
    pub fn sql_type(&self) -> String {
        let keyword = if self.numeric { "NUMERIC" } else { "DECIMAL" };
        let base = format!("{}({},{})", keyword, self.precision, self.scale);
        match crate::constraint::check_clause(&self.constraints()) {
            Some(clause) => format!("{} {}", base, clause),
            None => base,
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

    fn coerce(&self, value: &SqlValue) -> ValidationResult<Decimal> {
        match value {
            SqlValue::Decimal(d) => Ok(*d),
            SqlValue::Int(n) => Ok(Decimal::from(*n)),
            SqlValue::Float(x) => {
                Decimal::try_from(*x).map_err(|_| ValidationError::type_mismatch("decimal", value))
            }
            SqlValue::Text(s) => s
                .trim()
                .parse::<Decimal>()
                .map_err(|_| ValidationError::type_mismatch("decimal", value)),
            other => Err(ValidationError::type_mismatch("decimal", other.type_name())),
        }
    }

    /// Enforces integer-digit and fractional-digit limits, returning the
    /// value rescaled to exactly `self.scale`.
    fn check_precision(&self, d: Decimal, lenient: bool) -> ValidationResult<Decimal> {
        let max_int_digits = self.precision - self.scale;
        let mut d = d;

        let frac_digits = d.normalize().scale();
        if frac_digits > self.scale {
            if !lenient {
                return Err(ValidationError::precision_overflow(
                    d,
                    format!(
                        "has {} fractional digits, DECIMAL({},{}) allows {}",
                        frac_digits, self.precision, self.scale, self.scale
                    ),
                ));
            }
            d = d.round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero);
        }

        // Integer digits are counted after any rounding: 999.995 rounded to
        // scale 2 becomes 1000.00 and must still overflow DECIMAL(5,2).
        let int_digits = integer_digit_count(d);
        if int_digits > max_int_digits {
            return Err(ValidationError::precision_overflow(
                d,
                format!(
                    "has {} integer digits, DECIMAL({},{}) allows {}",
                    int_digits, self.precision, self.scale, max_int_digits
                ),
            ));
        }

        d.rescale(self.scale);
        Ok(d)
    }

    fn check_bounds(&self, d: Decimal) -> ValidationResult<()> {
        self.bounds
            .check(d)
            .map_err(|detail| ValidationError::constraint_violation(d, detail))
    }

    /// Inclusive mantissa interval at the declared scale: the precision
    /// envelope intersected with the ordering constraints.
    fn mantissa_interval(&self) -> ValidationResult<(i128, i128)> {
        let pow = ten_pow(self.scale);
        let max_m = 10i128.pow(self.precision) - 1;
        let mut lo = -max_m;
        let mut hi = max_m;

        if let Some(b) = self.bounds.ge {
            lo = lo.max(mantissa_ceil(b, pow));
        }
        if let Some(b) = self.bounds.gt {
            lo = lo.max(mantissa_floor(b, pow) + 1);
        }
        if let Some(b) = self.bounds.le {
            hi = hi.min(mantissa_floor(b, pow));
        }
        if let Some(b) = self.bounds.lt {
            hi = hi.min(mantissa_ceil(b, pow) - 1);
        }

        if lo > hi {
            return Err(ValidationError::impossible(
                "declared bounds leave no representable values",
            ));
        }
        Ok((lo, hi))
    }
}

fn ten_pow(scale: u32) -> Decimal {
    Decimal::from_i128_with_scale(10i128.pow(scale), 0)
}

fn decimal_from_mantissa(m: i128, scale: u32) -> Decimal {
    Decimal::from_i128_with_scale(m, scale)
}

/// Digits left of the decimal point, ignoring sign; zero has none
fn integer_digit_count(d: Decimal) -> u32 {
    let mut t = d.trunc().abs();
    t.rescale(0);
    if t.is_zero() {
        0
    } else {
        t.mantissa().to_string().len() as u32
    }
}

/// Mantissa of `b` at the given scale when exactly representable
fn exact_mantissa(b: Decimal, pow: Decimal) -> Option<i128> {
    let scaled = b.checked_mul(pow)?;
    if scaled.normalize().scale() == 0 {
        scaled.trunc().to_i128()
    } else {
        None
    }
}

/// Smallest mantissa whose value is >= b. Bounds beyond the 96-bit envelope
/// saturate, which clamps them against the precision interval.
fn mantissa_ceil(b: Decimal, pow: Decimal) -> i128 {
    match b.checked_mul(pow) {
        Some(scaled) => scaled.ceil().to_i128().unwrap_or_else(|| saturate(b)),
        None => saturate(b),
    }
}

/// Largest mantissa whose value is <= b
fn mantissa_floor(b: Decimal, pow: Decimal) -> i128 {
    match b.checked_mul(pow) {
        Some(scaled) => scaled.floor().to_i128().unwrap_or_else(|| saturate(b)),
        None => saturate(b),
    }
}

fn saturate(b: Decimal) -> i128 {
    if b.is_sign_negative() {
        i128::MIN / 2
    } else {
        i128::MAX / 2
    }
}

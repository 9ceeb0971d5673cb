//! Floating-point column types
//!
//! FLOAT and DOUBLE PRECISION are plain f64 columns; REAL additionally
//! emulates single-precision storage by rejecting magnitudes an f32 cannot
//! hold. Non-finite values are gated by `allow_inf_nan`, whose default
//! differs per kind: FLOAT and DOUBLE reject them, REAL accepts them.

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, NumericBounds};
use crate::mock::MAX_ATTEMPTS;
use crate::types::errors::{ValidationError, ValidationResult};
use crate::types::value::{SqlValue, StorageValue};

/// Default half-width of the unconstrained mock span
const DEFAULT_MOCK_SPAN: f64 = 1e6;

/// Floating-point column kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatKind {
    Float,
    Double,
    Real,
}

impl FloatKind {
    /// SQL type name
    pub fn sql_name(&self) -> &'static str {
        match self {
            FloatKind::Float => "FLOAT",
            FloatKind::Double => "DOUBLE PRECISION",
            FloatKind::Real => "REAL",
        }
    }

    /// Whether non-finite values are accepted when not overridden.
    /// REAL columns historically pass infinities through; the doubles do not.
    pub fn default_allow_inf_nan(&self) -> bool {
        matches!(self, FloatKind::Real)
    }
}

/// Largest bit precision a FLOAT(p) declaration accepts
pub const MAX_FLOAT_PRECISION: u32 = 53;

/// Floating-point column type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatType {
    pub kind: FloatKind,
    pub allow_inf_nan: bool,
    /// Declared bit precision for FLOAT(p); rendering only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "NumericBounds::is_empty")]
    pub bounds: NumericBounds<f64>,
}

impl FloatType {
    /// Builds a float type with the kind's default non-finite policy.
    pub fn new(kind: FloatKind, bounds: NumericBounds<f64>) -> ValidationResult<Self> {
        bounds.validate_declaration()?;
        Ok(Self {
            kind,
            allow_inf_nan: kind.default_allow_inf_nan(),
            precision: None,
            bounds,
        })
    }

    /// Unconstrained column of the given kind
    pub fn plain(kind: FloatKind) -> Self {
        Self {
            kind,
            allow_inf_nan: kind.default_allow_inf_nan(),
            precision: None,
            bounds: NumericBounds::none(),
        }
    }

    /// FLOAT(p) with an explicit bit precision, 1..=53. The precision is a
    /// declaration detail carried into `sql_type`; values are f64 either way.
    pub fn float_with_precision(
        precision: u32,
        bounds: NumericBounds<f64>,
    ) -> ValidationResult<Self> {
        if precision == 0 || precision > MAX_FLOAT_PRECISION {
            return Err(ValidationError::impossible(format!(
                "FLOAT precision {} is outside 1..={}",
                precision, MAX_FLOAT_PRECISION
            )));
        }
        let mut ty = Self::new(FloatKind::Float, bounds)?;
        ty.precision = Some(precision);
        Ok(ty)
    }

    /// Overrides the non-finite policy
    pub fn allow_inf_nan(mut self, allow: bool) -> Self {
        self.allow_inf_nan = allow;
        self
    }

    /// Validates and normalizes a candidate value.
    ///
    /// Check order: coercion, finiteness, REAL magnitude, declared bounds.
    /// A permitted non-finite value skips the remaining checks since ordering
    /// comparisons against NaN are meaningless.
    pub fn validate(&self, value: &SqlValue) -> ValidationResult<SqlValue> {
        let x = self.coerce(value)?;
        if !x.is_finite() {
            if self.allow_inf_nan {
                return Ok(SqlValue::Float(x));
            }
            return Err(ValidationError::constraint_violation(x, "must be finite"));
        }
        if self.kind == FloatKind::Real {
            self.check_real_magnitude(x)?;
        }
        self.bounds
            .check(x)
            .map_err(|detail| ValidationError::constraint_violation(x, detail))?;
        Ok(SqlValue::Float(x))
    }

    /// Serializes a validated value to its storage form
    pub fn serialize(&self, value: &SqlValue) -> ValidationResult<StorageValue> {
        match self.validate(value)? {
            SqlValue::Float(x) => Ok(StorageValue::Float(x)),
            other => Err(ValidationError::type_mismatch("float", other.type_name())),
        }
    }

    /// Decodes a storage value back to the normalized form
    pub fn deserialize(&self, storage: &StorageValue) -> ValidationResult<SqlValue> {
        match storage {
            StorageValue::Float(x) => self.validate(&SqlValue::Float(*x)),
            StorageValue::Int(n) => self.validate(&SqlValue::Int(*n)),
            other => Err(ValidationError::type_mismatch("float", other.type_name())),
        }
    }

    /// Generates a random finite value satisfying the declared constraints.
    ///
    /// Unconstrained sides of the span default to ±1e6. Draws are continuous
    /// uniform; `multiple_of` rounds each draw to the nearest multiple and
    /// rejection keeps strict bounds honest, capped at the retry budget.
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<SqlValue> {
        let (lo, hi) = self.mock_span()?;
        for _ in 0..MAX_ATTEMPTS {
            let mut x = if lo == hi { lo } else { rng.gen_range(lo..=hi) };
            if let Some(step) = self.bounds.multiple_of {
                x = (x / step).round() * step;
                if x < lo || x > hi {
                    continue;
                }
            }
            if self.bounds.check(x).is_ok() {
                return Ok(SqlValue::Float(x));
            }
        }
        Err(ValidationError::impossible(
            "no value satisfying the declared bounds found within the retry budget",
        ))
    }

    /// SQL rendering, e.g. `"FLOAT(53)"` or `"DOUBLE PRECISION CHECK (> 0)"`
    pub fn sql_type(&self) -> String {
        let base = match (self.kind, self.precision) {
            (FloatKind::Float, Some(p)) => format!("FLOAT({})", p),
            _ => self.kind.sql_name().to_string(),
        };
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

    fn coerce(&self, value: &SqlValue) -> ValidationResult<f64> {
        match value {
            SqlValue::Float(x) => Ok(*x),
            SqlValue::Int(n) => Ok(*n as f64),
            SqlValue::Decimal(d) => d
                .to_f64()
                .ok_or_else(|| ValidationError::type_mismatch("float", value)),
            SqlValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::type_mismatch("float", value)),
            other => Err(ValidationError::type_mismatch("float", other.type_name())),
        }
    }

    /// Single-precision magnitude bounds; zero always passes.
    fn check_real_magnitude(&self, x: f64) -> ValidationResult<()> {
        let mag = x.abs();
        if mag > f32::MAX as f64 {
            return Err(ValidationError::out_of_storage_range(
                x,
                "exceeds REAL precision",
            ));
        }
        if mag > 0.0 && mag < f32::MIN_POSITIVE as f64 {
            return Err(ValidationError::out_of_storage_range(
                x,
                "too small for REAL precision",
            ));
        }
        Ok(())
    }

    /// Sampling span: declared bounds win outright; the ±1e6 default fills
    /// in only the undeclared sides. A lone bound past the opposite default
    /// shifts that side instead of emptying the span.
    fn mock_span(&self) -> ValidationResult<(f64, f64)> {
        let lower = match (self.bounds.gt, self.bounds.ge) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let upper = match (self.bounds.lt, self.bounds.le) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let (mut lo, mut hi) = match (lower, upper) {
            (Some(lo), Some(hi)) => (lo, hi),
            (Some(lo), None) => {
                let hi = if lo >= DEFAULT_MOCK_SPAN {
                    lo + 2.0 * DEFAULT_MOCK_SPAN
                } else {
                    DEFAULT_MOCK_SPAN
                };
                (lo, hi)
            }
            (None, Some(hi)) => {
                let lo = if hi <= -DEFAULT_MOCK_SPAN {
                    hi - 2.0 * DEFAULT_MOCK_SPAN
                } else {
                    -DEFAULT_MOCK_SPAN
                };
                (lo, hi)
            }
            (None, None) => (-DEFAULT_MOCK_SPAN, DEFAULT_MOCK_SPAN),
        };
        if self.kind == FloatKind::Real {
            lo = lo.max(-(f32::MAX as f64));
            hi = hi.min(f32::MAX as f64);
        }
        if lo > hi {
            return Err(ValidationError::impossible(
                "declared bounds leave no values to sample",
            ));
        }
        Ok((lo, hi))
    }
}

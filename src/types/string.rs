//! Constrained string column types
//!
//! VARCHAR(n), CHAR(n) and TEXT. Validation runs a fixed pipeline: strip
//! whitespace, apply the case transform, check prefix, check suffix, check
//! lengths. Lengths are counted in characters, not bytes.
//!
//! CHAR pads to capacity with trailing spaces when normalizing and
//! right-trims on deserialize. A value whose meaningful content ends in
//! spaces therefore does not round-trip; this is the fixed-width SQL
//! semantic, not a defect.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constraint::{CaseTransform, Constraint};
use crate::mock::alphanumeric;
use crate::types::errors::{ValidationError, ValidationResult};
use crate::types::value::{SqlValue, StorageValue};

/// Upper length for mocks of strings with no declared maximum
const DEFAULT_MOCK_MAX: usize = 40;

/// String column kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringKind {
    /// Variable length up to capacity
    Varchar,
    /// Fixed length, space padded to capacity
    Char,
    /// Unbounded unless a capacity is declared
    Text,
}

/// Declared string constraints; all optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<CaseTransform>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strip_whitespace: bool,
}

impl StringConstraints {
    /// No constraints
    pub fn none() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn starts_with(mut self, s: impl Into<String>) -> Self {
        self.starts_with = Some(s.into());
        self
    }

    pub fn ends_with(mut self, s: impl Into<String>) -> Self {
        self.ends_with = Some(s.into());
        self
    }

    pub fn case(mut self, transform: CaseTransform) -> Self {
        self.case = Some(transform);
        self
    }

    pub fn strip_whitespace(mut self) -> Self {
        self.strip_whitespace = true;
        self
    }
}

/// String column type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringType {
    pub kind: StringKind,
    /// Storage capacity in characters; required for VARCHAR and CHAR
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub constraints: StringConstraints,
}

impl StringType {
    /// Builds a string type, rejecting declarations no value can satisfy.
    pub fn new(
        kind: StringKind,
        capacity: Option<usize>,
        constraints: StringConstraints,
    ) -> ValidationResult<Self> {
        match kind {
            StringKind::Varchar | StringKind::Char => {
                let cap = capacity.ok_or_else(|| {
                    ValidationError::impossible("VARCHAR and CHAR require a capacity")
                })?;
                if cap == 0 {
                    return Err(ValidationError::impossible("capacity must be at least 1"));
                }
            }
            StringKind::Text => {}
        }

        let ty = Self {
            kind,
            capacity,
            constraints,
        };
        ty.validate_declaration()?;
        Ok(ty)
    }

    /// VARCHAR(capacity) with constraints
    pub fn varchar(capacity: usize, constraints: StringConstraints) -> ValidationResult<Self> {
        Self::new(StringKind::Varchar, Some(capacity), constraints)
    }

    /// CHAR(capacity) with constraints
    pub fn fixed_char(capacity: usize, constraints: StringConstraints) -> ValidationResult<Self> {
        Self::new(StringKind::Char, Some(capacity), constraints)
    }

    /// TEXT with constraints and no capacity
    pub fn text(constraints: StringConstraints) -> ValidationResult<Self> {
        Self::new(StringKind::Text, None, constraints)
    }

    fn validate_declaration(&self) -> ValidationResult<()> {
        let c = &self.constraints;
        let fixed_len = prefix_suffix_len(c);

        if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
            if min > max {
                return Err(ValidationError::impossible(format!(
                    "min_length {} exceeds max_length {}",
                    min, max
                )));
            }
        }
        if let Some(cap) = self.capacity {
            if c.min_length.map_or(false, |min| min > cap) {
                return Err(ValidationError::impossible(format!(
                    "min_length exceeds the capacity {}",
                    cap
                )));
            }
            if fixed_len > cap {
                return Err(ValidationError::impossible(format!(
                    "prefix and suffix need {} characters but the capacity is {}",
                    fixed_len, cap
                )));
            }
        }
        if c.max_length.map_or(false, |max| fixed_len > max) {
            return Err(ValidationError::impossible(
                "prefix and suffix together exceed max_length",
            ));
        }
        // The case transform runs before the prefix/suffix checks, so an
        // affix the transform would alter can never match.
        if let Some(transform) = c.case {
            for affix in [c.starts_with.as_deref(), c.ends_with.as_deref()].into_iter().flatten() {
                if transform.apply(affix) != affix {
                    return Err(ValidationError::impossible(format!(
                        "affix {:?} is not fixed under the declared case transform",
                        affix
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validates and normalizes a candidate value. CHAR results come back
    /// padded to capacity.
    pub fn validate(&self, value: &SqlValue) -> ValidationResult<SqlValue> {
        let s = match value {
            SqlValue::Text(s) => s.clone(),
            other => return Err(ValidationError::type_mismatch("string", other.type_name())),
        };
        let s = self.normalize(s)?;
        Ok(SqlValue::Text(s))
    }

    /// Serializes a validated value to its storage form
    pub fn serialize(&self, value: &SqlValue) -> ValidationResult<StorageValue> {
        match self.validate(value)? {
            SqlValue::Text(s) => Ok(StorageValue::Text(s)),
            other => Err(ValidationError::type_mismatch("string", other.type_name())),
        }
    }

    /// Decodes a storage value; CHAR right-trims its padding first.
    pub fn deserialize(&self, storage: &StorageValue) -> ValidationResult<SqlValue> {
        let s = match storage {
            StorageValue::Text(s) => s.as_str(),
            other => return Err(ValidationError::type_mismatch("string", other.type_name())),
        };
        let s = if self.kind == StringKind::Char {
            s.trim_end_matches(' ')
        } else {
            s
        };
        self.validate(&SqlValue::Text(s.to_string()))
    }

    /// Generates a random value: prefix, alphanumeric body, suffix, with a
    /// total length drawn from the valid range.
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<SqlValue> {
        let c = &self.constraints;
        let fixed = prefix_suffix_len(c);
        let lo = c.min_length.unwrap_or(0).max(fixed);
        let hi = match (self.capacity, c.max_length) {
            (Some(cap), Some(max)) => cap.min(max),
            (Some(cap), None) => cap,
            (None, Some(max)) => max,
            (None, None) => lo.max(DEFAULT_MOCK_MAX),
        };
        if lo > hi {
            return Err(ValidationError::impossible(
                "declared lengths leave no valid string",
            ));
        }

        let total = rng.gen_range(lo..=hi);
        let mut s = String::with_capacity(total);
        if let Some(p) = &c.starts_with {
            s.push_str(p);
        }
        s.push_str(&alphanumeric(rng, total - fixed));
        if let Some(x) = &c.ends_with {
            s.push_str(x);
        }
        if let Some(transform) = c.case {
            s = transform.apply(&s);
        }
        self.validate(&SqlValue::Text(s))
    }

    /// SQL rendering: `VARCHAR(10)`, `CHAR(5)`, `TEXT`
    pub fn sql_type(&self) -> String {
        match (self.kind, self.capacity) {
            (StringKind::Varchar, Some(cap)) => format!("VARCHAR({})", cap),
            (StringKind::Char, Some(cap)) => format!("CHAR({})", cap),
            _ => "TEXT".to_string(),
        }
    }

    /// The declared constraint set in pipeline order
    pub fn constraints(&self) -> Vec<Constraint> {
        let c = &self.constraints;
        let mut out = Vec::new();
        if c.strip_whitespace {
            out.push(Constraint::StripWhitespace);
        }
        if let Some(transform) = c.case {
            out.push(Constraint::Case { transform });
        }
        if let Some(p) = &c.starts_with {
            out.push(Constraint::Prefix { value: p.clone() });
        }
        if let Some(x) = &c.ends_with {
            out.push(Constraint::Suffix { value: x.clone() });
        }
        if let Some(n) = c.min_length {
            out.push(Constraint::MinLength { value: n });
        }
        if let Some(n) = c.max_length {
            out.push(Constraint::MaxLength { value: n });
        }
        out
    }

    /// The validation pipeline. Order matters and is part of the contract.
    fn normalize(&self, s: String) -> ValidationResult<String> {
        let c = &self.constraints;

        let mut s = if c.strip_whitespace {
            s.trim().to_string()
        } else {
            s
        };
        if let Some(transform) = c.case {
            s = transform.apply(&s);
        }
        if let Some(p) = &c.starts_with {
            if !s.starts_with(p.as_str()) {
                return Err(ValidationError::constraint_violation(
                    SqlValue::Text(s),
                    format!("must start with {:?}", p),
                ));
            }
        }
        if let Some(x) = &c.ends_with {
            if !s.ends_with(x.as_str()) {
                return Err(ValidationError::constraint_violation(
                    SqlValue::Text(s),
                    format!("must end with {:?}", x),
                ));
            }
        }

        let len = s.chars().count();
        if let Some(cap) = self.capacity {
            if len > cap {
                return Err(ValidationError::out_of_storage_range(
                    SqlValue::Text(s),
                    format!("exceeds the {} capacity", self.sql_type()),
                ));
            }
        }
        if let Some(max) = c.max_length {
            if len > max {
                return Err(ValidationError::constraint_violation(
                    SqlValue::Text(s),
                    format!("must have at most {} characters", max),
                ));
            }
        }
        if let Some(min) = c.min_length {
            if len < min {
                return Err(ValidationError::constraint_violation(
                    SqlValue::Text(s),
                    format!("must have at least {} characters", min),
                ));
            }
        }

        if self.kind == StringKind::Char {
            if let Some(cap) = self.capacity {
                while s.chars().count() < cap {
                    s.push(' ');
                }
            }
        }
        Ok(s)
    }
}

fn prefix_suffix_len(c: &StringConstraints) -> usize {
    c.starts_with.as_deref().map_or(0, |s| s.chars().count())
        + c.ends_with.as_deref().map_or(0, |s| s.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::errors::ErrorKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn text(s: &str) -> SqlValue {
        SqlValue::Text(s.to_string())
    }

    #[test]
    fn test_capacity_is_storage_range() {
        let ty = StringType::varchar(5, StringConstraints::none()).unwrap();
        assert_eq!(ty.validate(&text("hello")), Ok(text("hello")));
        let err = ty.validate(&text("hello!")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfStorageRange);
    }

    #[test]
    fn test_pipeline_order_strip_then_case_then_affixes() {
        let ty = StringType::varchar(
            20,
            StringConstraints::none()
                .strip_whitespace()
                .case(CaseTransform::Upper)
                .starts_with("ORD-"),
        )
        .unwrap();
        // Lowercase input with padding passes because strip and upper run
        // before the prefix check.
        assert_eq!(ty.validate(&text("  ord-123 ")), Ok(text("ORD-123")));
        let err = ty.validate(&text("abc")).unwrap_err();
        assert!(err.to_string().contains("must start with \"ORD-\""));
    }

    #[test]
    fn test_length_constraints() {
        let ty = StringType::varchar(
            10,
            StringConstraints::none().min_length(3).max_length(6),
        )
        .unwrap();
        assert!(ty.validate(&text("abcd")).is_ok());
        let err = ty.validate(&text("ab")).unwrap_err();
        assert!(err.to_string().contains("at least 3"));
        let err = ty.validate(&text("abcdefg")).unwrap_err();
        assert!(err.to_string().contains("at most 6"));
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let ty = StringType::varchar(3, StringConstraints::none()).unwrap();
        assert!(ty.validate(&text("héllo")).is_err());
        assert!(ty.validate(&text("héo")).is_ok());
    }

    #[test]
    fn test_char_pads_and_rtrims() {
        let ty = StringType::fixed_char(5, StringConstraints::none()).unwrap();
        assert_eq!(ty.validate(&text("ab")), Ok(text("ab   ")));
        let stored = ty.serialize(&text("ab")).unwrap();
        assert_eq!(stored, StorageValue::Text("ab   ".into()));
        assert_eq!(ty.deserialize(&stored).unwrap(), text("ab   "));
    }

    #[test]
    fn test_impossible_declarations() {
        let err = StringType::varchar(
            5,
            StringConstraints::none().starts_with("ORD-").ends_with("-XX"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImpossibleConstraintSet);

        let err = StringType::varchar(
            10,
            StringConstraints::none().min_length(5).max_length(2),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImpossibleConstraintSet);

        // Uppercase transform makes a lowercase prefix unmatchable.
        let err = StringType::varchar(
            10,
            StringConstraints::none()
                .case(CaseTransform::Upper)
                .starts_with("ord-"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImpossibleConstraintSet);

        assert!(StringType::varchar(0, StringConstraints::none()).is_err());
        assert!(StringType::new(StringKind::Varchar, None, StringConstraints::none()).is_err());
    }

    #[test]
    fn test_mock_affixes_and_length() {
        let ty = StringType::varchar(
            10,
            StringConstraints::none().starts_with("ORD-").ends_with("-X"),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(61);
        for _ in 0..500 {
            let SqlValue::Text(s) = ty.mock(&mut rng).unwrap() else {
                panic!("string mock must produce Text");
            };
            assert!(s.starts_with("ORD-"));
            assert!(s.ends_with("-X"));
            assert!(s.chars().count() <= 10);
        }
    }

    #[test]
    fn test_mock_char_is_padded() {
        let ty = StringType::fixed_char(8, StringConstraints::none()).unwrap();
        let mut rng = StdRng::seed_from_u64(67);
        for _ in 0..100 {
            let SqlValue::Text(s) = ty.mock(&mut rng).unwrap() else {
                panic!("string mock must produce Text");
            };
            assert_eq!(s.chars().count(), 8);
        }
    }

    #[test]
    fn test_mock_case_transform() {
        let ty = StringType::varchar(
            12,
            StringConstraints::none().case(CaseTransform::Lower).min_length(4),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(71);
        for _ in 0..100 {
            let SqlValue::Text(s) = ty.mock(&mut rng).unwrap() else {
                panic!("string mock must produce Text");
            };
            assert_eq!(s, s.to_lowercase());
            assert!(s.chars().count() >= 4);
        }
    }

    #[test]
    fn test_text_without_capacity() {
        let ty = StringType::text(StringConstraints::none().min_length(1)).unwrap();
        assert!(ty.validate(&text(&"x".repeat(10_000))).is_ok());
        assert_eq!(ty.sql_type(), "TEXT");
    }

    #[test]
    fn test_sql_type_rendering() {
        assert_eq!(
            StringType::varchar(10, StringConstraints::none()).unwrap().sql_type(),
            "VARCHAR(10)"
        );
        assert_eq!(
            StringType::fixed_char(5, StringConstraints::none()).unwrap().sql_type(),
            "CHAR(5)"
        );
    }
}

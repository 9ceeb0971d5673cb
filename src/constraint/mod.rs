//! Declared constraints over scalar column types
//!
//! A constraint only ever narrows the native storage range of a type, never
//! widens it. The `Constraint` enum is the declaration-level description used
//! for introspection and `CHECK` clause synthesis; the generic
//! [`NumericBounds`] carries the ordering/multiple-of constraints that the
//! numeric types evaluate and that `mock` narrows into an effective domain.

mod bounds;

pub use bounds::{BoundValue, NumericBounds};

use serde::{Deserialize, Serialize};

use crate::types::SqlValue;

/// Case transform applied to string values before other checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseTransform {
    Lower,
    Upper,
}

impl CaseTransform {
    /// Applies the transform to a string
    pub fn apply(&self, s: &str) -> String {
        match self {
            CaseTransform::Lower => s.to_lowercase(),
            CaseTransform::Upper => s.to_uppercase(),
        }
    }
}

/// A single declared constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "constraint", rename_all = "snake_case")]
pub enum Constraint {
    GreaterThan { value: SqlValue },
    GreaterOrEqual { value: SqlValue },
    LessThan { value: SqlValue },
    LessOrEqual { value: SqlValue },
    MultipleOf { value: SqlValue },
    MinLength { value: usize },
    MaxLength { value: usize },
    Prefix { value: String },
    Suffix { value: String },
    Case { transform: CaseTransform },
    StripWhitespace,
}

impl Constraint {
    /// Returns the SQL `CHECK` fragment for this constraint, if it has one.
    ///
    /// Only numeric ordering and multiple-of constraints contribute to the
    /// synthesized clause; string transforms and length bounds are carried in
    /// the type itself.
    pub fn check_fragment(&self) -> Option<String> {
        match self {
            Constraint::GreaterThan { value } => Some(format!("> {}", value)),
            Constraint::GreaterOrEqual { value } => Some(format!(">= {}", value)),
            Constraint::LessThan { value } => Some(format!("< {}", value)),
            Constraint::LessOrEqual { value } => Some(format!("<= {}", value)),
            Constraint::MultipleOf { value } => Some(format!("% {} = 0", value)),
            _ => None,
        }
    }
}

/// Synthesizes a `CHECK (...)` clause from the declared constraints.
///
/// Returns `None` when no constraint contributes a fragment, so plain types
/// render as their bare SQL name.
pub fn check_clause(constraints: &[Constraint]) -> Option<String> {
    let fragments: Vec<String> = constraints.iter().filter_map(|c| c.check_fragment()).collect();
    if fragments.is_empty() {
        None
    } else {
        Some(format!("CHECK ({})", fragments.join(" AND ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_fragments() {
        let c = Constraint::GreaterOrEqual {
            value: SqlValue::Int(0),
        };
        assert_eq!(c.check_fragment().as_deref(), Some(">= 0"));

        let c = Constraint::MultipleOf {
            value: SqlValue::Int(5),
        };
        assert_eq!(c.check_fragment().as_deref(), Some("% 5 = 0"));

        let c = Constraint::Prefix {
            value: "ORD-".into(),
        };
        assert_eq!(c.check_fragment(), None);
    }

    #[test]
    fn test_check_clause_joins_with_and() {
        let constraints = vec![
            Constraint::GreaterOrEqual {
                value: SqlValue::Int(0),
            },
            Constraint::LessOrEqual {
                value: SqlValue::Int(100),
            },
            Constraint::MultipleOf {
                value: SqlValue::Int(10),
            },
        ];
        assert_eq!(
            check_clause(&constraints).as_deref(),
            Some("CHECK (>= 0 AND <= 100 AND % 10 = 0)")
        );
    }

    #[test]
    fn test_check_clause_empty() {
        assert_eq!(check_clause(&[]), None);
        assert_eq!(check_clause(&[Constraint::StripWhitespace]), None);
    }

    #[test]
    fn test_case_transform_apply() {
        assert_eq!(CaseTransform::Upper.apply("hello"), "HELLO");
        assert_eq!(CaseTransform::Lower.apply("HELLO"), "hello");
    }
}

//! Boolean column type
//!
//! Accepts native bools, the integers 0/1, and the usual textual spellings,
//! case-insensitively. Serializes natively; mock is a fair coin.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::errors::{ValidationError, ValidationResult};
use crate::types::value::{SqlValue, StorageValue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanType;

impl BooleanType {
    pub fn new() -> Self {
        Self
    }

    /// Validates and normalizes a candidate value
    pub fn validate(&self, value: &SqlValue) -> ValidationResult<SqlValue> {
        let b = match value {
            SqlValue::Bool(b) => *b,
            SqlValue::Int(0) => false,
            SqlValue::Int(1) => true,
            SqlValue::Int(_) => {
                return Err(ValidationError::type_mismatch("boolean", value));
            }
            SqlValue::Text(s) => parse_bool(s)
                .ok_or_else(|| ValidationError::type_mismatch("boolean", value))?,
            other => return Err(ValidationError::type_mismatch("boolean", other.type_name())),
        };
        Ok(SqlValue::Bool(b))
    }

    /// Serializes a validated value to its storage form
    pub fn serialize(&self, value: &SqlValue) -> ValidationResult<StorageValue> {
        match self.validate(value)? {
            SqlValue::Bool(b) => Ok(StorageValue::Bool(b)),
            other => Err(ValidationError::type_mismatch("boolean", other.type_name())),
        }
    }

    /// Decodes a storage value back to the normalized form
    pub fn deserialize(&self, storage: &StorageValue) -> ValidationResult<SqlValue> {
        match storage {
            StorageValue::Bool(b) => Ok(SqlValue::Bool(*b)),
            other => Err(ValidationError::type_mismatch("boolean", other.type_name())),
        }
    }

    /// Fair coin
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<SqlValue> {
        Ok(SqlValue::Bool(rng.gen_bool(0.5)))
    }

    pub fn sql_type(&self) -> String {
        "BOOLEAN".to_string()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

//! Binary column types
//!
//! BINARY(n) is fixed width and NUL padded, VARBINARY(n) is bounded, BLOB
//! takes an optional maximum. Candidates may be raw bytes, UTF-8 strings, or
//! `0x`-prefixed hex strings.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::mock;
use crate::types::errors::{ValidationError, ValidationResult};
use crate::types::value::{decode_hex, SqlValue, StorageValue};

/// Upper length for BLOB mocks with no declared maximum
const DEFAULT_MOCK_MAX: usize = 64;

/// Binary column kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryKind {
    /// Fixed width, NUL padded to capacity
    Binary,
    /// Variable width up to capacity
    Varbinary,
    /// Unbounded unless a capacity is declared
    Blob,
}

/// Binary column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryType {
    pub kind: BinaryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl BinaryType {
    pub fn new(kind: BinaryKind, capacity: Option<usize>) -> ValidationResult<Self> {
        match kind {
            BinaryKind::Binary | BinaryKind::Varbinary => {
                let cap = capacity.ok_or_else(|| {
                    ValidationError::impossible("BINARY and VARBINARY require a capacity")
                })?;
                if cap == 0 {
                    return Err(ValidationError::impossible("capacity must be at least 1"));
                }
            }
            BinaryKind::Blob => {}
        }
        Ok(Self { kind, capacity })
    }

    pub fn binary(capacity: usize) -> ValidationResult<Self> {
        Self::new(BinaryKind::Binary, Some(capacity))
    }

    pub fn varbinary(capacity: usize) -> ValidationResult<Self> {
        Self::new(BinaryKind::Varbinary, Some(capacity))
    }

    pub fn blob(capacity: Option<usize>) -> ValidationResult<Self> {
        Self::new(BinaryKind::Blob, capacity)
    }

    /// Validates and normalizes a candidate. BINARY results come back padded
    /// with NUL bytes to capacity.
    pub fn validate(&self, value: &SqlValue) -> ValidationResult<SqlValue> {
        let bytes = self.coerce(value)?;
        if let Some(cap) = self.capacity {
            if bytes.len() > cap {
                return Err(ValidationError::constraint_violation(
                    value,
                    format!("has {} bytes, {} allows {}", bytes.len(), self.sql_type(), cap),
                ));
            }
        }
        let mut bytes = bytes;
        if self.kind == BinaryKind::Binary {
            if let Some(cap) = self.capacity {
                bytes.resize(cap, 0);
            }
        }
        Ok(SqlValue::Bytes(bytes))
    }

    /// Serializes a validated value to raw bytes
    pub fn serialize(&self, value: &SqlValue) -> ValidationResult<StorageValue> {
        match self.validate(value)? {
            SqlValue::Bytes(b) => Ok(StorageValue::Bytes(b)),
            other => Err(ValidationError::type_mismatch("bytes", other.type_name())),
        }
    }

    /// Decodes a storage value back to the normalized form
    pub fn deserialize(&self, storage: &StorageValue) -> ValidationResult<SqlValue> {
        match storage {
            StorageValue::Bytes(b) => self.validate(&SqlValue::Bytes(b.clone())),
            other => Err(ValidationError::type_mismatch("bytes", other.type_name())),
        }
    }

    /// Random bytes of a valid length
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<SqlValue> {
        let len = match (self.kind, self.capacity) {
            (BinaryKind::Binary, Some(cap)) => cap,
            (_, Some(cap)) => rng.gen_range(0..=cap),
            (_, None) => rng.gen_range(0..=DEFAULT_MOCK_MAX),
        };
        Ok(SqlValue::Bytes(mock::bytes(rng, len)))
    }

    /// SQL rendering: `BINARY(16)`, `VARBINARY(255)`, `BLOB`
    pub fn sql_type(&self) -> String {
        match (self.kind, self.capacity) {
            (BinaryKind::Binary, Some(cap)) => format!("BINARY({})", cap),
            (BinaryKind::Varbinary, Some(cap)) => format!("VARBINARY({})", cap),
            (BinaryKind::Blob, Some(cap)) => format!("BLOB({})", cap),
            _ => "BLOB".to_string(),
        }
    }

    fn coerce(&self, value: &SqlValue) -> ValidationResult<Vec<u8>> {
        match value {
            SqlValue::Bytes(b) => Ok(b.clone()),
            SqlValue::Text(s) => {
                if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                    return decode_hex(hex)
                        .ok_or_else(|| ValidationError::type_mismatch("bytes", value));
                }
                Ok(s.as_bytes().to_vec())
            }
            other => Err(ValidationError::type_mismatch("bytes", other.type_name())),
        }
    }
}

//! Column type dispatch
//!
//! `ColumnType` is the single entry point callers hold: a tagged enum over
//! every scalar descriptor, forwarding the five operations. The per-type
//! modules own the semantics; this module owns nothing but the fan-out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::types::binary::BinaryType;
use crate::types::boolean::BooleanType;
use crate::types::decimal::DecimalType;
use crate::types::errors::ValidationResult;
use crate::types::float::FloatType;
use crate::types::integer::IntegerType;
use crate::types::string::StringType;
use crate::types::temporal::TemporalType;
use crate::types::value::{SqlValue, StorageValue};

/// Any scalar column type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnType {
    Integer(IntegerType),
    Decimal(DecimalType),
    Float(FloatType),
    String(StringType),
    Boolean(BooleanType),
    Binary(BinaryType),
    Temporal(TemporalType),
}

impl ColumnType {
    /// Validates a candidate and returns its normalized form.
    ///
    /// Check order everywhere: coercion (TypeMismatch), storage bounds
    /// (OutOfStorageRange), declared constraints (ConstraintViolation or
    /// PrecisionOverflow), first failure wins.
    pub fn validate(&self, value: &SqlValue) -> ValidationResult<SqlValue> {
        match self {
            ColumnType::Integer(t) => t.validate(value),
            ColumnType::Decimal(t) => t.validate(value),
            ColumnType::Float(t) => t.validate(value),
            ColumnType::String(t) => t.validate(value),
            ColumnType::Boolean(t) => t.validate(value),
            ColumnType::Binary(t) => t.validate(value),
            ColumnType::Temporal(t) => t.validate(value),
        }
    }

    /// Validates, then encodes to the storage representation.
    pub fn serialize(&self, value: &SqlValue) -> ValidationResult<StorageValue> {
        match self {
            ColumnType::Integer(t) => t.serialize(value),
            ColumnType::Decimal(t) => t.serialize(value),
            ColumnType::Float(t) => t.serialize(value),
            ColumnType::String(t) => t.serialize(value),
            ColumnType::Boolean(t) => t.serialize(value),
            ColumnType::Binary(t) => t.serialize(value),
            ColumnType::Temporal(t) => t.serialize(value),
        }
    }

    /// Decodes a storage value, re-validating on the way in. Decimal decoding
    /// is lenient about excess fractional digits; everything else applies the
    /// same checks as `validate`.
    pub fn deserialize(&self, storage: &StorageValue) -> ValidationResult<SqlValue> {
        match self {
            ColumnType::Integer(t) => t.deserialize(storage),
            ColumnType::Decimal(t) => t.deserialize(storage),
            ColumnType::Float(t) => t.deserialize(storage),
            ColumnType::String(t) => t.deserialize(storage),
            ColumnType::Boolean(t) => t.deserialize(storage),
            ColumnType::Binary(t) => t.deserialize(storage),
            ColumnType::Temporal(t) => t.deserialize(storage),
        }
    }

    /// Generates a random value satisfying every declared constraint.
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<SqlValue> {
        match self {
            ColumnType::Integer(t) => t.mock(rng),
            ColumnType::Decimal(t) => t.mock(rng),
            ColumnType::Float(t) => t.mock(rng),
            ColumnType::String(t) => t.mock(rng),
            ColumnType::Boolean(t) => t.mock(rng),
            ColumnType::Binary(t) => t.mock(rng),
            ColumnType::Temporal(t) => t.mock(rng),
        }
    }

    /// SQL rendering with a synthesized CHECK clause where constraints apply
    pub fn sql_type(&self) -> String {
        match self {
            ColumnType::Integer(t) => t.sql_type(),
            ColumnType::Decimal(t) => t.sql_type(),
            ColumnType::Float(t) => t.sql_type(),
            ColumnType::String(t) => t.sql_type(),
            ColumnType::Boolean(t) => t.sql_type(),
            ColumnType::Binary(t) => t.sql_type(),
            ColumnType::Temporal(t) => t.sql_type(),
        }
    }

    /// The declared constraint set, empty for types without any
    pub fn constraints(&self) -> Vec<Constraint> {
        match self {
            ColumnType::Integer(t) => t.constraints(),
            ColumnType::Decimal(t) => t.constraints(),
            ColumnType::Float(t) => t.constraints(),
            ColumnType::String(t) => t.constraints(),
            ColumnType::Boolean(_) | ColumnType::Binary(_) | ColumnType::Temporal(_) => Vec::new(),
        }
    }
}

impl From<IntegerType> for ColumnType {
    fn from(t: IntegerType) -> Self {
        ColumnType::Integer(t)
    }
}

impl From<DecimalType> for ColumnType {
    fn from(t: DecimalType) -> Self {
        ColumnType::Decimal(t)
    }
}

impl From<FloatType> for ColumnType {
    fn from(t: FloatType) -> Self {
        ColumnType::Float(t)
    }
}

impl From<StringType> for ColumnType {
    fn from(t: StringType) -> Self {
        ColumnType::String(t)
    }
}

impl From<BooleanType> for ColumnType {
    fn from(t: BooleanType) -> Self {
        ColumnType::Boolean(t)
    }
}

impl From<BinaryType> for ColumnType {
    fn from(t: BinaryType) -> Self {
        ColumnType::Binary(t)
    }
}

impl From<TemporalType> for ColumnType {
    fn from(t: TemporalType) -> Self {
        ColumnType::Temporal(t)
    }
}

//! coltype - Typed, constrained SQL scalar column types
//!
//! Validation, storage encoding and constraint-satisfying mock generation
//! for fixed-width SQL column types.

pub mod codec;
pub mod constraint;
pub mod field;
pub mod mock;
pub mod types;

pub use codec::{CodecError, JsonCodec, ValueCodec};
pub use constraint::{check_clause, CaseTransform, Constraint, NumericBounds};
pub use field::FieldSpec;
pub use types::{
    BinaryKind, BinaryType, BooleanType, ColumnType, DecimalType, ErrorKind, FloatKind, FloatType,
    IntWidth, IntegerType, SqlValue, StorageValue, StringConstraints, StringKind, StringType,
    TemporalKind, TemporalType, ValidationError, ValidationResult,
};

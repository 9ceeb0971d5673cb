//! Scalar SQL column types
//!
//! Each type descriptor is immutable once constructed and offers the same
//! five operations: `validate`, `serialize`, `deserialize`, `mock` and
//! `sql_type`. [`ColumnType`] dispatches over all of them.

mod binary;
mod boolean;
mod column;
mod decimal;
pub mod errors;
mod float;
mod integer;
mod string;
mod temporal;
mod value;

pub use binary::{BinaryKind, BinaryType};
pub use boolean::BooleanType;
pub use column::ColumnType;
pub use decimal::{DecimalType, MAX_PRECISION};
pub use errors::{ErrorKind, ValidationError, ValidationResult};
pub use float::{FloatKind, FloatType, MAX_FLOAT_PRECISION};
pub use integer::{IntWidth, IntegerType};
pub use string::{StringConstraints, StringKind, StringType};
pub use temporal::{TemporalKind, TemporalType, DEFAULT_PRECISION};
pub use value::{decode_hex, encode_hex, SqlValue, StorageValue};

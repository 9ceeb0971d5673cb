//! Field declarations
//!
//! A `FieldSpec` binds a name and nullability to a column type. Missing
//! values pass validation only when the field is nullable; everything else
//! defers to the column type.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{ColumnType, SqlValue, StorageValue, ValidationError, ValidationResult};

/// Probability that a nullable field mocks to NULL
const NULL_RATE: f64 = 0.1;

/// A named, typed, possibly nullable field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub column: ColumnType,
    #[serde(default)]
    pub nullable: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, column: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Validates a possibly missing value
    pub fn validate(&self, value: Option<&SqlValue>) -> ValidationResult<Option<SqlValue>> {
        match value {
            Some(v) => Ok(Some(self.column.validate(v)?)),
            None if self.nullable => Ok(None),
            None => Err(ValidationError::type_mismatch(
                "non-null value",
                format!("NULL for field {:?}", self.name),
            )),
        }
    }

    /// Serializes a possibly missing value
    pub fn serialize(&self, value: Option<&SqlValue>) -> ValidationResult<Option<StorageValue>> {
        match self.validate(value)? {
            Some(v) => Ok(Some(self.column.serialize(&v)?)),
            None => Ok(None),
        }
    }

    /// Decodes a possibly missing storage value
    pub fn deserialize(
        &self,
        storage: Option<&StorageValue>,
    ) -> ValidationResult<Option<SqlValue>> {
        match storage {
            Some(s) => Ok(Some(self.column.deserialize(s)?)),
            None if self.nullable => Ok(None),
            None => Err(ValidationError::type_mismatch(
                "non-null value",
                format!("NULL for field {:?}", self.name),
            )),
        }
    }

    /// Generates a value; nullable fields occasionally produce NULL
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<Option<SqlValue>> {
        if self.nullable && rng.gen_bool(NULL_RATE) {
            return Ok(None);
        }
        Ok(Some(self.column.mock(rng)?))
    }

    /// SQL column declaration, e.g. `"price DECIMAL(10,2) NOT NULL"`
    pub fn sql_declaration(&self) -> String {
        let nullability = if self.nullable { "" } else { " NOT NULL" };
        format!("{} {}{}", self.name, self.column.sql_type(), nullability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::NumericBounds;
    use crate::types::{DecimalType, ErrorKind, IntWidth, IntegerType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_null_handling() {
        let required = FieldSpec::new("qty", IntegerType::plain(IntWidth::Integer));
        assert_eq!(
            required.validate(None).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );

        let optional = FieldSpec::new("note", IntegerType::plain(IntWidth::Integer)).nullable();
        assert_eq!(optional.validate(None), Ok(None));
        assert_eq!(
            optional.validate(Some(&SqlValue::Int(5))),
            Ok(Some(SqlValue::Int(5)))
        );
    }

    #[test]
    fn test_nullable_mock_produces_nulls() {
        let field = FieldSpec::new("note", IntegerType::plain(IntWidth::Integer)).nullable();
        let mut rng = StdRng::seed_from_u64(103);
        let nulls = (0..1000)
            .filter(|_| field.mock(&mut rng).unwrap().is_none())
            .count();
        assert!(nulls > 0 && nulls < 1000);
    }

    #[test]
    fn test_sql_declaration() {
        let field = FieldSpec::new(
            "price",
            DecimalType::new(10, 2, NumericBounds::none().ge(0.into())).unwrap(),
        );
        assert_eq!(
            field.sql_declaration(),
            "price DECIMAL(10,2) CHECK (>= 0) NOT NULL"
        );
        let field = FieldSpec::new("note", IntegerType::plain(IntWidth::BigInt)).nullable();
        assert_eq!(field.sql_declaration(), "note BIGINT");
    }
}

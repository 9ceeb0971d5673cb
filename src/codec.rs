//! Storage value codecs
//!
//! A `ValueCodec` converts the storage representation to and from an
//! external encoding. Callers pick one codec at setup and hold it for the
//! lifetime of the schema; the in-tree [`JsonCodec`] covers the common case.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::types::StorageValue;

/// Codec failure, independent of the concrete encoding
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Conversion between storage values and an external representation
pub trait ValueCodec {
    type Encoded;

    fn encode(&self, value: &StorageValue) -> Result<Self::Encoded, CodecError>;
    fn decode(&self, encoded: &Self::Encoded) -> Result<StorageValue, CodecError>;
}

/// serde_json-backed codec using the tagged `StorageValue` representation
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    type Encoded = JsonValue;

    fn encode(&self, value: &StorageValue) -> Result<JsonValue, CodecError> {
        serde_json::to_value(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, encoded: &JsonValue) -> Result<StorageValue, CodecError> {
        serde_json::from_value(encoded.clone()).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

//! Error types for schema parsing and the binary codec

use thiserror::Error;

/// Errors that can occur while parsing a schema document
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Invalid schema format
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    /// Unsupported or unknown type kind
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
    /// Schema document is not valid JSON
    #[error("Parse error: {0}")]
    ParseError(String),
    /// A named reference does not resolve against the registry
    #[error("Missing name: {0}")]
    MissingName(String),
    /// A fully qualified name was registered twice
    #[error("Duplicate name: {0}")]
    DuplicateName(String),
    /// A field default does not validate against the field type
    #[error("Invalid default for field '{field}': {reason}")]
    InvalidDefault { field: String, reason: String },
}

/// Errors that can occur while encoding a value
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Value does not conform to the type being encoded
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// Wrapped-union value names a branch the union does not have
    #[error("No such union branch: {0}")]
    NoSuchBranch(String),
    /// Enum value is not one of the declared symbols
    #[error("Invalid enum value: {0}")]
    InvalidSymbol(String),
    /// A named reference does not resolve against the registry
    #[error("Unresolved named type: {0}")]
    UnresolvedName(String),
}

/// Errors that can occur while decoding binary data
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Invalid Avro data
    #[error("Invalid data: {0}")]
    InvalidData(String),
    /// Unexpected end of data
    #[error("Unexpected end of data")]
    UnexpectedEof,
    /// Invalid varint encoding
    #[error("Invalid varint encoding")]
    InvalidVarint,
    /// String is not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Top-level error type aggregating every failure mode of the crate
#[derive(Debug, Error)]
pub enum AvroError {
    /// Schema error
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    /// Encode error
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
    /// Decode error
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

//! Top-level codec: schema-driven encode, decode, validate, and sample
//! generation.
//!
//! [`AvroType`] wraps a parsed schema node together with its named-type
//! registry. Type objects are immutable and cheap to clone; every encode
//! and decode call runs on its own cursor.

mod decode;
mod encode;
mod random;
mod validate;
pub mod varint;

pub use decode::{
    decode_array, decode_boolean, decode_bytes, decode_double, decode_enum, decode_fixed,
    decode_float, decode_int, decode_long, decode_map, decode_null, decode_record, decode_string,
    decode_union, decode_value,
};
pub use encode::{encode_value, WriteCursor};
pub use random::random_value;
pub use validate::validate_value;

use std::sync::Arc;

use rand::Rng;
use serde_json::Value as Json;

use crate::error::{DecodeError, EncodeError, SchemaError};
use crate::schema::{AvroSchema, SchemaParser, SchemaRegistry};
use crate::value::Value;

/// Default initial encode buffer capacity, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Options for [`parse_schema_with_options`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Enclosing namespace for unqualified names.
    pub namespace: Option<String>,
    /// Registry of already-declared named types, so references from a
    /// previous parse resolve.
    pub registry: Option<SchemaRegistry>,
    /// Parse unions as unwrapped (bare in-memory values).
    pub unwrap_unions: bool,
}

/// Options for [`AvroType::encode_with_options`].
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Initial buffer capacity in bytes. The buffer grows at most once: an
    /// overflowed pass measures the exact required size and the write is
    /// retried.
    pub size: usize,
    /// Skip the up-front validation pass. The write path still fails where
    /// the wire cannot express the value, but an unchecked encode can
    /// produce bytes that do not round-trip.
    pub unchecked: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_BUFFER_SIZE,
            unchecked: false,
        }
    }
}

/// A reusable type object for one Avro schema.
///
/// Created by [`parse_schema`] (or [`AvroType::new`] for programmatically
/// built schemas). Immutable after construction and safe to share across
/// threads.
#[derive(Debug, Clone)]
pub struct AvroType {
    schema: AvroSchema,
    registry: Arc<SchemaRegistry>,
}

impl AvroType {
    /// Build a type object from a programmatically constructed schema,
    /// collecting every named type it contains into the registry.
    pub fn new(schema: AvroSchema) -> Self {
        let registry = SchemaRegistry::collect_from(&schema);
        Self {
            schema,
            registry: Arc::new(registry),
        }
    }

    /// Assemble a type object from a parsed schema node and the registry
    /// it was parsed against.
    pub fn from_parts(schema: AvroSchema, registry: SchemaRegistry) -> Self {
        Self {
            schema,
            registry: Arc::new(registry),
        }
    }

    /// The schema node this type wraps.
    pub fn schema(&self) -> &AvroSchema {
        &self.schema
    }

    /// The registry of named types this type resolves against.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The Avro kind string of this type, resolved through the registry.
    pub fn type_name(&self) -> &'static str {
        self.registry
            .resolve(&self.schema)
            .unwrap_or(&self.schema)
            .type_name()
    }

    /// Does the value conform to this type?
    pub fn validate(&self, value: &Value) -> bool {
        validate_value(&self.schema, value, &self.registry)
    }

    /// Encode a value to Avro binary with default options.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.encode_with_options(value, &EncodeOptions::default())
    }

    /// Encode a value to Avro binary.
    ///
    /// Unless `unchecked` is set, the value is validated first and an
    /// invalid value fails before any bytes are produced. The write runs
    /// on a buffer of `size` bytes; on overflow the pass has measured the
    /// exact required size and the write is retried once.
    pub fn encode_with_options(
        &self,
        value: &Value,
        options: &EncodeOptions,
    ) -> Result<Vec<u8>, EncodeError> {
        if !options.unchecked && !self.validate(value) {
            return Err(EncodeError::InvalidValue(format!(
                "value does not conform to {} schema",
                self.type_name()
            )));
        }

        let mut cursor = WriteCursor::new(options.size);
        encode_value(&mut cursor, &self.schema, value, &self.registry)?;

        if !cursor.is_valid() {
            let required = cursor.position();
            cursor = WriteCursor::new(required);
            encode_value(&mut cursor, &self.schema, value, &self.registry)?;
        }

        Ok(cursor.into_bytes())
    }

    /// Decode Avro binary data into a value.
    ///
    /// A truncated buffer fails with [`DecodeError::UnexpectedEof`];
    /// trailing bytes after the value are left unread.
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        let mut cursor = data;
        decode_value(&mut cursor, &self.schema, &self.registry)
    }

    /// Generate a structurally valid random value for this type.
    pub fn random(&self) -> Value {
        self.random_with_rng(&mut rand::thread_rng())
    }

    /// Generate a random value using the given RNG.
    pub fn random_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Value {
        random_value(&self.schema, &self.registry, rng)
    }
}

/// Parse an Avro schema document into a type object.
///
/// # Example
/// ```
/// use avrotype::{parse_schema, Value};
///
/// let ty = parse_schema(r#""int""#).unwrap();
/// let bytes = ty.encode(&Value::Int(64)).unwrap();
/// assert_eq!(bytes, [0x80, 0x01]);
/// assert_eq!(ty.decode(&bytes).unwrap(), Value::Int(64));
/// ```
pub fn parse_schema(json: &str) -> Result<AvroType, SchemaError> {
    parse_schema_with_options(json, ParseOptions::default())
}

/// Parse an Avro schema document with options.
pub fn parse_schema_with_options(
    json: &str,
    options: ParseOptions,
) -> Result<AvroType, SchemaError> {
    let value: Json = serde_json::from_str(json)
        .map_err(|e| SchemaError::ParseError(format!("Invalid JSON: {}", e)))?;

    let mut parser = SchemaParser::new().with_unwrapped_unions(options.unwrap_unions);
    if let Some(namespace) = options.namespace {
        parser = parser.with_namespace(namespace);
    }
    if let Some(registry) = options.registry {
        parser = parser.with_registry(registry);
    }

    let schema = parser.parse(&value)?;
    Ok(AvroType::from_parts(schema, parser.into_registry()))
}

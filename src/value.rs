//! In-memory representation of Avro values.
//!
//! Values are tagged variants parallel to the schema kinds. Enum values are
//! their symbol string, fixed values are byte sequences, and wrapped-union
//! values carry their branch discriminator name; the null branch of a union
//! is represented by `Value::Null` directly.

use serde_json::Value as Json;

use crate::error::SchemaError;
use crate::schema::{AvroSchema, SchemaRegistry};

/// A decoded or to-be-encoded Avro value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// Byte array (also the value form of `fixed` types)
    Bytes(Vec<u8>),
    /// UTF-8 string (also the value form of `enum` symbols)
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Map with string keys, in insertion order
    Map(Vec<(String, Value)>),
    /// Record fields in declaration order
    Record(Vec<(String, Value)>),
    /// Wrapped-union value: branch discriminator name and inner value
    Union(String, Box<Value>),
}

impl Value {
    /// Whether this is the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Convert a JSON document to a [`Value`] conforming to the given schema.
///
/// This is how record field defaults are materialized: the JSON default
/// stored in the schema document becomes a value of the field type. Per the
/// Avro rules, a default for a union field is interpreted against the FIRST
/// branch only, and a default for `bytes` or `fixed` reads the JSON string
/// as raw code points (one byte per character, rejecting any above 0xFF).
pub fn json_to_value(
    json: &Json,
    schema: &AvroSchema,
    registry: &SchemaRegistry,
) -> Result<Value, SchemaError> {
    json_to_value_at(json, schema, registry, 0)
}

// A self-referential record default can feed its own document back into
// itself through a missing field, so the nesting depth must be bounded.
const MAX_DEFAULT_DEPTH: usize = 64;

fn json_to_value_at(
    json: &Json,
    schema: &AvroSchema,
    registry: &SchemaRegistry,
    depth: usize,
) -> Result<Value, SchemaError> {
    if depth > MAX_DEFAULT_DEPTH {
        return Err(SchemaError::InvalidSchema(
            "default document nests too deeply".to_string(),
        ));
    }

    match (json, schema) {
        (Json::Null, AvroSchema::Null) => Ok(Value::Null),

        (Json::Bool(b), AvroSchema::Boolean) => Ok(Value::Boolean(*b)),

        (Json::Number(n), AvroSchema::Int) => {
            let v = n
                .as_i64()
                .filter(|v| (i32::MIN as i64..=i32::MAX as i64).contains(v))
                .ok_or_else(|| {
                    SchemaError::InvalidSchema(format!("cannot convert {} to int", n))
                })?;
            Ok(Value::Int(v as i32))
        }
        (Json::Number(n), AvroSchema::Long) => {
            let v = n.as_i64().ok_or_else(|| {
                SchemaError::InvalidSchema(format!("cannot convert {} to long", n))
            })?;
            Ok(Value::Long(v))
        }
        (Json::Number(n), AvroSchema::Float) => {
            let v = n.as_f64().ok_or_else(|| {
                SchemaError::InvalidSchema(format!("cannot convert {} to float", n))
            })?;
            Ok(Value::Float(v as f32))
        }
        (Json::Number(n), AvroSchema::Double) => {
            let v = n.as_f64().ok_or_else(|| {
                SchemaError::InvalidSchema(format!("cannot convert {} to double", n))
            })?;
            Ok(Value::Double(v))
        }

        (Json::String(s), AvroSchema::String) => Ok(Value::String(s.clone())),

        // Bytes and fixed defaults are strings of raw code points
        (Json::String(s), AvroSchema::Bytes) => Ok(Value::Bytes(string_to_raw_bytes(s)?)),
        (Json::String(s), AvroSchema::Fixed(fixed)) => {
            let bytes = string_to_raw_bytes(s)?;
            if bytes.len() != fixed.size {
                return Err(SchemaError::InvalidSchema(format!(
                    "fixed default has wrong size: expected {}, got {}",
                    fixed.size,
                    bytes.len()
                )));
            }
            Ok(Value::Bytes(bytes))
        }

        (Json::String(s), AvroSchema::Enum(enum_schema)) => {
            enum_schema.symbol_index(s).ok_or_else(|| {
                SchemaError::InvalidSchema(format!(
                    "'{}' is not a symbol of enum '{}'",
                    s, enum_schema.name
                ))
            })?;
            Ok(Value::String(s.clone()))
        }

        (Json::Array(items), AvroSchema::Array(item_schema)) => {
            let items: Result<Vec<Value>, SchemaError> = items
                .iter()
                .map(|item| json_to_value_at(item, item_schema, registry, depth + 1))
                .collect();
            Ok(Value::Array(items?))
        }

        (Json::Object(obj), AvroSchema::Map(value_schema)) => {
            let entries: Result<Vec<(String, Value)>, SchemaError> = obj
                .iter()
                .map(|(k, v)| {
                    Ok((k.clone(), json_to_value_at(v, value_schema, registry, depth + 1)?))
                })
                .collect();
            Ok(Value::Map(entries?))
        }

        (Json::Object(obj), AvroSchema::Record(record_schema)) => {
            let fields: Result<Vec<(String, Value)>, SchemaError> = record_schema
                .fields
                .iter()
                .map(|field| {
                    let value = match obj.get(&field.name).or(field.default.as_ref()) {
                        Some(v) => json_to_value_at(v, &field.schema, registry, depth + 1)?,
                        None => {
                            return Err(SchemaError::InvalidSchema(format!(
                                "missing field '{}' in record document",
                                field.name
                            )));
                        }
                    };
                    Ok((field.name.clone(), value))
                })
                .collect();
            Ok(Value::Record(fields?))
        }

        // Union documents are interpreted against the first branch only
        (json, AvroSchema::Union(union)) => {
            let first = &union.branches()[0];
            let inner = json_to_value_at(json, first, registry, depth + 1)?;
            if union.unwrapped || inner.is_null() {
                Ok(inner)
            } else {
                Ok(Value::Union(
                    union.branch_names()[0].clone(),
                    Box::new(inner),
                ))
            }
        }

        (json, AvroSchema::Named(name)) => {
            // A placeholder entry means the referenced type is still being
            // parsed and cannot anchor a default yet.
            let resolved = match registry.get(name) {
                Some(AvroSchema::Named(_)) | None => {
                    return Err(SchemaError::MissingName(name.clone()));
                }
                Some(resolved) => resolved,
            };
            json_to_value_at(json, resolved, registry, depth + 1)
        }

        (json, schema) => Err(SchemaError::InvalidSchema(format!(
            "cannot convert {} to {}",
            json,
            schema.type_name()
        ))),
    }
}

/// Read a JSON string as raw bytes, one byte per code point.
fn string_to_raw_bytes(s: &str) -> Result<Vec<u8>, SchemaError> {
    s.chars()
        .map(|c| {
            let code = c as u32;
            if code > 0xFF {
                Err(SchemaError::InvalidSchema(format!(
                    "code point U+{:04X} does not fit in a byte",
                    code
                )))
            } else {
                Ok(code as u8)
            }
        })
        .collect()
}

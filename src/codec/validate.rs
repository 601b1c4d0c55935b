//! Value validation against a schema.
//!
//! `validate_value` answers whether a value conforms to a type: the check
//! run by the top-level encode before any bytes are produced, and the
//! branch-selection predicate for unwrapped unions.

use crate::schema::{AvroSchema, SchemaRegistry};
use crate::value::Value;

/// Does the value conform to the schema?
///
/// Dispatch is strict on the value variant: a `long` accepts `Value::Long`
/// only, a `float` requires a finite `f32`. Record values validate when
/// every field is either present and valid or absent with a default; keys
/// the schema does not know are ignored.
pub fn validate_value(schema: &AvroSchema, value: &Value, registry: &SchemaRegistry) -> bool {
    match schema {
        AvroSchema::Null => value.is_null(),
        AvroSchema::Boolean => matches!(value, Value::Boolean(_)),
        AvroSchema::Int => matches!(value, Value::Int(_)),
        AvroSchema::Long => matches!(value, Value::Long(_)),
        AvroSchema::Float => matches!(value, Value::Float(f) if f.is_finite()),
        AvroSchema::Double => matches!(value, Value::Double(_)),
        AvroSchema::Bytes => matches!(value, Value::Bytes(_)),
        AvroSchema::String => matches!(value, Value::String(_)),

        AvroSchema::Enum(enum_schema) => match value {
            Value::String(s) => enum_schema.symbol_index(s).is_some(),
            _ => false,
        },

        AvroSchema::Fixed(fixed_schema) => match value {
            Value::Bytes(b) => b.len() == fixed_schema.size,
            _ => false,
        },

        AvroSchema::Array(item_schema) => match value {
            Value::Array(items) => items
                .iter()
                .all(|item| validate_value(item_schema, item, registry)),
            _ => false,
        },

        AvroSchema::Map(value_schema) => match value {
            Value::Map(entries) => entries
                .iter()
                .all(|(_, entry)| validate_value(value_schema, entry, registry)),
            _ => false,
        },

        AvroSchema::Record(record_schema) => match value {
            Value::Record(pairs) => record_schema.fields.iter().all(|field| {
                match pairs.iter().find(|(name, _)| name == &field.name) {
                    Some((_, value)) => validate_value(&field.schema, value, registry),
                    None => field.default.is_some(),
                }
            }),
            _ => false,
        },

        AvroSchema::Union(union) if !union.unwrapped => match value {
            Value::Null => union.branch_index("null").is_some(),
            Value::Union(name, inner) => match union.branch_index(name) {
                Some(index) => validate_value(&union.branches()[index], inner, registry),
                None => false,
            },
            _ => false,
        },

        AvroSchema::Union(union) => union
            .branches()
            .iter()
            .any(|branch| validate_value(branch, value, registry)),

        AvroSchema::Named(_) => match registry.resolve(schema) {
            Some(resolved) => validate_value(resolved, value, registry),
            None => false,
        },
    }
}

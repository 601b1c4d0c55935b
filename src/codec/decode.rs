//! Binary decoder.
//!
//! Reads Avro binary data into [`Value`]s, driven by the schema. The read
//! cursor is a `&mut &[u8]` advanced past every consumed byte; truncated
//! input surfaces as `DecodeError::UnexpectedEof` from the primitive
//! decoders, so a truncated buffer always fails the decode call.

use crate::codec::varint;
use crate::error::DecodeError;
use crate::schema::{AvroSchema, EnumSchema, RecordSchema, SchemaRegistry, UnionSchema};
use crate::value::Value;

/// Decode a null value (no-op, consumes no bytes).
#[inline]
pub fn decode_null(_data: &mut &[u8]) -> Result<(), DecodeError> {
    Ok(())
}

/// Decode a boolean value: a single byte, 0x00 for false, 0x01 for true.
#[inline]
pub fn decode_boolean(data: &mut &[u8]) -> Result<bool, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::UnexpectedEof);
    }
    let byte = data[0];
    *data = &data[1..];
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DecodeError::InvalidData(format!(
            "Invalid boolean value: {}, expected 0 or 1",
            byte
        ))),
    }
}

/// Decode a 32-bit signed integer (zig-zag varint encoded).
#[inline]
pub fn decode_int(data: &mut &[u8]) -> Result<i32, DecodeError> {
    let long = decode_long(data)?;
    if long < i32::MIN as i64 || long > i32::MAX as i64 {
        return Err(DecodeError::InvalidData(format!(
            "Integer overflow: {} does not fit in i32",
            long
        )));
    }
    Ok(long as i32)
}

/// Decode a 64-bit signed integer (zig-zag varint encoded).
#[inline]
pub fn decode_long(data: &mut &[u8]) -> Result<i64, DecodeError> {
    varint::decode_zigzag(data)
}

/// Decode a 32-bit IEEE 754 floating-point number (little-endian).
#[inline]
pub fn decode_float(data: &mut &[u8]) -> Result<f32, DecodeError> {
    if data.len() < 4 {
        return Err(DecodeError::UnexpectedEof);
    }
    let bytes: [u8; 4] = [data[0], data[1], data[2], data[3]];
    *data = &data[4..];
    Ok(f32::from_le_bytes(bytes))
}

/// Decode a 64-bit IEEE 754 floating-point number (little-endian).
#[inline]
pub fn decode_double(data: &mut &[u8]) -> Result<f64, DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::UnexpectedEof);
    }
    let bytes: [u8; 8] = [
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ];
    *data = &data[8..];
    Ok(f64::from_le_bytes(bytes))
}

/// Decode a byte array: a long length followed by that many bytes.
#[inline]
pub fn decode_bytes(data: &mut &[u8]) -> Result<Vec<u8>, DecodeError> {
    let len = decode_long(data)?;
    if len < 0 {
        return Err(DecodeError::InvalidData(format!(
            "Negative bytes length: {}",
            len
        )));
    }
    let len = len as usize;

    if data.len() < len {
        return Err(DecodeError::UnexpectedEof);
    }

    let bytes = data[..len].to_vec();
    *data = &data[len..];
    Ok(bytes)
}

/// Decode a UTF-8 string: a long byte length followed by UTF-8 bytes.
#[inline]
pub fn decode_string(data: &mut &[u8]) -> Result<String, DecodeError> {
    let bytes = decode_bytes(data)?;
    String::from_utf8(bytes).map_err(DecodeError::from)
}

/// Decode a fixed-size byte array: exactly `size` raw bytes.
#[inline]
pub fn decode_fixed(data: &mut &[u8], size: usize) -> Result<Vec<u8>, DecodeError> {
    if data.len() < size {
        return Err(DecodeError::UnexpectedEof);
    }
    let bytes = data[..size].to_vec();
    *data = &data[size..];
    Ok(bytes)
}

/// Decode an enum value: a long index into the symbol table.
pub fn decode_enum(data: &mut &[u8], schema: &EnumSchema) -> Result<Value, DecodeError> {
    let index = decode_long(data)?;

    let symbol = usize::try_from(index)
        .ok()
        .and_then(|i| schema.symbol(i))
        .ok_or_else(|| {
            DecodeError::InvalidData(format!(
                "Enum index {} out of range for enum '{}' with {} symbols",
                index,
                schema.name,
                schema.symbols().len()
            ))
        })?;

    Ok(Value::String(symbol.to_string()))
}

/// Decode an array of values.
///
/// Arrays are encoded as a series of blocks: a long item count, the items,
/// repeated until a zero count. A negative count is followed by a long
/// block byte size (ignored here) and means `|count|` items.
pub fn decode_array(
    data: &mut &[u8],
    item_schema: &AvroSchema,
    registry: &SchemaRegistry,
) -> Result<Value, DecodeError> {
    let mut items = Vec::new();

    loop {
        let count = decode_long(data)?;

        if count == 0 {
            break;
        }

        let item_count = if count < 0 {
            let _byte_size = decode_long(data)?;
            count.unsigned_abs() as usize
        } else {
            count as usize
        };

        for _ in 0..item_count {
            items.push(decode_value(data, item_schema, registry)?);
        }
    }

    Ok(Value::Array(items))
}

/// Decode a map with string keys, block-framed like arrays.
pub fn decode_map(
    data: &mut &[u8],
    value_schema: &AvroSchema,
    registry: &SchemaRegistry,
) -> Result<Value, DecodeError> {
    let mut entries = Vec::new();

    loop {
        let count = decode_long(data)?;

        if count == 0 {
            break;
        }

        let entry_count = if count < 0 {
            let _byte_size = decode_long(data)?;
            count.unsigned_abs() as usize
        } else {
            count as usize
        };

        for _ in 0..entry_count {
            let key = decode_string(data)?;
            let value = decode_value(data, value_schema, registry)?;
            entries.push((key, value));
        }
    }

    Ok(Value::Map(entries))
}

/// Decode a union value: a long branch index followed by the branch value.
///
/// Wrapped unions return `{branch: value}` (bare `Null` for the null
/// branch); unwrapped unions return the bare branch value.
pub fn decode_union(
    data: &mut &[u8],
    union: &UnionSchema,
    registry: &SchemaRegistry,
) -> Result<Value, DecodeError> {
    let index = decode_long(data)?;

    let branch = usize::try_from(index)
        .ok()
        .and_then(|i| union.branch(i))
        .ok_or_else(|| {
            DecodeError::InvalidData(format!(
                "Union index {} out of range (0..{})",
                index,
                union.branches().len()
            ))
        })?;

    let value = decode_value(data, branch, registry)?;

    if union.unwrapped || value.is_null() {
        Ok(value)
    } else {
        let name = union.branch_names()[index as usize].clone();
        Ok(Value::Union(name, Box::new(value)))
    }
}

/// Decode a record: each field value in declaration order, no delimiters.
pub fn decode_record(
    data: &mut &[u8],
    schema: &RecordSchema,
    registry: &SchemaRegistry,
) -> Result<Value, DecodeError> {
    let mut fields = Vec::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let value = decode_value(data, &field.schema, registry)?;
        fields.push((field.name.clone(), value));
    }

    Ok(Value::Record(fields))
}

/// Decode any Avro value based on its schema.
///
/// Named references are resolved through the registry; an unresolved
/// reference is a decode failure.
pub fn decode_value(
    data: &mut &[u8],
    schema: &AvroSchema,
    registry: &SchemaRegistry,
) -> Result<Value, DecodeError> {
    match schema {
        AvroSchema::Null => {
            decode_null(data)?;
            Ok(Value::Null)
        }
        AvroSchema::Boolean => Ok(Value::Boolean(decode_boolean(data)?)),
        AvroSchema::Int => Ok(Value::Int(decode_int(data)?)),
        AvroSchema::Long => Ok(Value::Long(decode_long(data)?)),
        AvroSchema::Float => Ok(Value::Float(decode_float(data)?)),
        AvroSchema::Double => Ok(Value::Double(decode_double(data)?)),
        AvroSchema::Bytes => Ok(Value::Bytes(decode_bytes(data)?)),
        AvroSchema::String => Ok(Value::String(decode_string(data)?)),

        AvroSchema::Record(record_schema) => decode_record(data, record_schema, registry),
        AvroSchema::Enum(enum_schema) => decode_enum(data, enum_schema),
        AvroSchema::Array(item_schema) => decode_array(data, item_schema, registry),
        AvroSchema::Map(value_schema) => decode_map(data, value_schema, registry),
        AvroSchema::Union(union) => decode_union(data, union, registry),
        AvroSchema::Fixed(fixed_schema) => {
            Ok(Value::Bytes(decode_fixed(data, fixed_schema.size)?))
        }

        AvroSchema::Named(name) => {
            let resolved = registry.resolve(schema).ok_or_else(|| {
                DecodeError::InvalidData(format!("Unresolved named type reference: '{}'", name))
            })?;
            decode_value(data, resolved, registry)
        }
    }
}

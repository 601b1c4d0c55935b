//! Binary encoder.
//!
//! The write cursor runs over a fixed-size buffer and never fails on
//! overflow: every write advances the position by the exact number of bytes
//! the value needs, committing only the bytes that fit. After an overflowed
//! pass the position equals the exact required buffer size, which is what
//! drives the top-level encode's single reallocate-and-retry.

use crate::codec::validate::validate_value;
use crate::codec::varint;
use crate::error::EncodeError;
use crate::schema::{AvroSchema, SchemaRegistry};
use crate::value::{json_to_value, Value};

/// A write cursor over a fixed-size byte buffer.
#[derive(Debug)]
pub struct WriteCursor {
    buf: Vec<u8>,
    pos: usize,
}

impl WriteCursor {
    /// Create a cursor over a zeroed buffer of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            buf: vec![0; size],
            pos: 0,
        }
    }

    /// The current position: bytes written, or bytes required if the
    /// buffer has overflowed.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether every write so far fit in the buffer.
    pub fn is_valid(&self) -> bool {
        self.pos <= self.buf.len()
    }

    /// Consume the cursor, returning the written prefix of the buffer.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.truncate(self.pos);
        self.buf
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        if self.pos < self.buf.len() {
            self.buf[self.pos] = byte;
        }
        self.pos += 1;
    }

    #[inline]
    fn put_slice(&mut self, bytes: &[u8]) {
        if self.pos < self.buf.len() {
            let n = bytes.len().min(self.buf.len() - self.pos);
            self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        }
        self.pos += bytes.len();
    }

    /// Write a boolean as a single byte.
    #[inline]
    pub fn write_boolean(&mut self, value: bool) {
        self.push(value as u8);
    }

    /// Write a 32-bit signed integer as a zig-zag varint.
    #[inline]
    pub fn write_int(&mut self, value: i32) {
        self.write_long(value as i64);
    }

    /// Write a 64-bit signed integer as a zig-zag varint.
    #[inline]
    pub fn write_long(&mut self, value: i64) {
        let mut v = varint::zigzag_encode(value);
        loop {
            let mut byte = (v & 0x7F) as u8;
            v >>= 7;
            if v != 0 {
                byte |= 0x80;
            }
            self.push(byte);
            if v == 0 {
                break;
            }
        }
    }

    /// Write a 32-bit IEEE 754 float, little-endian.
    #[inline]
    pub fn write_float(&mut self, value: f32) {
        self.put_slice(&value.to_le_bytes());
    }

    /// Write a 64-bit IEEE 754 double, little-endian.
    #[inline]
    pub fn write_double(&mut self, value: f64) {
        self.put_slice(&value.to_le_bytes());
    }

    /// Write a byte array: a long length followed by the bytes.
    #[inline]
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.write_long(value.len() as i64);
        self.put_slice(value);
    }

    /// Write a UTF-8 string: a long byte length followed by the bytes.
    #[inline]
    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Write raw bytes with no length prefix.
    #[inline]
    pub fn write_fixed(&mut self, value: &[u8]) {
        self.put_slice(value);
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Boolean(_) => "boolean",
        Value::Int(_) => "int",
        Value::Long(_) => "long",
        Value::Float(_) => "float",
        Value::Double(_) => "double",
        Value::Bytes(_) => "bytes",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Record(_) => "record",
        Value::Union(_, _) => "union",
    }
}

fn mismatch(schema: &AvroSchema, value: &Value) -> EncodeError {
    EncodeError::InvalidValue(format!(
        "cannot encode {} value as {}",
        value_kind(value),
        schema.type_name()
    ))
}

/// Encode a value onto the cursor, driven by the schema.
///
/// The value is assumed to have been validated; the write path still fails
/// where the wire cannot express the value (unknown enum symbol, unknown
/// union branch, variant mismatch, missing record field without default).
pub fn encode_value(
    cursor: &mut WriteCursor,
    schema: &AvroSchema,
    value: &Value,
    registry: &SchemaRegistry,
) -> Result<(), EncodeError> {
    match (schema, value) {
        (AvroSchema::Null, Value::Null) => Ok(()),
        (AvroSchema::Boolean, Value::Boolean(b)) => {
            cursor.write_boolean(*b);
            Ok(())
        }
        (AvroSchema::Int, Value::Int(i)) => {
            cursor.write_int(*i);
            Ok(())
        }
        (AvroSchema::Long, Value::Long(l)) => {
            cursor.write_long(*l);
            Ok(())
        }
        (AvroSchema::Float, Value::Float(f)) => {
            cursor.write_float(*f);
            Ok(())
        }
        (AvroSchema::Double, Value::Double(d)) => {
            cursor.write_double(*d);
            Ok(())
        }
        (AvroSchema::Bytes, Value::Bytes(b)) => {
            cursor.write_bytes(b);
            Ok(())
        }
        (AvroSchema::String, Value::String(s)) => {
            cursor.write_string(s);
            Ok(())
        }

        // Fixed writes the bytes raw; the length was checked by validation
        (AvroSchema::Fixed(_), Value::Bytes(b)) => {
            cursor.write_fixed(b);
            Ok(())
        }

        (AvroSchema::Enum(enum_schema), Value::String(s)) => {
            let index = enum_schema
                .symbol_index(s)
                .ok_or_else(|| EncodeError::InvalidSymbol(s.clone()))?;
            cursor.write_long(index as i64);
            Ok(())
        }

        (AvroSchema::Array(item_schema), Value::Array(items)) => {
            if !items.is_empty() {
                cursor.write_long(items.len() as i64);
                for item in items {
                    encode_value(cursor, item_schema, item, registry)?;
                }
            }
            cursor.write_long(0);
            Ok(())
        }

        (AvroSchema::Map(value_schema), Value::Map(entries)) => {
            if !entries.is_empty() {
                cursor.write_long(entries.len() as i64);
                for (key, entry) in entries {
                    cursor.write_string(key);
                    encode_value(cursor, value_schema, entry, registry)?;
                }
            }
            cursor.write_long(0);
            Ok(())
        }

        (AvroSchema::Record(record_schema), Value::Record(pairs)) => {
            for field in &record_schema.fields {
                match pairs.iter().find(|(name, _)| name == &field.name) {
                    Some((_, value)) => {
                        encode_value(cursor, &field.schema, value, registry)?;
                    }
                    None => {
                        let default = field.default.as_ref().ok_or_else(|| {
                            EncodeError::InvalidValue(format!(
                                "missing field '{}' with no default",
                                field.name
                            ))
                        })?;
                        let value = json_to_value(default, &field.schema, registry)
                            .map_err(|e| EncodeError::InvalidValue(e.to_string()))?;
                        encode_value(cursor, &field.schema, &value, registry)?;
                    }
                }
            }
            Ok(())
        }

        (AvroSchema::Union(union), value) if !union.unwrapped => {
            let (index, branch, inner) = match value {
                Value::Null => {
                    let index = union
                        .branch_index("null")
                        .ok_or_else(|| EncodeError::NoSuchBranch("null".to_string()))?;
                    (index, &union.branches()[index], value)
                }
                Value::Union(name, inner) => {
                    let index = union
                        .branch_index(name)
                        .ok_or_else(|| EncodeError::NoSuchBranch(name.clone()))?;
                    (index, &union.branches()[index], inner.as_ref())
                }
                other => return Err(mismatch(schema, other)),
            };
            cursor.write_long(index as i64);
            encode_value(cursor, branch, inner, registry)
        }

        // Unwrapped union: first branch that accepts the value wins
        (AvroSchema::Union(union), value) => {
            for (index, branch) in union.branches().iter().enumerate() {
                if validate_value(branch, value, registry) {
                    cursor.write_long(index as i64);
                    return encode_value(cursor, branch, value, registry);
                }
            }
            Err(EncodeError::InvalidValue(format!(
                "{} value does not match any union branch",
                value_kind(value)
            )))
        }

        (AvroSchema::Named(name), value) => {
            let resolved = registry
                .resolve(schema)
                .ok_or_else(|| EncodeError::UnresolvedName(name.clone()))?;
            encode_value(cursor, resolved, value, registry)
        }

        (schema, value) => Err(mismatch(schema, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_writes_advance_position() {
        let mut cursor = WriteCursor::new(16);
        cursor.write_boolean(true);
        assert_eq!(cursor.position(), 1);
        cursor.write_long(64);
        assert_eq!(cursor.position(), 3);
        cursor.write_double(1.0);
        assert_eq!(cursor.position(), 11);
        assert!(cursor.is_valid());
        assert_eq!(cursor.into_bytes().len(), 11);
    }

    #[test]
    fn test_cursor_overflow_measures_required_size() {
        // A 4-byte buffer cannot hold the 11-byte payload, but the
        // position must still land on the exact required size.
        let mut small = WriteCursor::new(4);
        small.write_string("hello");
        small.write_long(-1);
        small.write_float(0.5);
        assert!(!small.is_valid());
        let required = small.position();
        assert_eq!(required, 11);

        let mut exact = WriteCursor::new(required);
        exact.write_string("hello");
        exact.write_long(-1);
        exact.write_float(0.5);
        assert!(exact.is_valid());
        assert_eq!(exact.position(), required);
    }

    #[test]
    fn test_cursor_overflow_commits_only_in_bounds_bytes() {
        let mut cursor = WriteCursor::new(2);
        cursor.write_string("abc");
        assert!(!cursor.is_valid());
        assert_eq!(cursor.position(), 4);
        // Only the length byte and the first character fit
        assert_eq!(cursor.buf, vec![0x06, b'a']);
    }

    #[test]
    fn test_zero_sized_buffer_still_measures() {
        let mut cursor = WriteCursor::new(0);
        cursor.write_long(i64::MAX);
        assert!(!cursor.is_valid());
        assert_eq!(cursor.position(), 10);
    }
}

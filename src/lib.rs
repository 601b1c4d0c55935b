//! Avro schema engine and binary codec.
//!
//! This library parses an Avro schema document into a reusable
//! [`AvroType`]: a type object that validates values, encodes them to the
//! Avro binary format, decodes Avro bytes back into values, and generates
//! structurally valid random samples.
//!
//! ```
//! use avrotype::{parse_schema, Value};
//!
//! let schema = r#"{
//!     "type": "record",
//!     "name": "Pair",
//!     "fields": [
//!         {"name": "a", "type": "int"},
//!         {"name": "b", "type": "string"}
//!     ]
//! }"#;
//!
//! let ty = parse_schema(schema).unwrap();
//! let value = Value::Record(vec![
//!     ("a".to_string(), Value::Int(1)),
//!     ("b".to_string(), Value::String("x".to_string())),
//! ]);
//!
//! let bytes = ty.encode(&value).unwrap();
//! assert_eq!(ty.decode(&bytes).unwrap(), value);
//! ```

pub mod codec;
pub mod error;
pub mod schema;
pub mod value;

// Re-export main types
pub use codec::{
    parse_schema, parse_schema_with_options, AvroType, EncodeOptions, ParseOptions, WriteCursor,
};
pub use error::{AvroError, DecodeError, EncodeError, SchemaError};
pub use schema::{
    AvroSchema, EnumSchema, FieldSchema, FixedSchema, RecordSchema, SchemaParser, SchemaRegistry,
    UnionSchema,
};
pub use value::{json_to_value, Value};

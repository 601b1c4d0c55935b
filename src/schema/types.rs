//! Avro schema types and representations.
//!
//! This module defines the schema type system: primitives, complex types,
//! and named type references resolved through the registry.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::error::SchemaError;

/// Represents an Avro schema.
///
/// Primitive kinds are unit variants; named types carry their own structs.
/// `Named` is a reference to a previously registered type, resolved through
/// the [`SchemaRegistry`](crate::schema::SchemaRegistry) at codec time so
/// recursive schemas need no cyclic ownership.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroSchema {
    // Primitive types
    /// Null type - no value.
    Null,
    /// Boolean type.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit IEEE 754 floating-point.
    Float,
    /// 64-bit IEEE 754 floating-point.
    Double,
    /// Sequence of bytes.
    Bytes,
    /// Unicode string.
    String,

    // Complex types
    /// Record type with named fields.
    Record(RecordSchema),
    /// Enumeration type.
    Enum(EnumSchema),
    /// Array of items with a single schema.
    Array(Box<AvroSchema>),
    /// Map with string keys and values of a single schema.
    Map(Box<AvroSchema>),
    /// Union of multiple branches.
    Union(UnionSchema),
    /// Fixed-size byte array.
    Fixed(FixedSchema),

    /// Named type reference (resolved against the registry).
    Named(String),
}

/// Schema for a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// The name of the record.
    pub name: String,
    /// Optional namespace for the record.
    pub namespace: Option<String>,
    /// The fields of the record, in declaration order.
    pub fields: Vec<FieldSchema>,
    /// Optional documentation.
    pub doc: Option<String>,
}

impl RecordSchema {
    /// Create a new RecordSchema with the given name and fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            fields,
            doc: None,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Serialize the record schema to a JSON Value.
    pub fn to_json_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), json!("record"));
        obj.insert("name".to_string(), json!(&self.name));

        if let Some(ns) = &self.namespace {
            obj.insert("namespace".to_string(), json!(ns));
        }

        if let Some(doc) = &self.doc {
            obj.insert("doc".to_string(), json!(doc));
        }

        let fields: Vec<Value> = self.fields.iter().map(|f| f.to_json_value()).collect();
        obj.insert("fields".to_string(), Value::Array(fields));

        Value::Object(obj)
    }
}

/// Schema for a field within a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// The name of the field.
    pub name: String,
    /// The schema of the field's value.
    pub schema: AvroSchema,
    /// Optional default value for the field, as a JSON document.
    pub default: Option<Value>,
    /// Optional documentation.
    pub doc: Option<String>,
}

impl FieldSchema {
    /// Create a new FieldSchema with the given name and schema.
    pub fn new(name: impl Into<String>, schema: AvroSchema) -> Self {
        Self {
            name: name.into(),
            schema,
            default: None,
            doc: None,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Serialize the field schema to a JSON Value.
    pub fn to_json_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_string(), json!(&self.name));
        obj.insert("type".to_string(), self.schema.to_json_value());

        if let Some(default) = &self.default {
            obj.insert("default".to_string(), default.clone());
        }

        if let Some(doc) = &self.doc {
            obj.insert("doc".to_string(), json!(doc));
        }

        Value::Object(obj)
    }
}

/// Schema for an enumeration type.
///
/// Symbol indices are assigned in declaration order; symbol lookup is
/// constant-time through a precomputed index map.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// The name of the enum.
    pub name: String,
    /// Optional namespace for the enum.
    pub namespace: Option<String>,
    /// Optional documentation.
    pub doc: Option<String>,
    symbols: Vec<String>,
    index: HashMap<String, usize>,
}

impl EnumSchema {
    /// Create a new EnumSchema with the given name and symbols.
    pub fn new(name: impl Into<String>, symbols: Vec<String>) -> Self {
        let index = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self {
            name: name.into(),
            namespace: None,
            doc: None,
            symbols,
            index,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// The symbols of the enum, in declaration order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Get the index of a symbol.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    /// Get the symbol at the given index.
    pub fn symbol(&self, index: usize) -> Option<&str> {
        self.symbols.get(index).map(|s| s.as_str())
    }

    /// Serialize the enum schema to a JSON Value.
    pub fn to_json_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), json!("enum"));
        obj.insert("name".to_string(), json!(&self.name));

        if let Some(ns) = &self.namespace {
            obj.insert("namespace".to_string(), json!(ns));
        }

        if let Some(doc) = &self.doc {
            obj.insert("doc".to_string(), json!(doc));
        }

        obj.insert("symbols".to_string(), json!(&self.symbols));

        Value::Object(obj)
    }
}

/// Schema for a fixed-size byte array.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchema {
    /// The name of the fixed type.
    pub name: String,
    /// Optional namespace for the fixed type.
    pub namespace: Option<String>,
    /// The size in bytes.
    pub size: usize,
    /// Optional documentation.
    pub doc: Option<String>,
}

impl FixedSchema {
    /// Create a new FixedSchema with the given name and size.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            size,
            doc: None,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Serialize the fixed schema to a JSON Value.
    pub fn to_json_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".to_string(), json!("fixed"));
        obj.insert("name".to_string(), json!(&self.name));

        if let Some(ns) = &self.namespace {
            obj.insert("namespace".to_string(), json!(ns));
        }

        if let Some(doc) = &self.doc {
            obj.insert("doc".to_string(), json!(doc));
        }

        obj.insert("size".to_string(), json!(self.size));

        Value::Object(obj)
    }
}

/// Schema for a union type.
///
/// Branches are identified on the wire by their declaration index and in
/// wrapped in-memory values by their discriminator name: the kind name for
/// primitives, `"array"`/`"map"` for containers, the fully qualified name
/// for named types. Branch names are unique; a union cannot contain
/// another union.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSchema {
    branches: Vec<AvroSchema>,
    branch_names: Vec<String>,
    index: HashMap<String, usize>,
    /// Whether in-memory values are bare rather than `{branch: value}`.
    pub unwrapped: bool,
}

impl UnionSchema {
    /// Create a new UnionSchema from its branches.
    ///
    /// Fails when the branch list is empty, when a branch is itself a
    /// union, or when two branches share a discriminator name.
    pub fn new(branches: Vec<AvroSchema>, unwrapped: bool) -> Result<Self, SchemaError> {
        if branches.is_empty() {
            return Err(SchemaError::InvalidSchema(
                "Union schema cannot be empty".to_string(),
            ));
        }

        let mut branch_names = Vec::with_capacity(branches.len());
        let mut index = HashMap::with_capacity(branches.len());
        for (i, branch) in branches.iter().enumerate() {
            let name = branch.branch_name().ok_or_else(|| {
                SchemaError::InvalidSchema(format!("Union contains nested union at position {}", i))
            })?;
            if index.insert(name.clone(), i).is_some() {
                return Err(SchemaError::InvalidSchema(format!(
                    "Union contains duplicate branch '{}' at position {}",
                    name, i
                )));
            }
            branch_names.push(name);
        }

        Ok(Self {
            branches,
            branch_names,
            index,
            unwrapped,
        })
    }

    /// The branches of the union, in declaration order.
    pub fn branches(&self) -> &[AvroSchema] {
        &self.branches
    }

    /// The branch discriminator names, in declaration order.
    pub fn branch_names(&self) -> &[String] {
        &self.branch_names
    }

    /// Get the branch schema at the given index.
    pub fn branch(&self, index: usize) -> Option<&AvroSchema> {
        self.branches.get(index)
    }

    /// Get the index of the branch with the given discriminator name.
    pub fn branch_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Serialize the union schema to a JSON Value.
    pub fn to_json_value(&self) -> Value {
        Value::Array(self.branches.iter().map(|b| b.to_json_value()).collect())
    }
}

impl AvroSchema {
    /// Check if this schema is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            AvroSchema::Null
                | AvroSchema::Boolean
                | AvroSchema::Int
                | AvroSchema::Long
                | AvroSchema::Float
                | AvroSchema::Double
                | AvroSchema::Bytes
                | AvroSchema::String
        )
    }

    /// Check if this schema is a named type (record, enum, or fixed).
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            AvroSchema::Record(_) | AvroSchema::Enum(_) | AvroSchema::Fixed(_)
        )
    }

    /// The Avro kind string for this schema.
    pub fn type_name(&self) -> &'static str {
        match self {
            AvroSchema::Null => "null",
            AvroSchema::Boolean => "boolean",
            AvroSchema::Int => "int",
            AvroSchema::Long => "long",
            AvroSchema::Float => "float",
            AvroSchema::Double => "double",
            AvroSchema::Bytes => "bytes",
            AvroSchema::String => "string",
            AvroSchema::Record(_) => "record",
            AvroSchema::Enum(_) => "enum",
            AvroSchema::Array(_) => "array",
            AvroSchema::Map(_) => "map",
            AvroSchema::Union(_) => "union",
            AvroSchema::Fixed(_) => "fixed",
            AvroSchema::Named(_) => "named",
        }
    }

    /// Get the fully qualified name of a named type, if applicable.
    pub fn fullname(&self) -> Option<String> {
        match self {
            AvroSchema::Record(r) => Some(r.fullname()),
            AvroSchema::Enum(e) => Some(e.fullname()),
            AvroSchema::Fixed(f) => Some(f.fullname()),
            AvroSchema::Named(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// The union branch discriminator name for this schema.
    ///
    /// Primitives use their kind name, arrays and maps the container kind,
    /// named types their fully qualified name. A union has no branch name
    /// of its own, which is what rejects unions inside unions.
    pub fn branch_name(&self) -> Option<String> {
        match self {
            AvroSchema::Union(_) => None,
            AvroSchema::Array(_) => Some("array".to_string()),
            AvroSchema::Map(_) => Some("map".to_string()),
            AvroSchema::Record(_)
            | AvroSchema::Enum(_)
            | AvroSchema::Fixed(_)
            | AvroSchema::Named(_) => self.fullname(),
            _ => Some(self.type_name().to_string()),
        }
    }

    /// Serialize the schema to a JSON string.
    pub fn to_json(&self) -> String {
        let value = self.to_json_value();
        serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string())
    }

    /// Serialize the schema to a JSON Value.
    pub fn to_json_value(&self) -> Value {
        match self {
            // Primitive types serialize as simple strings
            AvroSchema::Null => json!("null"),
            AvroSchema::Boolean => json!("boolean"),
            AvroSchema::Int => json!("int"),
            AvroSchema::Long => json!("long"),
            AvroSchema::Float => json!("float"),
            AvroSchema::Double => json!("double"),
            AvroSchema::Bytes => json!("bytes"),
            AvroSchema::String => json!("string"),

            // Complex types
            AvroSchema::Record(r) => r.to_json_value(),
            AvroSchema::Enum(e) => e.to_json_value(),
            AvroSchema::Array(items) => {
                json!({
                    "type": "array",
                    "items": items.to_json_value()
                })
            }
            AvroSchema::Map(values) => {
                json!({
                    "type": "map",
                    "values": values.to_json_value()
                })
            }
            AvroSchema::Union(u) => u.to_json_value(),
            AvroSchema::Fixed(f) => f.to_json_value(),

            // Named type reference - just the name string
            AvroSchema::Named(name) => json!(name),
        }
    }
}

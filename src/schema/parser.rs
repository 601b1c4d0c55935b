//! JSON schema parser.
//!
//! Walks a parsed schema document (string, array, or object forms) into the
//! `AvroSchema` hierarchy, resolving named references against the registry
//! and propagating namespaces down the tree.

use serde_json::Value as Json;
use tracing::debug;

use crate::error::SchemaError;
use crate::schema::{
    AvroSchema, EnumSchema, FieldSchema, FixedSchema, RecordSchema, SchemaRegistry, UnionSchema,
};
use crate::value::json_to_value;

/// Schema parser with named type resolution context.
///
/// Named types are registered under their fully qualified name BEFORE their
/// children are parsed, so a record can reference itself. A reference to an
/// unregistered name fails with [`SchemaError::MissingName`]; defining the
/// same fully qualified name twice fails with
/// [`SchemaError::DuplicateName`].
#[derive(Debug, Default)]
pub struct SchemaParser {
    registry: SchemaRegistry,
    current_namespace: Option<String>,
    unwrap_unions: bool,
}

impl SchemaParser {
    /// Create a new SchemaParser with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the enclosing namespace for unqualified names.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.current_namespace = Some(namespace.into());
        self
    }

    /// Parse unions as unwrapped (bare in-memory values).
    pub fn with_unwrapped_unions(mut self, unwrapped: bool) -> Self {
        self.unwrap_unions = unwrapped;
        self
    }

    /// Seed the parser with an existing registry, so references to types
    /// from a previous parse resolve.
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The registry of named types seen so far.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Consume the parser, keeping the registry.
    pub fn into_registry(self) -> SchemaRegistry {
        self.registry
    }

    /// Parse a JSON value into an AvroSchema.
    pub fn parse(&mut self, value: &Json) -> Result<AvroSchema, SchemaError> {
        match value {
            Json::String(s) => self.parse_string_schema(s),
            Json::Object(obj) => self.parse_object_schema(obj),
            Json::Array(arr) => self.parse_union_schema(arr),
            _ => Err(SchemaError::InvalidSchema(format!(
                "Expected string, object, or array, found: {}",
                value
            ))),
        }
    }

    /// Parse a primitive type or named type reference from a string.
    fn parse_string_schema(&self, s: &str) -> Result<AvroSchema, SchemaError> {
        match s {
            "null" => Ok(AvroSchema::Null),
            "boolean" => Ok(AvroSchema::Boolean),
            "int" => Ok(AvroSchema::Int),
            "long" => Ok(AvroSchema::Long),
            "float" => Ok(AvroSchema::Float),
            "double" => Ok(AvroSchema::Double),
            "bytes" => Ok(AvroSchema::Bytes),
            "string" => Ok(AvroSchema::String),
            name => {
                let fullname = self.qualify(name);
                if self.registry.contains(&fullname) {
                    Ok(AvroSchema::Named(fullname))
                } else {
                    Err(SchemaError::MissingName(fullname))
                }
            }
        }
    }

    /// Parse a complex type from a JSON object, dispatching on `type`.
    fn parse_object_schema(
        &mut self,
        obj: &serde_json::Map<String, Json>,
    ) -> Result<AvroSchema, SchemaError> {
        let type_str = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SchemaError::InvalidSchema("Missing 'type' field".to_string()))?;

        match type_str {
            "null" => Ok(AvroSchema::Null),
            "boolean" => Ok(AvroSchema::Boolean),
            "int" => Ok(AvroSchema::Int),
            "long" => Ok(AvroSchema::Long),
            "float" => Ok(AvroSchema::Float),
            "double" => Ok(AvroSchema::Double),
            "bytes" => Ok(AvroSchema::Bytes),
            "string" => Ok(AvroSchema::String),

            "record" => self.parse_record_schema(obj),
            "enum" => self.parse_enum_schema(obj),
            "array" => self.parse_array_schema(obj),
            "map" => self.parse_map_schema(obj),
            "fixed" => self.parse_fixed_schema(obj),

            // The type field can also be a named reference
            other => {
                let fullname = self.qualify(other);
                if self.registry.contains(&fullname) {
                    Ok(AvroSchema::Named(fullname))
                } else {
                    Err(SchemaError::UnsupportedType(format!(
                        "Unknown type: {}",
                        other
                    )))
                }
            }
        }
    }

    /// Parse a union schema from a JSON array.
    fn parse_union_schema(&mut self, arr: &[Json]) -> Result<AvroSchema, SchemaError> {
        let branches: Result<Vec<AvroSchema>, SchemaError> =
            arr.iter().map(|v| self.parse(v)).collect();
        let union = UnionSchema::new(branches?, self.unwrap_unions)?;
        Ok(AvroSchema::Union(union))
    }

    /// Parse a record schema.
    fn parse_record_schema(
        &mut self,
        obj: &serde_json::Map<String, Json>,
    ) -> Result<AvroSchema, SchemaError> {
        let (name, namespace, fullname) = self.named_parts(obj, "Record")?;

        // Register a placeholder before parsing fields so self-references
        // resolve. The real node replaces it below.
        self.registry
            .register(fullname.clone(), AvroSchema::Named(fullname.clone()))?;

        let doc = obj.get("doc").and_then(|v| v.as_str()).map(String::from);

        let fields_value = obj
            .get("fields")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                SchemaError::InvalidSchema("Record missing 'fields' array".to_string())
            })?;

        let prev_namespace = self.current_namespace.clone();
        self.current_namespace = namespace.clone();

        let fields: Result<Vec<FieldSchema>, SchemaError> = fields_value
            .iter()
            .map(|f| self.parse_field_schema(f))
            .collect();

        self.current_namespace = prev_namespace;

        let record = RecordSchema {
            name,
            namespace,
            fields: fields?,
            doc,
        };

        self.registry
            .fill(fullname.clone(), AvroSchema::Record(record.clone()));
        debug!("registered record type '{}'", fullname);

        // Defaults are checked once the record itself resolves, so a
        // default on a self-referential field can be materialized.
        for field in &record.fields {
            if let Some(default) = &field.default {
                json_to_value(default, &field.schema, &self.registry).map_err(|e| {
                    SchemaError::InvalidDefault {
                        field: field.name.clone(),
                        reason: e.to_string(),
                    }
                })?;
            }
        }

        Ok(AvroSchema::Record(record))
    }

    /// Parse a field schema within a record.
    fn parse_field_schema(&mut self, value: &Json) -> Result<FieldSchema, SchemaError> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::InvalidSchema("Field must be an object".to_string()))?;

        let name = obj
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SchemaError::InvalidSchema("Field missing 'name'".to_string()))?
            .to_string();

        let type_value = obj
            .get("type")
            .ok_or_else(|| SchemaError::InvalidSchema("Field missing 'type'".to_string()))?;

        let schema = self.parse(type_value)?;

        let default = obj.get("default").cloned();
        let doc = obj.get("doc").and_then(|v| v.as_str()).map(String::from);

        Ok(FieldSchema {
            name,
            schema,
            default,
            doc,
        })
    }

    /// Parse an enum schema.
    fn parse_enum_schema(
        &mut self,
        obj: &serde_json::Map<String, Json>,
    ) -> Result<AvroSchema, SchemaError> {
        let (name, namespace, fullname) = self.named_parts(obj, "Enum")?;

        let symbols_value = obj
            .get("symbols")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                SchemaError::InvalidSchema("Enum missing 'symbols' array".to_string())
            })?;

        let symbols: Result<Vec<String>, SchemaError> = symbols_value
            .iter()
            .map(|v| {
                v.as_str().map(String::from).ok_or_else(|| {
                    SchemaError::InvalidSchema("Enum symbols must be strings".to_string())
                })
            })
            .collect();
        let symbols = symbols?;

        if symbols.is_empty() {
            return Err(SchemaError::InvalidSchema(
                "Enum must have at least one symbol".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol.as_str()) {
                return Err(SchemaError::InvalidSchema(format!(
                    "Enum contains duplicate symbol '{}'",
                    symbol
                )));
            }
        }

        let mut enum_schema = EnumSchema::new(name, symbols);
        enum_schema.namespace = namespace;
        enum_schema.doc = obj.get("doc").and_then(|v| v.as_str()).map(String::from);

        let schema = AvroSchema::Enum(enum_schema);
        self.registry.register(fullname.clone(), schema.clone())?;
        debug!("registered enum type '{}'", fullname);

        Ok(schema)
    }

    /// Parse an array schema.
    fn parse_array_schema(
        &mut self,
        obj: &serde_json::Map<String, Json>,
    ) -> Result<AvroSchema, SchemaError> {
        let items = obj
            .get("items")
            .ok_or_else(|| SchemaError::InvalidSchema("Array missing 'items' field".to_string()))?;

        let item_schema = self.parse(items)?;
        Ok(AvroSchema::Array(Box::new(item_schema)))
    }

    /// Parse a map schema.
    fn parse_map_schema(
        &mut self,
        obj: &serde_json::Map<String, Json>,
    ) -> Result<AvroSchema, SchemaError> {
        let values = obj
            .get("values")
            .ok_or_else(|| SchemaError::InvalidSchema("Map missing 'values' field".to_string()))?;

        let value_schema = self.parse(values)?;
        Ok(AvroSchema::Map(Box::new(value_schema)))
    }

    /// Parse a fixed schema.
    fn parse_fixed_schema(
        &mut self,
        obj: &serde_json::Map<String, Json>,
    ) -> Result<AvroSchema, SchemaError> {
        let (name, namespace, fullname) = self.named_parts(obj, "Fixed")?;

        let size = obj
            .get("size")
            .and_then(|v| v.as_u64())
            .filter(|&s| s >= 1)
            .ok_or_else(|| {
                SchemaError::InvalidSchema(
                    "Fixed 'size' must be a positive integer".to_string(),
                )
            })? as usize;

        let mut fixed_schema = FixedSchema::new(name, size);
        fixed_schema.namespace = namespace;
        fixed_schema.doc = obj.get("doc").and_then(|v| v.as_str()).map(String::from);

        let schema = AvroSchema::Fixed(fixed_schema);
        self.registry.register(fullname.clone(), schema.clone())?;
        debug!("registered fixed type '{}'", fullname);

        Ok(schema)
    }

    /// Extract `(local name, effective namespace, fully qualified name)`
    /// for a named type declaration.
    ///
    /// A dotted name carries its own namespace and ignores the `namespace`
    /// attribute; otherwise the attribute wins over the inherited namespace.
    fn named_parts(
        &self,
        obj: &serde_json::Map<String, Json>,
        context: &str,
    ) -> Result<(String, Option<String>, String), SchemaError> {
        let name = obj.get("name").and_then(|v| v.as_str()).ok_or_else(|| {
            SchemaError::InvalidSchema(format!("{} missing 'name' field", context))
        })?;

        if let Some((ns, local)) = name.rsplit_once('.') {
            return Ok((local.to_string(), Some(ns.to_string()), name.to_string()));
        }

        let namespace = obj
            .get("namespace")
            .and_then(|v| v.as_str())
            .map(String::from)
            .or_else(|| self.current_namespace.clone());

        let fullname = match &namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        };

        Ok((name.to_string(), namespace, fullname))
    }

    /// Resolve a reference name to its fully qualified form.
    fn qualify(&self, name: &str) -> String {
        if name.contains('.') {
            name.to_string()
        } else if let Some(ns) = &self.current_namespace {
            format!("{}.{}", ns, name)
        } else {
            name.to_string()
        }
    }
}

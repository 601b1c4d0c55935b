//! Registry of named types.
//!
//! Named types (records, enums, fixed) are registered under their fully
//! qualified name while a schema document is parsed, and looked up again
//! whenever the codec meets a `Named` reference. The registry is built
//! top-down during parsing and read-only afterwards.

use std::collections::HashMap;

use crate::error::SchemaError;
use crate::schema::AvroSchema;

/// Registry of named types by their fully qualified name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    named_types: HashMap<String, AvroSchema>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type, failing if the name is already taken.
    pub fn register(&mut self, name: String, schema: AvroSchema) -> Result<(), SchemaError> {
        if self.named_types.contains_key(&name) {
            return Err(SchemaError::DuplicateName(name));
        }
        self.named_types.insert(name, schema);
        Ok(())
    }

    /// Replace an existing entry.
    ///
    /// The parser registers a placeholder before recursing into a record's
    /// fields (so self-references resolve) and fills in the real node here.
    pub(crate) fn fill(&mut self, name: String, schema: AvroSchema) {
        self.named_types.insert(name, schema);
    }

    /// Get a named type by its fully qualified name.
    pub fn get(&self, name: &str) -> Option<&AvroSchema> {
        self.named_types.get(name)
    }

    /// Check if a named type exists.
    pub fn contains(&self, name: &str) -> bool {
        self.named_types.contains_key(name)
    }

    /// All registered named types.
    pub fn named_types(&self) -> &HashMap<String, AvroSchema> {
        &self.named_types
    }

    /// Resolve a schema node, following a `Named` reference to its
    /// registered definition.
    ///
    /// Returns `None` for a dangling reference, or for a placeholder that
    /// has not been filled in yet.
    pub fn resolve<'a>(&'a self, schema: &'a AvroSchema) -> Option<&'a AvroSchema> {
        match schema {
            AvroSchema::Named(name) => match self.named_types.get(name) {
                Some(AvroSchema::Named(_)) => None,
                other => other,
            },
            other => Some(other),
        }
    }

    /// Build a registry by extracting every named type from a schema.
    ///
    /// Used for programmatically constructed schemas that never went
    /// through the parser.
    pub fn collect_from(schema: &AvroSchema) -> Self {
        let mut registry = Self::new();
        registry.extract_named_types(schema);
        registry
    }

    fn extract_named_types(&mut self, schema: &AvroSchema) {
        match schema {
            AvroSchema::Record(record) => {
                self.named_types
                    .insert(record.fullname(), schema.clone());
                for field in &record.fields {
                    self.extract_named_types(&field.schema);
                }
            }
            AvroSchema::Enum(enum_schema) => {
                self.named_types
                    .insert(enum_schema.fullname(), schema.clone());
            }
            AvroSchema::Fixed(fixed_schema) => {
                self.named_types
                    .insert(fixed_schema.fullname(), schema.clone());
            }
            AvroSchema::Array(item_schema) => {
                self.extract_named_types(item_schema);
            }
            AvroSchema::Map(value_schema) => {
                self.extract_named_types(value_schema);
            }
            AvroSchema::Union(union) => {
                for branch in union.branches() {
                    self.extract_named_types(branch);
                }
            }
            // Primitives and references don't define named types
            _ => {}
        }
    }
}

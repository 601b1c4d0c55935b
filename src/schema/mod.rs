//! Avro schema types, parsing, and the named-type registry.

mod parser;
mod registry;
mod types;

pub use parser::SchemaParser;
pub use registry::SchemaRegistry;
pub use types::*;

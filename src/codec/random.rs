//! Random sample generation.
//!
//! Produces structurally valid values for any schema, as a testing aid.
//! Generation is depth-bounded: past the bound, containers come out empty
//! and unions prefer their null branch, so recursive schemas terminate.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::schema::{AvroSchema, SchemaRegistry};
use crate::value::Value;

const MAX_DEPTH: usize = 6;
const MAX_LEN: usize = 8;

/// Generate a structurally valid random value for the schema.
pub fn random_value<R: Rng + ?Sized>(
    schema: &AvroSchema,
    registry: &SchemaRegistry,
    rng: &mut R,
) -> Value {
    random_at(schema, registry, rng, 0)
}

fn random_at<R: Rng + ?Sized>(
    schema: &AvroSchema,
    registry: &SchemaRegistry,
    rng: &mut R,
    depth: usize,
) -> Value {
    match schema {
        AvroSchema::Null => Value::Null,
        AvroSchema::Boolean => Value::Boolean(rng.gen()),
        AvroSchema::Int => Value::Int(rng.gen()),
        AvroSchema::Long => Value::Long(rng.gen()),
        AvroSchema::Float => Value::Float((rng.gen::<f32>() - 0.5) * 1e6),
        AvroSchema::Double => Value::Double((rng.gen::<f64>() - 0.5) * 1e9),
        AvroSchema::Bytes => {
            let len = rng.gen_range(0..=MAX_LEN);
            Value::Bytes((0..len).map(|_| rng.gen()).collect())
        }
        AvroSchema::String => Value::String(random_string(rng)),

        AvroSchema::Enum(enum_schema) => {
            let symbol = enum_schema
                .symbols()
                .choose(rng)
                .expect("enum has at least one symbol");
            Value::String(symbol.clone())
        }

        AvroSchema::Fixed(fixed_schema) => {
            Value::Bytes((0..fixed_schema.size).map(|_| rng.gen()).collect())
        }

        AvroSchema::Array(item_schema) => {
            let len = if depth >= MAX_DEPTH {
                0
            } else {
                rng.gen_range(0..4)
            };
            Value::Array(
                (0..len)
                    .map(|_| random_at(item_schema, registry, rng, depth + 1))
                    .collect(),
            )
        }

        AvroSchema::Map(value_schema) => {
            let len = if depth >= MAX_DEPTH {
                0
            } else {
                rng.gen_range(0..4)
            };
            Value::Map(
                (0..len)
                    .map(|_| {
                        (
                            random_string(rng),
                            random_at(value_schema, registry, rng, depth + 1),
                        )
                    })
                    .collect(),
            )
        }

        AvroSchema::Record(record_schema) => Value::Record(
            record_schema
                .fields
                .iter()
                .map(|field| {
                    (
                        field.name.clone(),
                        random_at(&field.schema, registry, rng, depth + 1),
                    )
                })
                .collect(),
        ),

        AvroSchema::Union(union) => {
            let index = if depth >= MAX_DEPTH {
                union
                    .branch_index("null")
                    .unwrap_or_else(|| rng.gen_range(0..union.branches().len()))
            } else {
                rng.gen_range(0..union.branches().len())
            };
            let branch = &union.branches()[index];
            let inner = random_at(branch, registry, rng, depth + 1);
            if union.unwrapped || inner.is_null() {
                inner
            } else {
                Value::Union(union.branch_names()[index].clone(), Box::new(inner))
            }
        }

        AvroSchema::Named(_) => match registry.resolve(schema) {
            Some(resolved) => random_at(resolved, registry, rng, depth + 1),
            None => Value::Null,
        },
    }
}

fn random_string<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(0..=MAX_LEN);
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

//! Wire-format tests for the binary codec.
//!
//! Byte fixtures follow the Avro binary encoding: zig-zag varints for
//! int/long, little-endian IEEE floats, length-prefixed bytes/strings,
//! block-framed arrays/maps, and long index prefixes for unions.

use avrotype::{
    parse_schema, parse_schema_with_options, AvroError, AvroType, DecodeError, EncodeError,
    EncodeOptions, ParseOptions, Value,
};

fn unchecked() -> EncodeOptions {
    EncodeOptions {
        unchecked: true,
        ..Default::default()
    }
}

// ============================================================================
// Primitive Wire Formats
// ============================================================================

#[test]
fn test_int_wire_format() {
    let ty = parse_schema(r#""int""#).unwrap();

    for (value, bytes) in [
        (0, vec![0x00]),
        (-1, vec![0x01]),
        (1, vec![0x02]),
        (64, vec![0x80, 0x01]),
        (-64, vec![0x7F]),
    ] {
        assert_eq!(ty.encode(&Value::Int(value)).unwrap(), bytes, "encode {}", value);
        assert_eq!(ty.decode(&bytes).unwrap(), Value::Int(value), "decode {}", value);
    }
}

#[test]
fn test_long_full_range() {
    let ty = parse_schema(r#""long""#).unwrap();

    for value in [0, 1, -1, i64::MAX, i64::MIN, 1 << 40, -(1 << 40)] {
        let bytes = ty.encode(&Value::Long(value)).unwrap();
        assert_eq!(ty.decode(&bytes).unwrap(), Value::Long(value));
    }

    // i64::MAX and i64::MIN both take the full 10 bytes
    assert_eq!(ty.encode(&Value::Long(i64::MAX)).unwrap().len(), 10);
    assert_eq!(ty.encode(&Value::Long(i64::MIN)).unwrap().len(), 10);
}

#[test]
fn test_boolean_wire_format() {
    let ty = parse_schema(r#""boolean""#).unwrap();
    assert_eq!(ty.encode(&Value::Boolean(false)).unwrap(), [0x00]);
    assert_eq!(ty.encode(&Value::Boolean(true)).unwrap(), [0x01]);
    assert_eq!(ty.decode(&[0x01]).unwrap(), Value::Boolean(true));

    // Anything other than 0x00/0x01 is invalid
    assert!(matches!(
        ty.decode(&[0x02]),
        Err(DecodeError::InvalidData(_))
    ));
}

#[test]
fn test_null_wire_format() {
    let ty = parse_schema(r#""null""#).unwrap();
    assert_eq!(ty.encode(&Value::Null).unwrap(), Vec::<u8>::new());
    assert_eq!(ty.decode(&[]).unwrap(), Value::Null);
}

#[test]
fn test_string_wire_format() {
    let ty = parse_schema(r#""string""#).unwrap();
    assert_eq!(
        ty.encode(&Value::String("foo".to_string())).unwrap(),
        [0x06, 0x66, 0x6F, 0x6F]
    );
    assert_eq!(
        ty.decode(&[0x06, 0x66, 0x6F, 0x6F]).unwrap(),
        Value::String("foo".to_string())
    );
    assert_eq!(ty.encode(&Value::String(String::new())).unwrap(), [0x00]);
}

#[test]
fn test_bytes_wire_format() {
    let ty = parse_schema(r#""bytes""#).unwrap();
    assert_eq!(
        ty.encode(&Value::Bytes(vec![0xDE, 0xAD])).unwrap(),
        [0x04, 0xDE, 0xAD]
    );
    assert_eq!(
        ty.decode(&[0x04, 0xDE, 0xAD]).unwrap(),
        Value::Bytes(vec![0xDE, 0xAD])
    );
}

#[test]
fn test_float_wire_format() {
    let ty = parse_schema(r#""float""#).unwrap();
    // 1.0f32 is 0x3F800000, little-endian on the wire
    assert_eq!(
        ty.encode(&Value::Float(1.0)).unwrap(),
        [0x00, 0x00, 0x80, 0x3F]
    );
    assert_eq!(
        ty.decode(&[0x00, 0x00, 0x80, 0x3F]).unwrap(),
        Value::Float(1.0)
    );
}

#[test]
fn test_double_wire_format() {
    let ty = parse_schema(r#""double""#).unwrap();
    // 1.0f64 is 0x3FF0000000000000, little-endian on the wire
    assert_eq!(
        ty.encode(&Value::Double(1.0)).unwrap(),
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F]
    );
    let bytes = ty.encode(&Value::Double(-0.25)).unwrap();
    assert_eq!(ty.decode(&bytes).unwrap(), Value::Double(-0.25));
}

// ============================================================================
// Complex Wire Formats
// ============================================================================

#[test]
fn test_wrapped_union_wire_format() {
    let ty = parse_schema(r#"["null", "string"]"#).unwrap();

    assert_eq!(ty.encode(&Value::Null).unwrap(), [0x00]);
    assert_eq!(ty.decode(&[0x00]).unwrap(), Value::Null);

    let wrapped = Value::Union("string".to_string(), Box::new(Value::String("a".to_string())));
    assert_eq!(ty.encode(&wrapped).unwrap(), [0x02, 0x02, 0x61]);
    assert_eq!(ty.decode(&[0x02, 0x02, 0x61]).unwrap(), wrapped);
}

#[test]
fn test_record_wire_format() {
    let ty = parse_schema(
        r#"{
            "type": "record",
            "name": "Pair",
            "fields": [
                {"name": "a", "type": "int"},
                {"name": "b", "type": "string"}
            ]
        }"#,
    )
    .unwrap();

    let value = Value::Record(vec![
        ("a".to_string(), Value::Int(1)),
        ("b".to_string(), Value::String("x".to_string())),
    ]);

    assert_eq!(ty.encode(&value).unwrap(), [0x02, 0x02, 0x78]);
    assert_eq!(ty.decode(&[0x02, 0x02, 0x78]).unwrap(), value);
}

#[test]
fn test_array_wire_format() {
    let ty = parse_schema(r#"{"type": "array", "items": "long"}"#).unwrap();

    let value = Value::Array(vec![Value::Long(10), Value::Long(-1)]);
    assert_eq!(ty.encode(&value).unwrap(), [0x04, 0x14, 0x01, 0x00]);
    assert_eq!(ty.decode(&[0x04, 0x14, 0x01, 0x00]).unwrap(), value);

    // An empty array is a lone zero count
    assert_eq!(ty.encode(&Value::Array(vec![])).unwrap(), [0x00]);
    assert_eq!(ty.decode(&[0x00]).unwrap(), Value::Array(vec![]));
}

#[test]
fn test_array_decode_multiple_blocks() {
    let ty = parse_schema(r#"{"type": "array", "items": "long"}"#).unwrap();

    // Two blocks of one item each, then the terminator
    let data = [0x02, 0x14, 0x02, 0x01, 0x00];
    assert_eq!(
        ty.decode(&data).unwrap(),
        Value::Array(vec![Value::Long(10), Value::Long(-1)])
    );
}

#[test]
fn test_array_decode_negative_count_block() {
    let ty = parse_schema(r#"{"type": "array", "items": "long"}"#).unwrap();

    // count -2 (zig-zag 0x03), then a block byte size of 2, two items, terminator
    let data = [0x03, 0x04, 0x14, 0x01, 0x00];
    assert_eq!(
        ty.decode(&data).unwrap(),
        Value::Array(vec![Value::Long(10), Value::Long(-1)])
    );
}

#[test]
fn test_map_wire_format() {
    let ty = parse_schema(r#"{"type": "map", "values": "long"}"#).unwrap();

    let value = Value::Map(vec![("a".to_string(), Value::Long(1))]);
    // count 1, key "a", value 1, terminator
    assert_eq!(ty.encode(&value).unwrap(), [0x02, 0x02, 0x61, 0x02, 0x00]);
    assert_eq!(ty.decode(&[0x02, 0x02, 0x61, 0x02, 0x00]).unwrap(), value);

    assert_eq!(ty.encode(&Value::Map(vec![])).unwrap(), [0x00]);
}

#[test]
fn test_enum_wire_format() {
    let ty =
        parse_schema(r#"{"type": "enum", "name": "E", "symbols": ["A", "B", "C"]}"#).unwrap();

    assert_eq!(ty.encode(&Value::String("B".to_string())).unwrap(), [0x02]);
    assert_eq!(ty.decode(&[0x04]).unwrap(), Value::String("C".to_string()));

    // Unknown symbols are rejected before any bytes are produced
    assert!(matches!(
        ty.encode(&Value::String("Z".to_string())),
        Err(EncodeError::InvalidValue(_))
    ));
    // And on the write path itself when validation is skipped
    assert!(matches!(
        ty.encode_with_options(&Value::String("Z".to_string()), &unchecked()),
        Err(EncodeError::InvalidSymbol(_))
    ));

    // Out-of-range index on decode
    assert!(matches!(
        ty.decode(&[0x06]),
        Err(DecodeError::InvalidData(_))
    ));
}

#[test]
fn test_fixed_wire_format() {
    let ty = parse_schema(r#"{"type": "fixed", "name": "Two", "size": 2}"#).unwrap();

    assert_eq!(
        ty.encode(&Value::Bytes(vec![0xAB, 0xCD])).unwrap(),
        [0xAB, 0xCD]
    );
    assert_eq!(
        ty.decode(&[0xAB, 0xCD]).unwrap(),
        Value::Bytes(vec![0xAB, 0xCD])
    );

    // Wrong length fails validation
    assert!(ty.encode(&Value::Bytes(vec![0xAB])).is_err());
}

// ============================================================================
// Unions
// ============================================================================

#[test]
fn test_wrapped_union_named_branch() {
    let ty = parse_schema(
        r#"["null", {"type": "enum", "name": "Suit", "namespace": "cards", "symbols": ["S", "H"]}]"#,
    )
    .unwrap();

    let value = Value::Union(
        "cards.Suit".to_string(),
        Box::new(Value::String("H".to_string())),
    );
    let bytes = ty.encode(&value).unwrap();
    assert_eq!(bytes, [0x02, 0x02]);
    assert_eq!(ty.decode(&bytes).unwrap(), value);
}

#[test]
fn test_wrapped_union_unknown_branch() {
    let ty = parse_schema(r#"["null", "string"]"#).unwrap();

    let value = Value::Union("int".to_string(), Box::new(Value::Int(1)));
    assert!(!ty.validate(&value));
    assert!(matches!(
        ty.encode_with_options(&value, &unchecked()),
        Err(EncodeError::NoSuchBranch(_))
    ));
}

#[test]
fn test_union_without_null_branch_rejects_null() {
    let ty = parse_schema(r#"["int", "string"]"#).unwrap();
    assert!(!ty.validate(&Value::Null));
    assert!(matches!(
        ty.encode_with_options(&Value::Null, &unchecked()),
        Err(EncodeError::NoSuchBranch(_))
    ));
}

#[test]
fn test_union_decode_index_out_of_range() {
    let ty = parse_schema(r#"["null", "string"]"#).unwrap();
    assert!(matches!(
        ty.decode(&[0x04]),
        Err(DecodeError::InvalidData(_))
    ));
    // Negative index is equally invalid
    assert!(matches!(
        ty.decode(&[0x01]),
        Err(DecodeError::InvalidData(_))
    ));
}

#[test]
fn test_unwrapped_union_bare_values() {
    let opts = ParseOptions {
        unwrap_unions: true,
        ..Default::default()
    };
    let ty = parse_schema_with_options(r#"["null", "string"]"#, opts).unwrap();

    assert_eq!(ty.encode(&Value::Null).unwrap(), [0x00]);
    let bytes = ty.encode(&Value::String("a".to_string())).unwrap();
    assert_eq!(bytes, [0x02, 0x02, 0x61]);
    // Decoded values come back bare
    assert_eq!(ty.decode(&bytes).unwrap(), Value::String("a".to_string()));
}

#[test]
fn test_unwrapped_union_declaration_order_wins() {
    let opts = ParseOptions {
        unwrap_unions: true,
        ..Default::default()
    };
    let ty = parse_schema_with_options(
        r#"[{"type": "enum", "name": "E", "symbols": ["A", "B"]}, "string"]"#,
        opts,
    )
    .unwrap();

    // "A" is a symbol of E, so the enum branch wins
    assert_eq!(ty.encode(&Value::String("A".to_string())).unwrap(), [0x00, 0x00]);
    // "zzz" only matches the string branch
    assert_eq!(
        ty.encode(&Value::String("zzz".to_string())).unwrap(),
        [0x02, 0x06, 0x7A, 0x7A, 0x7A]
    );
}

#[test]
fn test_unwrapped_union_no_matching_branch() {
    let opts = ParseOptions {
        unwrap_unions: true,
        ..Default::default()
    };
    let ty = parse_schema_with_options(r#"["null", "string"]"#, opts).unwrap();
    assert!(matches!(
        ty.encode_with_options(&Value::Int(1), &unchecked()),
        Err(EncodeError::InvalidValue(_))
    ));
}

// ============================================================================
// Records: Defaults and Validation
// ============================================================================

#[test]
fn test_default_substitution_matches_explicit_value() {
    let ty = parse_schema(
        r#"{
            "type": "record",
            "name": "Config",
            "fields": [
                {"name": "name", "type": "string"},
                {"name": "retries", "type": "int", "default": 3}
            ]
        }"#,
    )
    .unwrap();

    let explicit = Value::Record(vec![
        ("name".to_string(), Value::String("job".to_string())),
        ("retries".to_string(), Value::Int(3)),
    ]);
    let missing = Value::Record(vec![(
        "name".to_string(),
        Value::String("job".to_string()),
    )]);

    assert!(ty.validate(&missing));
    assert_eq!(ty.encode(&missing).unwrap(), ty.encode(&explicit).unwrap());
}

#[test]
fn test_union_default_substitution() {
    let ty = parse_schema(
        r#"{
            "type": "record",
            "name": "R",
            "fields": [{"name": "tag", "type": ["null", "string"], "default": null}]
        }"#,
    )
    .unwrap();

    let missing = Value::Record(vec![]);
    assert_eq!(ty.encode(&missing).unwrap(), [0x00]);
}

#[test]
fn test_missing_field_without_default_fails() {
    let ty = parse_schema(
        r#"{
            "type": "record",
            "name": "R",
            "fields": [{"name": "x", "type": "int"}]
        }"#,
    )
    .unwrap();

    let value = Value::Record(vec![]);
    assert!(!ty.validate(&value));
    assert!(matches!(
        ty.encode_with_options(&value, &unchecked()),
        Err(EncodeError::InvalidValue(_))
    ));
}

#[test]
fn test_record_ignores_unknown_keys() {
    let ty = parse_schema(
        r#"{
            "type": "record",
            "name": "R",
            "fields": [{"name": "x", "type": "int"}]
        }"#,
    )
    .unwrap();

    let value = Value::Record(vec![
        ("x".to_string(), Value::Int(1)),
        ("extra".to_string(), Value::String("ignored".to_string())),
    ]);
    assert!(ty.validate(&value));
    assert_eq!(ty.encode(&value).unwrap(), [0x02]);
}

#[test]
fn test_recursive_record_round_trip() {
    let ty = parse_schema(
        r#"{
            "type": "record",
            "name": "LinkedList",
            "fields": [
                {"name": "value", "type": "int"},
                {"name": "next", "type": ["null", "LinkedList"]}
            ]
        }"#,
    )
    .unwrap();

    let tail = Value::Record(vec![
        ("value".to_string(), Value::Int(2)),
        ("next".to_string(), Value::Null),
    ]);
    let list = Value::Record(vec![
        ("value".to_string(), Value::Int(1)),
        (
            "next".to_string(),
            Value::Union("LinkedList".to_string(), Box::new(tail)),
        ),
    ]);

    assert!(ty.validate(&list));
    let bytes = ty.encode(&list).unwrap();
    assert_eq!(ty.decode(&bytes).unwrap(), list);
}

// ============================================================================
// Validation Behavior
// ============================================================================

#[test]
fn test_validate_is_strict_on_variants() {
    let ty = parse_schema(r#""long""#).unwrap();
    assert!(ty.validate(&Value::Long(1)));
    assert!(!ty.validate(&Value::Int(1)));

    let ty = parse_schema(r#""float""#).unwrap();
    assert!(ty.validate(&Value::Float(1.5)));
    assert!(!ty.validate(&Value::Float(f32::INFINITY)));
    assert!(!ty.validate(&Value::Float(f32::NAN)));

    let ty = parse_schema(r#""double""#).unwrap();
    assert!(ty.validate(&Value::Double(f64::NAN)));
}

#[test]
fn test_encode_rejects_invalid_value_before_writing() {
    let ty = parse_schema(r#""int""#).unwrap();
    assert!(matches!(
        ty.encode(&Value::String("nope".to_string())),
        Err(EncodeError::InvalidValue(_))
    ));
}

#[test]
fn test_unchecked_encode_can_produce_non_round_trippable_bytes() {
    let ty = parse_schema(r#"{"type": "fixed", "name": "Two", "size": 2}"#).unwrap();

    let short = Value::Bytes(vec![0xAB]);
    assert!(ty.encode(&short).is_err());

    // Unchecked writes the single byte raw; decoding wants two
    let bytes = ty.encode_with_options(&short, &unchecked()).unwrap();
    assert_eq!(bytes, [0xAB]);
    assert!(matches!(
        ty.decode(&bytes),
        Err(DecodeError::UnexpectedEof)
    ));
}

// ============================================================================
// Top-Level Codec Behavior
// ============================================================================

#[test]
fn test_truncated_buffer_fails_decode() {
    let ty = parse_schema(r#""string""#).unwrap();
    // Length byte says 3, but only 2 bytes follow
    assert!(matches!(
        ty.decode(&[0x06, 0x66, 0x6F]),
        Err(DecodeError::UnexpectedEof)
    ));

    let ty = parse_schema(r#""double""#).unwrap();
    assert!(matches!(
        ty.decode(&[0x00, 0x00]),
        Err(DecodeError::UnexpectedEof)
    ));
}

#[test]
fn test_trailing_bytes_are_left_unread() {
    let ty = parse_schema(r#""int""#).unwrap();
    assert_eq!(ty.decode(&[0x02, 0xFF, 0xFF]).unwrap(), Value::Int(1));
}

#[test]
fn test_encode_resizes_on_overflow() {
    let ty = parse_schema(r#""string""#).unwrap();
    let value = Value::String("a string much longer than the initial buffer".to_string());

    let opts = EncodeOptions {
        size: 1,
        ..Default::default()
    };
    let bytes = ty.encode_with_options(&value, &opts).unwrap();
    assert_eq!(bytes, ty.encode(&value).unwrap());
    assert_eq!(ty.decode(&bytes).unwrap(), value);
}

#[test]
fn test_encode_with_zero_sized_buffer() {
    let ty = parse_schema(r#"{"type": "array", "items": "int"}"#).unwrap();
    let value = Value::Array((0..100).map(Value::Int).collect());

    let opts = EncodeOptions {
        size: 0,
        ..Default::default()
    };
    let bytes = ty.encode_with_options(&value, &opts).unwrap();
    assert_eq!(ty.decode(&bytes).unwrap(), value);
}

#[test]
fn test_programmatic_schema_construction() {
    use avrotype::{AvroSchema, EnumSchema, FieldSchema, RecordSchema};

    let schema = AvroSchema::Record(RecordSchema::new(
        "Card",
        vec![
            FieldSchema::new(
                "suit",
                AvroSchema::Enum(EnumSchema::new(
                    "Suit",
                    vec!["SPADES".to_string(), "HEARTS".to_string()],
                )),
            ),
            FieldSchema::new("rank", AvroSchema::Int),
        ],
    ));

    let ty = AvroType::new(schema);
    assert!(ty.registry().contains("Suit"));

    let value = Value::Record(vec![
        ("suit".to_string(), Value::String("HEARTS".to_string())),
        ("rank".to_string(), Value::Int(11)),
    ]);
    let bytes = ty.encode(&value).unwrap();
    assert_eq!(bytes, [0x02, 0x16]);
    assert_eq!(ty.decode(&bytes).unwrap(), value);
}

#[test]
fn test_errors_aggregate_into_avro_error() -> Result<(), AvroError> {
    let ty = parse_schema(r#""int""#)?;
    let bytes = ty.encode(&Value::Int(7))?;
    assert_eq!(ty.decode(&bytes)?, Value::Int(7));
    Ok(())
}

#[test]
fn test_random_values_validate_and_round_trip() {
    for json in [
        r#""int""#,
        r#""string""#,
        r#"{"type": "array", "items": "double"}"#,
        r#"{"type": "map", "values": ["null", "long"]}"#,
        r#"{"type": "enum", "name": "E", "symbols": ["A", "B", "C"]}"#,
        r#"{"type": "fixed", "name": "F", "size": 4}"#,
        r#"{
            "type": "record",
            "name": "LinkedList",
            "fields": [
                {"name": "value", "type": "int"},
                {"name": "next", "type": ["null", "LinkedList"]}
            ]
        }"#,
    ] {
        let ty = parse_schema(json).unwrap();
        for _ in 0..20 {
            let value = ty.random();
            assert!(ty.validate(&value), "random value failed validation: {:?}", value);
            let bytes = ty.encode(&value).unwrap();
            assert_eq!(ty.decode(&bytes).unwrap(), value);
        }
    }
}

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::*;

fn roundtrip(value: &Value) -> Value {
    let bytes = encode(value).expect("encode failed");
    decode(&bytes).expect("decode failed")
}

// ============================================================================
//  LAYOUT
// ============================================================================

#[test]
fn test_scalar_layout() {
    assert_eq!(encode(&Value::Bool(true)).unwrap(), vec![0x01]);
    assert_eq!(encode(&Value::Bool(false)).unwrap(), vec![0x02]);
    assert_eq!(encode(&Value::Unit).unwrap(), vec![0x0E]);
    assert_eq!(encode(&Value::Option(None)).unwrap(), vec![0x0F]);
    assert_eq!(
        encode(&Value::U64(1)).unwrap(),
        vec![0x06, 1, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn test_string_layout() {
    let bytes = encode(&Value::str("hi")).unwrap();
    assert_eq!(bytes, vec![0x10, 2, 0, 0, 0, b'h', b'i']);
}

#[test]
fn test_record_layout_backpatches_length() {
    let value = Value::Record(vec![("a".into(), Value::Bool(true))]);
    let bytes = encode(&value).unwrap();

    // [Record][len=12][Variant][len=7][String][len=1]['a'][BoolTrue]
    assert_eq!(bytes[0], Tag::Record as u8);
    assert_eq!(&bytes[1..5], &12u32.to_le_bytes());
    assert_eq!(bytes[5], Tag::Variant as u8);
    assert_eq!(&bytes[6..10], &7u32.to_le_bytes());
    assert_eq!(bytes.len(), 17);
}

// ============================================================================
//  ROUND TRIPS
// ============================================================================

#[test]
fn test_roundtrip_scalars() {
    let values = [
        Value::Unit,
        Value::Bool(true),
        Value::U64(u64::MAX),
        Value::S64(i64::MIN),
        Value::F64(-0.5),
        Value::str(""),
        Value::str("héllo ✓"),
        Value::Bytes(vec![0, 1, 2, 255]),
    ];
    for v in &values {
        assert_eq!(&roundtrip(v), v);
    }
}

#[test]
fn test_roundtrip_nested() {
    let value = Value::Record(vec![
        ("name".into(), Value::str("helloService")),
        ("tags".into(), Value::List(vec![Value::U64(1), Value::S64(-1)])),
        ("maybe".into(), Value::some(Value::Option(None))),
        ("empty".into(), Value::Record(vec![])),
        ("case".into(), Value::variant("ok", Value::Unit)),
    ]);
    assert_eq!(roundtrip(&value), value);
}

fn random_value(rng: &mut StdRng, depth: usize) -> Value {
    let kinds = if depth >= 4 { 7 } else { 11 };
    match rng.gen_range(0..kinds) {
        0 => Value::Unit,
        1 => Value::Bool(rng.r#gen()),
        2 => Value::U64(rng.r#gen()),
        3 => Value::S64(rng.r#gen()),
        // Finite floats only: NaN never compares equal to itself.
        4 => Value::F64(rng.gen_range(-1e9..1e9)),
        5 => {
            let len = rng.gen_range(0..12);
            Value::Str((0..len).map(|_| rng.gen_range('a'..='z')).collect())
        }
        6 => {
            let len = rng.gen_range(0..16);
            Value::Bytes((0..len).map(|_| rng.r#gen()).collect())
        }
        7 => {
            let len = rng.gen_range(0..5);
            Value::List((0..len).map(|_| random_value(rng, depth + 1)).collect())
        }
        8 => {
            let len = rng.gen_range(0..5);
            Value::Record(
                (0..len)
                    .map(|i| (format!("f{i}"), random_value(rng, depth + 1)))
                    .collect(),
            )
        }
        9 => {
            if rng.r#gen() {
                Value::some(random_value(rng, depth + 1))
            } else {
                Value::Option(None)
            }
        }
        _ => Value::variant(format!("case{}", rng.gen_range(0..3)), random_value(rng, depth + 1)),
    }
}

#[test]
fn test_roundtrip_random_values() {
    let mut rng = StdRng::seed_from_u64(0x7717_b71d);
    for _ in 0..500 {
        let value = random_value(&mut rng, 0);
        assert_eq!(roundtrip(&value), value);
    }
}

// ============================================================================
//  BOUNDS
// ============================================================================

fn nested_lists(depth: usize) -> Value {
    let mut v = Value::Unit;
    for _ in 0..depth {
        v = Value::List(vec![v]);
    }
    v
}

#[test]
fn test_depth_limit_on_encode() {
    assert!(encode(&nested_lists(MAX_DEPTH)).is_ok());
    assert_eq!(encode(&nested_lists(MAX_DEPTH + 1)), Err(Error::DepthExceeded));
}

#[test]
fn test_depth_limit_on_decode() {
    // Hand-build a buffer nested one level too deep; the encoder refuses to.
    let mut bytes = vec![Tag::Unit as u8];
    for _ in 0..MAX_DEPTH + 1 {
        let mut outer = vec![Tag::List as u8];
        outer.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        outer.extend_from_slice(&bytes);
        bytes = outer;
    }
    assert_eq!(decode(&bytes), Err(Error::DepthExceeded));
}

#[test]
fn test_decode_rejects_malformed_input() {
    assert_eq!(decode(&[]), Err(Error::UnexpectedEnd));
    assert_eq!(decode(&[0xFF]), Err(Error::InvalidTag(0xFF)));
    assert_eq!(decode(&[0x06, 1, 2]), Err(Error::UnexpectedEnd));
    assert_eq!(decode(&[0x10, 9, 0, 0, 0, b'a']), Err(Error::UnexpectedEnd));
    assert_eq!(decode(&[0x10, 1, 0, 0, 0, 0xC3]), Err(Error::InvalidUtf8));
    assert_eq!(decode(&[0x0E, 0x0E]), Err(Error::TrailingBytes(1)));
}

#[test]
fn test_decode_rejects_non_variant_record_entry() {
    // Record body holding a bare bool instead of a named entry.
    let bytes = [0x21, 1, 0, 0, 0, 0x01];
    assert_eq!(decode(&bytes), Err(Error::MalformedEntry));
}

#[test]
fn test_decode_random_garbage_never_panics() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..2_000 {
        let len = rng.gen_range(0..32);
        let bytes: Vec<u8> = (0..len).map(|_| rng.r#gen()).collect();
        let _ = decode(&bytes);
    }
}

// ============================================================================
//  WIRE CONVERSIONS
// ============================================================================

#[test]
fn test_wire_integers_check_range() {
    assert_eq!(u8::from_value(Value::U64(255)), Ok(255));
    assert!(matches!(
        u8::from_value(Value::U64(256)),
        Err(Error::OutOfRange { ty: "u8", .. })
    ));
    assert_eq!(i32::from_value(Value::S64(-7)), Ok(-7));
    assert!(matches!(
        i32::from_value(Value::U64(7)),
        Err(Error::TypeMismatch { expected: "s64", found: "u64" })
    ));
}

#[test]
fn test_wire_containers() {
    let v: Vec<Option<String>> = vec![Some("a".into()), None];
    assert_eq!(Vec::<Option<String>>::from_value(v.to_value()), Ok(v));
}

#[test]
fn test_fields_take_and_ignore_unknown() {
    let value = Record::new()
        .field("message", &"hi".to_string())
        .field("extra", &3u32)
        .build();

    let mut fields = Fields::new(value).unwrap();
    assert_eq!(fields.take::<String>("message"), Ok("hi".to_string()));
    assert_eq!(fields.take_opt::<String>("absent"), Ok(None));
    assert_eq!(
        fields.take::<String>("message"),
        Err(Error::MissingField("message".into()))
    );
}

#[test]
fn test_fields_requires_record() {
    assert!(matches!(
        Fields::new(Value::Unit),
        Err(Error::TypeMismatch { expected: "record", found: "unit" })
    ));
}

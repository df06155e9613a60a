use std::collections::{BTreeMap, HashMap};
use std::error::Error as _;

use bytes::Bytes;
use num_bigint::BigInt;

use super::*;

fn dict(pairs: &[(&'static str, Value)]) -> Value {
    pairs
        .iter()
        .map(|&(k, ref v)| (Bytes::from_static(k.as_bytes()), v.clone()))
        .collect()
}

fn parsed(data: &[u8]) -> (Value, usize) {
    let Parsed { value, consumed } = decode(data).unwrap();
    (value, consumed)
}

// ----------------------------------------------------------------------------
// Byte strings
// ----------------------------------------------------------------------------

#[test]
fn test_decode_bytes() {
    assert_eq!(parsed(b"4:spam"), (Value::string("spam"), 6));
    assert_eq!(parsed(b"0:"), (Value::string(""), 2));
    assert_eq!(parsed(b"11:hello world"), (Value::string("hello world"), 14));
}

#[test]
fn test_decode_bytes_is_binary_transparent() {
    assert_eq!(parsed(b"4:\0\x01\x02\xff"), (Value::bytes(b"\0\x01\x02\xff"), 6));
    assert_eq!(parsed(b"4:1:23"), (Value::string("1:23"), 6));
    assert_eq!(parsed(b"4::spam"), (Value::string(":spa"), 6));
    // 4 bytes of UTF-8, not 4 characters
    assert_eq!(parsed("4:äö".as_bytes()), (Value::string("äö"), 6));
}

#[test]
fn test_decode_bytes_ignores_trailing_data() {
    assert_eq!(parsed(b"4:testextra"), (Value::string("test"), 6));
    assert_eq!(parsed(b"5:helloworld"), (Value::string("hello"), 7));
}

#[test]
fn test_decode_bytes_malformed_length() {
    for input in [
        &b"4spam"[..],
        b"0",
        b":spam",
        b"-1:spam",
        b"+4:spam",
        b"04:spam",
        b"00:spam",
        b"-0:spam",
        b"1a:spam",
        b"1.5:spam",
    ] {
        assert!(
            matches!(
                ByteStringCodec.decode(input),
                Err(BencodeError::MalformedLength { .. })
            ),
            "{:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_decode_bytes_truncated() {
    for input in [&b"5:spam"[..], b"10:hello", b"1:", b"3:ab"] {
        assert!(matches!(
            ByteStringCodec.decode(input),
            Err(BencodeError::TruncatedInput { .. })
        ));
    }

    let err = ByteStringCodec
        .decode(b"99999999999999999999999999:x")
        .unwrap_err();
    assert!(matches!(err, BencodeError::TruncatedInput { available: 1, .. }));
}

#[test]
fn test_decode_bytes_unrecognized() {
    assert!(matches!(
        ByteStringCodec.decode(b"spam"),
        Err(BencodeError::UnrecognizedInput { .. })
    ));
    assert!(matches!(
        ByteStringCodec.decode(b""),
        Err(BencodeError::UnexpectedEof)
    ));
}

#[test]
fn test_encode_bytes() {
    assert_eq!(encode(&Value::string("spam")).unwrap(), b"4:spam");
    assert_eq!(encode(&Value::string("")).unwrap(), b"0:");
    assert_eq!(encode(&Value::string("äö")).unwrap(), "4:äö".as_bytes());
    assert_eq!(
        ByteStringCodec.encode(&Value::bytes(&[0, 255])).unwrap(),
        b"2:\x00\xff"
    );
}

// ----------------------------------------------------------------------------
// Integers
// ----------------------------------------------------------------------------

#[test]
fn test_decode_integer() {
    assert_eq!(parsed(b"i42e"), (Value::from(42), 4));
    assert_eq!(parsed(b"i-42e"), (Value::from(-42), 5));
    assert_eq!(parsed(b"i0e"), (Value::from(0), 3));
    assert_eq!(parsed(b"i+0e"), (Value::from(0), 4));
    assert_eq!(parsed(b"i+123e"), (Value::from(123), 6));
    assert_eq!(parsed(b"i9e4:spam"), (Value::from(9), 3));
}

#[test]
fn test_decode_integer_invalid() {
    for input in [
        &b"i-0e"[..],
        b"i03e",
        b"i042e",
        b"ie",
        b"i1234",
        b"i--0e",
        b"i--123e",
        b"i++123e",
        b"i+001234e",
        b"i-001234e",
        b"i+05e",
        b"i-e",
        b"i+e",
        b"i4.2e",
        b"i 1e",
    ] {
        assert!(
            matches!(
                IntegerCodec.decode(input),
                Err(BencodeError::InvalidNumberLiteral { .. })
            ),
            "{:?}",
            String::from_utf8_lossy(input)
        );
    }
    assert!(!IntegerCodec.is_decodable(b"1234e"));
    assert!(!IntegerCodec.is_decodable(b""));
}

#[test]
fn test_decode_integer_arbitrary_precision() {
    let digits = "9".repeat(10000);
    let input = format!("i{}e", digits);
    let (value, consumed) = parsed(input.as_bytes());

    assert_eq!(consumed, input.len());
    assert_eq!(value.as_integer().unwrap().to_string(), digits);
    assert_eq!(value.as_i64(), None);
}

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&Value::from(42)).unwrap(), b"i42e");
    assert_eq!(encode(&Value::from(-42)).unwrap(), b"i-42e");
    assert_eq!(encode(&Value::from(0)).unwrap(), b"i0e");
    assert_eq!(
        encode(&Value::from(u64::MAX)).unwrap(),
        b"i18446744073709551615e"
    );

    let huge: BigInt = "-123456789012345678901234567890".parse().unwrap();
    assert_eq!(
        encode(&Value::from(huge)).unwrap(),
        b"i-123456789012345678901234567890e"
    );
}

#[test]
fn test_encode_integer_is_minimal() {
    let value = decode(b"i+7e").unwrap().value;
    assert_eq!(encode(&value).unwrap(), b"i7e");
}

// ----------------------------------------------------------------------------
// Lists
// ----------------------------------------------------------------------------

#[test]
fn test_decode_list() {
    let (value, consumed) = parsed(b"l4:spami42ee");
    assert_eq!(consumed, 12);
    match value {
        Value::List(l) => {
            assert_eq!(l.len(), 2);
            assert_eq!(l[0], Value::string("spam"));
            assert_eq!(l[1], Value::from(42));
        }
        _ => panic!("expected list"),
    }

    assert_eq!(parsed(b"le"), (Value::List(vec![]), 2));
    assert_eq!(
        parsed(b"li1ei2ee"),
        (Value::List(vec![Value::from(1), Value::from(2)]), 8)
    );
}

#[test]
fn test_decode_nested_list() {
    let (value, consumed) = parsed(b"lli1eed1:ai2eee4:tail");
    assert_eq!(consumed, 15);
    assert_eq!(
        value,
        Value::List(vec![
            Value::List(vec![Value::from(1)]),
            dict(&[("a", Value::from(2))]),
        ])
    );
}

#[test]
fn test_decode_list_unterminated() {
    for input in [&b"l"[..], b"li1e", b"l4:spam", b"li1ex", b"li-0ee", b"l3:abe"] {
        assert!(
            matches!(
                ListCodec.decode(input),
                Err(BencodeError::UnterminatedContainer {
                    kind: Kind::List,
                    ..
                })
            ),
            "{:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_unterminated_list_reports_item_failure() {
    let err = ListCodec.decode(b"li-0ee").unwrap_err();
    let cause = err.source().expect("nested cause");
    assert!(cause.to_string().contains("negative zero"));
}

#[test]
fn test_decode_list_is_greedy() {
    // "1:" claims the "e" that would close the list, leaving "1e" unparsable.
    assert!(!ListCodec.is_decodable(b"l1:e"));
    assert!(ListCodec.is_decodable(b"l1:ee"));
}

#[test]
fn test_encode_list() {
    let list = Value::List(vec![Value::string("spam"), Value::from(42)]);
    assert_eq!(encode(&list).unwrap(), b"l4:spami42ee");
    assert_eq!(encode(&Value::List(vec![])).unwrap(), b"le");
}

// ----------------------------------------------------------------------------
// Dictionaries
// ----------------------------------------------------------------------------

#[test]
fn test_decode_dict() {
    let (value, consumed) = parsed(b"d3:cow3:moo4:spam4:eggse");
    assert_eq!(consumed, 24);
    match value {
        Value::Dict(d) => {
            assert_eq!(d.len(), 2);
            assert_eq!(
                d.get(&Bytes::from_static(b"cow")),
                Some(&Value::string("moo"))
            );
        }
        _ => panic!("expected dict"),
    }
}

#[test]
fn test_decode_dict_fixtures() {
    let cases: Vec<(&str, Value, usize)> = vec![
        ("de", dict(&[]), 2),
        ("de1234", dict(&[]), 2),
        ("d0:0:e", dict(&[("", Value::string(""))]), 6),
        (
            "d1:a1:b1:c1:de",
            dict(&[("a", Value::string("b")), ("c", Value::string("d"))]),
            14,
        ),
        (
            "d2:k13:v112:k23:v2ee",
            dict(&[("k1", Value::string("v11")), ("k2", Value::string("v2e"))]),
            20,
        ),
        (
            "d1:5i25e1:a4:spam1:c3:fooe",
            dict(&[
                ("5", Value::from(25)),
                ("a", Value::string("spam")),
                ("c", Value::string("foo")),
            ]),
            26,
        ),
        (
            "d9:key:value5:helloe",
            dict(&[("key:value", Value::string("hello"))]),
            20,
        ),
        (
            "d3:fooi42ee123",
            dict(&[("foo", Value::from(42))]),
            11,
        ),
        (
            "d4:userd3:foo3:baree3:far",
            dict(&[("user", dict(&[("foo", Value::string("bar"))]))]),
            20,
        ),
        (
            "d3:cfgd4:host9:localhost4:porti8080ee2:ip9:127.0.0.1e",
            dict(&[
                (
                    "cfg",
                    dict(&[
                        ("host", Value::string("localhost")),
                        ("port", Value::from(8080)),
                    ]),
                ),
                ("ip", Value::string("127.0.0.1")),
            ]),
            53,
        ),
    ];

    for (input, expected, consumed) in cases {
        let result = DictionaryCodec.decode(input.as_bytes()).unwrap();
        assert_eq!(result.value, expected, "{}", input);
        assert_eq!(result.consumed, consumed, "{}", input);
    }
}

#[test]
fn test_decode_dict_out_of_order() {
    for input in [
        &b"d1:c1:d1:a1:be"[..],
        b"d3:foo3:bar1:a1:be",
        b"d1:z1:a1:a1:be",
    ] {
        assert!(matches!(
            decode(input),
            Err(BencodeError::OutOfOrderKey { .. })
        ));
    }
}

#[test]
fn test_decode_dict_orders_keys_by_raw_bytes() {
    assert!(DictionaryCodec.is_decodable(b"d1:Zi1e1:ai2ee"));
    assert!(DictionaryCodec.is_decodable(b"d1:a0:2:aa0:1:b0:e"));
    assert!(!DictionaryCodec.is_decodable(b"d1:ai2e1:Zi1ee"));
}

#[test]
fn test_decode_dict_duplicate_keys() {
    assert!(matches!(
        decode(b"d1:ai1e1:ai2ee"),
        Err(BencodeError::DuplicateKey { .. })
    ));

    let options = DecodeOptions::default().with_duplicate_keys(DuplicateKeys::LastWins);
    let result = decode_with(b"d1:ai1e1:ai2ee", &options).unwrap();
    assert_eq!(result.value, dict(&[("a", Value::from(2))]));
    assert_eq!(result.consumed, 14);
}

#[test]
fn test_decode_dict_invalid() {
    for input in [
        &b"d"[..],
        b"d3:foo3:bar",
        b"di42e3:bare",
        b"dl3:fooe3:bare",
        b"dde",
        b"d3:foo",
        b"d3:foo3:ba",
        b"d01:a3:bare",
        b"d3:fooi-0ee",
        b"d3:foo3:bar3:baz",
        b"d3:foodd3:bar3:bazee",
        b"d3:foole",
        b"dx3:bare",
    ] {
        assert!(
            !DictionaryCodec.is_decodable(input),
            "{:?}",
            String::from_utf8_lossy(input)
        );
    }
    assert!(!DictionaryCodec.is_decodable(b" d3:foo3:bare"));
    assert!(!DictionaryCodec.is_decodable(b"x3:foo3:bare"));
}

#[test]
fn test_encode_dict() {
    let mut dict = BTreeMap::new();
    dict.insert(Bytes::from_static(b"cow"), Value::string("moo"));
    let value = Value::Dict(dict);
    assert_eq!(encode(&value).unwrap(), b"d3:cow3:mooe");
}

#[test]
fn test_encode_dict_sorts_keys() {
    let value: Value = vec![("b", Value::string("y")), ("a", Value::string("x"))]
        .into_iter()
        .collect();
    assert_eq!(encode(&value).unwrap(), b"d1:a1:x1:b1:ye");

    let mut map = HashMap::new();
    for key in ["zeta", "alpha", "Mid", "a"] {
        map.insert(key, Value::from(key.len()));
    }
    assert_eq!(
        encode(&Value::from(map)).unwrap(),
        b"d3:Midi3e1:ai1e5:alphai5e4:zetai4ee"
    );
}

// ----------------------------------------------------------------------------
// Registry and top-level functions
// ----------------------------------------------------------------------------

#[test]
fn test_roundtrip() {
    // Keys must be sorted lexicographically for bencode roundtrip
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let decoded = decode_all(original).unwrap();
    let encoded = encode(&decoded).unwrap();
    assert_eq!(encoded, original);
}

#[test]
fn test_nested_structures() {
    let data = b"d4:listl4:spami42eee";
    let decoded = decode_all(data).unwrap();
    let encoded = encode(&decoded).unwrap();
    assert_eq!(encoded, data);
}

#[test]
fn test_trailing_data_error() {
    assert!(matches!(
        decode_all(b"i42eextra"),
        Err(BencodeError::TrailingData {
            consumed: 4,
            remaining: 5
        })
    ));
    assert_eq!(decode(b"i42eextra").unwrap().consumed, 4);
}

#[test]
fn test_decode_reports_claiming_codec_error() {
    assert!(matches!(
        decode(b"i-0e"),
        Err(BencodeError::InvalidNumberLiteral { .. })
    ));
    assert!(matches!(
        decode(b"5:spam"),
        Err(BencodeError::TruncatedInput { .. })
    ));
    assert!(matches!(
        decode(b"x"),
        Err(BencodeError::UnrecognizedInput { .. })
    ));
    assert!(matches!(decode(b""), Err(BencodeError::UnexpectedEof)));
    assert!(!is_decodable(b"e"));
}

#[test]
fn test_decoders_reject_other_kinds() {
    assert!(!ByteStringCodec.is_decodable(b"i1e"));
    assert!(!IntegerCodec.is_decodable(b"1:a"));
    assert!(!ListCodec.is_decodable(b"de"));
    assert!(!DictionaryCodec.is_decodable(b"le"));
}

#[test]
fn test_encoders_probe_without_failing() {
    let samples = [
        Value::string("spam"),
        Value::from(1),
        Value::List(vec![Value::from(1)]),
        dict(&[("a", Value::from(1))]),
    ];
    let encoders: [&dyn Encoder; 4] = [
        &ByteStringCodec,
        &IntegerCodec,
        &ListCodec,
        &DictionaryCodec,
    ];

    for encoder in encoders {
        for sample in &samples {
            let matches = encoder.kind() == sample.kind();
            assert_eq!(encoder.can_encode(sample), matches);

            match encoder.encode(sample) {
                Ok(_) => assert!(matches),
                Err(BencodeError::UnencodableValue { value, target }) => {
                    assert!(!matches);
                    assert_eq!(target, encoder.kind());
                    assert_eq!(value, sample.to_string());
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
    }
}

#[test]
fn test_unencodable_message_names_value_and_kind() {
    let err = IntegerCodec.encode(&Value::string("42")).unwrap_err();
    assert_eq!(err.to_string(), "cannot encode \"42\" as integer");

    let long = Value::string(&"x".repeat(100));
    let err = ListCodec.encode(&long).unwrap_err();
    assert!(err.to_string().ends_with("... as list"));
}

#[test]
fn test_encoder_writes_nothing_on_failure() {
    let mut out = b"prefix".to_vec();
    assert!(DictionaryCodec
        .encode_into(&Value::from(1), &mut out)
        .is_err());
    assert_eq!(out, b"prefix");
}

#[test]
fn test_encode_to_writer() {
    let mut out = Vec::new();
    encode_to(&Value::List(vec![Value::from(1)]), &mut out).unwrap();
    assert_eq!(out, b"li1ee");
    assert!(can_encode(&Value::string("")));
}

// ----------------------------------------------------------------------------
// Limits
// ----------------------------------------------------------------------------

#[test]
fn test_max_depth() {
    let options = DecodeOptions::default().with_max_depth(2);
    assert!(decode_with(b"llee", &options).is_ok());
    assert!(matches!(
        decode_with(b"llleee", &options),
        Err(BencodeError::NestingTooDeep { limit: 2 })
    ));
    assert!(matches!(
        decode_with(b"d1:ad1:bleee", &options),
        Err(BencodeError::NestingTooDeep { limit: 2 })
    ));
}

#[test]
fn test_untrusted_depth_limit() {
    let depth = crate::constants::UNTRUSTED_MAX_DEPTH;
    let nested = |n: usize| [vec![b'l'; n], vec![b'e'; n]].concat();

    let options = DecodeOptions::untrusted();
    assert!(decode_with(&nested(depth), &options).is_ok());
    let err = decode_with(&nested(depth + 1), &options).unwrap_err();
    assert!(err.is_limit());
}

#[test]
fn test_max_string_len() {
    let options = DecodeOptions::default().with_max_string_len(4);
    assert!(decode_with(b"4:spam", &options).is_ok());
    assert!(matches!(
        decode_with(b"l5:hello", &options),
        Err(BencodeError::LengthLimitExceeded {
            kind: Kind::ByteString,
            length: 5,
            limit: 4
        })
    ));
}

#[test]
fn test_max_integer_digits() {
    let options = DecodeOptions::default().with_max_integer_digits(3);
    assert!(decode_with(b"i-99e", &options).is_ok());
    assert!(matches!(
        decode_with(b"d1:ai1000ee", &options),
        Err(BencodeError::LengthLimitExceeded {
            kind: Kind::Integer,
            ..
        })
    ));
}

// ----------------------------------------------------------------------------
// Value
// ----------------------------------------------------------------------------

#[test]
fn test_value_accessors() {
    let value = Value::from(42);
    assert_eq!(value.as_i64(), Some(42));
    assert_eq!(value.as_integer(), Some(&BigInt::from(42)));
    assert!(value.as_bytes().is_none());

    let value = Value::string("test");
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    let value = Value::bytes(&[0xff, 0xfe]);
    assert!(value.as_str().is_none());
    assert_eq!(value.as_bytes().map(|b| b.len()), Some(2));

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());
    assert!(value.clone().into_dict().is_none());
}

#[test]
fn test_value_display() {
    let value = dict(&[(
        "k",
        Value::List(vec![Value::from(-1), Value::bytes(b"a\n")]),
    )]);
    assert_eq!(value.to_string(), "{\"k\": [-1, \"a\\n\"]}");
}

mod properties {
    use super::*;
    use proptest::collection::{btree_map, vec};
    use proptest::prelude::*;

    fn arb_bytes(max: usize) -> impl Strategy<Value = Bytes> {
        vec(any::<u8>(), 0..max).prop_map(Bytes::from)
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<u128>().prop_map(Value::from),
            arb_bytes(24).prop_map(Value::Bytes),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                vec(inner.clone(), 0..6).prop_map(Value::List),
                btree_map(arb_bytes(8), inner, 0..6).prop_map(Value::Dict),
            ]
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(value in arb_value()) {
            let encoded = encode(&value).unwrap();
            let Parsed { value: decoded, consumed } = decode(&encoded).unwrap();
            prop_assert_eq!(consumed, encoded.len());
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn canonical_encoding_is_idempotent(value in arb_value()) {
            let first = encode(&value).unwrap();
            let second = encode(&decode_all(&first).unwrap()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn decode_never_overruns(data in vec(any::<u8>(), 0..64)) {
            if let Ok(parsed) = decode(&data) {
                prop_assert!(parsed.consumed <= data.len());
                prop_assert!(parsed.consumed > 0);
            }
        }
    }
}

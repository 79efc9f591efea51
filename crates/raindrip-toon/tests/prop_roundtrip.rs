//! Property-based round-trip tests.
//!
//! Generates random JSON values and verifies that `decode(encode(v))`
//! reproduces `v` for all of them, plus determinism and output hygiene.
//!
//! Whole-valued floats are normalized before comparison: TOON prints
//! `2.0` as `2`, which decodes as an integer. That is the only
//! representational difference a round-trip introduces.

use proptest::prelude::*;
use raindrip_toon::{decode, encode};
use serde_json::{json, Map, Number, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,15}").unwrap()
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        // Plain ASCII
        "[a-zA-Z0-9 ]{0,30}",
        // Characters that force quoting in some or all positions
        prop::string::string_regex("[a-zA-Z0-9:,\\[\\]{}\\-\\. ]{0,20}").unwrap(),
        // Keyword and numeric lookalikes
        Just(String::new()),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
        Just("42".to_string()),
        Just("3.14".to_string()),
        Just("0".to_string()),
        Just("-1".to_string()),
        Just("05".to_string()),
        Just("007".to_string()),
        Just("1e5".to_string()),
        // Surrounding whitespace and hyphen prefix
        " [a-zA-Z]{1,10} ".prop_map(|s| s),
        Just("-hello".to_string()),
        Just("-".to_string()),
        // Unicode
        Just("café".to_string()),
        Just("你好".to_string()),
        // Escapable characters
        Just("line1\nline2".to_string()),
        Just("col1\tcol2".to_string()),
        Just("path\\to\\file".to_string()),
        Just("say \"hi\"".to_string()),
    ]
}

fn arb_integer() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1_000_000i64..1_000_000i64).prop_map(|n| Value::Number(Number::from(n))),
        (0u64..1000u64).prop_map(|n| Value::Number(Number::from(n))),
    ]
}

/// Floats built as mantissa / 10^n so they have short decimal forms and a
/// nonzero fractional part (whole values belong to `arb_integer`).
fn arb_float() -> impl Strategy<Value = Value> {
    (-100_000_000i64..100_000_000i64, 1u32..5u32).prop_filter_map(
        "must be fractional and finite",
        |(mantissa, decimals)| {
            let f = mantissa as f64 / 10f64.powi(decimals as i32);
            if !f.is_finite() || f.fract() == 0.0 {
                return None;
            }
            Number::from_f64(f).map(Value::Number)
        },
    )
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_string().prop_map(Value::String),
        arb_integer(),
        arb_float(),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ]
}

fn arb_flat_object() -> impl Strategy<Value = Value> {
    prop::collection::vec((arb_key(), arb_scalar()), 0..8).prop_map(|pairs| {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert(k, v);
        }
        Value::Object(map)
    })
}

fn arb_scalar_array() -> impl Strategy<Value = Value> {
    prop::collection::vec(arb_scalar(), 0..8).prop_map(Value::Array)
}

/// Uniform object arrays: same keys in the same order, scalar values only.
fn arb_tabular_array() -> impl Strategy<Value = Value> {
    (prop::collection::vec(arb_key(), 1..5), 1..6usize).prop_flat_map(|(keys, rows)| {
        let keys = {
            // Dedup while preserving order so every row has the same shape.
            let mut seen = std::collections::HashSet::new();
            keys.into_iter()
                .filter(|k| seen.insert(k.clone()))
                .collect::<Vec<_>>()
        };
        prop::collection::vec(
            prop::collection::vec(arb_scalar(), keys.len()..=keys.len()),
            rows..=rows,
        )
        .prop_map(move |rows| {
            Value::Array(
                rows.into_iter()
                    .map(|cells| {
                        let mut obj = Map::new();
                        for (k, v) in keys.iter().zip(cells) {
                            obj.insert(k.clone(), v);
                        }
                        Value::Object(obj)
                    })
                    .collect(),
            )
        })
    })
}

fn arb_value_inner(depth: u32) -> impl Strategy<Value = Value> {
    if depth == 0 {
        arb_scalar().boxed()
    } else {
        prop_oneof![
            4 => arb_scalar(),
            2 => prop::collection::vec((arb_key(), arb_value_inner(depth - 1)), 0..5)
                .prop_map(|pairs| {
                    let mut map = Map::new();
                    for (k, v) in pairs {
                        map.insert(k, v);
                    }
                    Value::Object(map)
                }),
            2 => prop::collection::vec(arb_value_inner(depth - 1), 0..5)
                .prop_map(Value::Array),
        ]
        .boxed()
    }
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_value_inner(3)
}

// ============================================================================
// Normalization
// ============================================================================

/// Collapse the whole-float/integer distinction (2.0 vs 2) that TOON's
/// number normalization erases by design.
fn normalize(v: &Value) -> Value {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::from(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::from(u))
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                let f = if f == 0.0 { 0.0 } else { f };
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Value::Number(Number::from(f as i64))
                } else {
                    Value::Number(Number::from_f64(f).unwrap_or_else(|| Number::from(0)))
                }
            }
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(normalize).collect()),
        other => other.clone(),
    }
}

fn assert_roundtrip(value: &Value) -> Result<(), TestCaseError> {
    let toon = encode(value).expect("encode failed");
    let back = decode(&toon)
        .unwrap_or_else(|e| panic!("decode failed:\n  value: {value}\n  TOON: {toon:?}\n  {e}"));
    prop_assert_eq!(
        normalize(value),
        normalize(&back),
        "round-trip mismatch:\n  value: {}\n  TOON: {:?}\n  back: {}",
        value,
        toon,
        back
    );
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn roundtrip_any_value(value in arb_value()) {
        assert_roundtrip(&value)?;
    }

    #[test]
    fn roundtrip_flat_object(value in arb_flat_object()) {
        assert_roundtrip(&value)?;
    }

    #[test]
    fn roundtrip_scalar_array(value in arb_scalar_array()) {
        assert_roundtrip(&value)?;
    }

    #[test]
    fn roundtrip_tabular_array(value in arb_tabular_array()) {
        assert_roundtrip(&json!({"data": value}))?;
    }

    /// Uniform object arrays must use the header+rows form, never the
    /// expanded list form.
    #[test]
    fn tabular_arrays_encode_as_tables(value in arb_tabular_array()) {
        let wrapped = json!({"data": value});
        let toon = encode(&wrapped).unwrap();
        prop_assert!(
            toon.starts_with("data[") && toon.contains("]{"),
            "expected tabular header in {:?}",
            toon
        );
        for line in toon.lines() {
            prop_assert!(
                !line.trim_start().starts_with("- "),
                "expected no list items in {:?}",
                toon
            );
        }
    }

    #[test]
    fn encoding_is_deterministic(value in arb_value()) {
        prop_assert_eq!(encode(&value).unwrap(), encode(&value).unwrap());
    }

    #[test]
    fn no_trailing_newline_or_spaces(value in arb_value()) {
        let toon = encode(&value).unwrap();
        prop_assert!(!toon.ends_with('\n'));
        for line in toon.lines() {
            prop_assert!(!line.ends_with(' '), "trailing space in {:?}", toon);
        }
    }

    /// Strings that merely look like other types always survive.
    #[test]
    fn lookalike_strings_preserved(s in prop_oneof![
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
        Just("42".to_string()),
        Just("3.14".to_string()),
        Just("0".to_string()),
        Just("-1".to_string()),
        Just("".to_string()),
        Just("05".to_string()),
        Just("007".to_string()),
    ]) {
        let value = json!({"key": s});
        let toon = encode(&value).unwrap();
        let back = decode(&toon).unwrap();
        prop_assert_eq!(value, back, "TOON was {:?}", toon);
    }
}

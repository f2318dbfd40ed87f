//! JSON conversion for decoded values.
//!
//! This module provides conversion from [`Value`] to JSON using serde_json.
//! Enable the `serde` feature to use this module.

use serde_json::{json, Map, Value as JsonValue};

use crate::types::{ArrayValue, Value};

/// Convert a decoded value to a JSON value.
///
/// # Mapping Rules
///
/// | Decoded value | JSON |
/// |---------------|------|
/// | `Null` | `null` |
/// | `Bool` | `boolean` |
/// | `Int` | `number` |
/// | `Float` | `number` (`null` for NaN, strings for ±infinity) |
/// | `String` | `string` (lossy UTF-8 conversion) |
/// | `Array` (sequence) | `array` |
/// | `Array` (mapping) | `object` |
///
/// Mapping keys convert lossily to strings; integer keys are stringified,
/// and entries with other key kinds are skipped.
///
/// # Example
///
/// ```rust
/// use php_unserialize_core::{decode, to_json};
///
/// let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
/// let value = decode(data).unwrap().unwrap();
/// assert_eq!(to_json(&value), serde_json::json!({"name": "Alice", "age": 30}));
/// ```
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => json!(*i),
        Value::Float(f) => {
            if f.is_nan() {
                JsonValue::Null
            } else if f.is_infinite() {
                if f.is_sign_positive() {
                    json!("Infinity")
                } else {
                    json!("-Infinity")
                }
            } else {
                json!(*f)
            }
        }
        Value::String(s) => JsonValue::String(String::from_utf8_lossy(s).into_owned()),
        Value::Array(ArrayValue::Sequence(values)) => {
            JsonValue::Array(values.iter().map(to_json).collect())
        }
        Value::Array(ArrayValue::Mapping(pairs)) => {
            let mut map = Map::new();
            for (k, v) in pairs {
                let key = match k {
                    Value::String(s) => String::from_utf8_lossy(s).into_owned(),
                    Value::Int(i) => i.to_string(),
                    _ => continue, // Skip invalid keys
                };
                map.insert(key, to_json(v));
            }
            JsonValue::Object(map)
        }
    }
}

/// Convert a decoded value to a JSON string.
///
/// # Example
///
/// ```rust
/// use php_unserialize_core::{decode, json::to_json_string};
///
/// let value = decode(b"a:1:{i:0;i:42;}").unwrap().unwrap();
/// assert_eq!(to_json_string(&value).unwrap(), "[42]");
/// ```
pub fn to_json_string(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string(&to_json(value))
}

/// Convert a decoded value to a pretty-printed JSON string.
pub fn to_json_string_pretty(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_json(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    fn decode_one(data: &[u8]) -> Value {
        decode(data).unwrap().unwrap()
    }

    #[test]
    fn test_simple_types() {
        assert_eq!(to_json(&Value::Null), JsonValue::Null);
        assert_eq!(to_json(&Value::Bool(true)), JsonValue::Bool(true));
        assert_eq!(to_json(&Value::Int(42)), json!(42));
        assert_eq!(to_json(&Value::Float(2.5)), json!(2.5));
        assert_eq!(to_json(&Value::Float(f64::NAN)), JsonValue::Null);
        assert_eq!(to_json(&Value::Float(f64::INFINITY)), json!("Infinity"));
    }

    #[test]
    fn test_sequence_becomes_array() {
        let value = decode_one(b"a:2:{i:0;s:3:\"foo\";i:1;s:3:\"bar\";}");
        assert_eq!(to_json(&value), json!(["foo", "bar"]));
    }

    #[test]
    fn test_mapping_becomes_object() {
        let value = decode_one(b"a:2:{s:4:\"name\";s:5:\"Alice\";s:3:\"age\";i:30;}");
        assert_eq!(to_json(&value), json!({"name": "Alice", "age": 30}));
    }

    #[test]
    fn test_int_keys_stringified() {
        let value = decode_one(b"a:2:{i:0;s:3:\"foo\";i:5;s:3:\"bar\";}");
        assert_eq!(to_json(&value), json!({"0": "foo", "5": "bar"}));
    }

    #[test]
    fn test_nested() {
        let value = decode_one(b"a:1:{s:4:\"user\";a:2:{s:4:\"name\";s:5:\"Alice\";s:3:\"age\";i:30;}}");
        assert_eq!(to_json(&value), json!({"user": {"name": "Alice", "age": 30}}));
    }

    #[test]
    fn test_object_flattened() {
        let value = decode_one(br#"O:8:"stdClass":1:{s:1:"k";b:1;}"#);
        assert_eq!(to_json(&value), json!({"k": true}));
    }
}

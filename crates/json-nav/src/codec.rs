//! Text serialization of documents.
//!
//! [`Value`] implements `serde` directly, so object member order and array
//! element order survive a round trip through any order-preserving format.
//! The [`Codec`] trait is the seam through which the workspace reads and
//! writes document text; [`JsonCodec`] is the JSON implementation.

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

use crate::config::EditorConfig;
use crate::error::{EncodeError, ParseError};
use crate::value::{Array, Object, Scalar, Value};

/// Converts between documents and their text form.
pub trait Codec {
    fn serialize(&self, value: &Value) -> Result<String, EncodeError>;
    fn deserialize(&self, text: &str) -> Result<Value, ParseError>;
}

/// JSON text via `serde_json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::pretty()
    }
}

impl From<&EditorConfig> for JsonCodec {
    fn from(config: &EditorConfig) -> Self {
        Self {
            pretty: config.pretty,
        }
    }
}

impl Codec for JsonCodec {
    fn serialize(&self, value: &Value) -> Result<String, EncodeError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }

    fn deserialize(&self, text: &str) -> Result<Value, ParseError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Serialize with the default (pretty) JSON codec.
pub fn serialize(value: &Value) -> Result<String, EncodeError> {
    JsonCodec::default().serialize(value)
}

/// Deserialize JSON text.
///
/// ```
/// use json_nav::codec;
///
/// let v = codec::deserialize(r#"{"z": 1, "a": [true, null]}"#).unwrap();
/// let text = codec::JsonCodec::compact();
/// assert_eq!(
///     codec::Codec::serialize(&text, &v).unwrap(),
///     r#"{"z":1,"a":[true,null]}"#
/// );
/// ```
pub fn deserialize(text: &str) -> Result<Value, ParseError> {
    JsonCodec::default().deserialize(text)
}

// ── serde ─────────────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Value::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Value::Scalar(Scalar::Number(n)) => n.serialize(serializer),
            Value::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::bool(b))
    }

    fn visit_i64<E>(self, n: i64) -> Result<Value, E> {
        Ok(Value::number(n))
    }

    fn visit_u64<E>(self, n: u64) -> Result<Value, E> {
        Ok(Value::number(n))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Value, E> {
        Number::from_f64(f)
            .map(|n| Value::Scalar(Scalar::Number(n)))
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::string(s))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::string(s))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::null())
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Array::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(Arc::new(items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Object::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Object(Arc::new(map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip_preserves_key_order() {
        let text = r#"{"zeta":1,"alpha":{"y":[3,2,1],"b":null},"mid":"s"}"#;
        let v = deserialize(text).unwrap();
        assert_eq!(JsonCodec::compact().serialize(&v).unwrap(), text);
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let v = Value::from(json!({"a": [1, 2.5, -3], "b": {"c": false}}));
        let text = serialize(&v).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(deserialize(&text).unwrap(), v);
    }

    #[test]
    fn test_computed_floats_roundtrip_exactly() {
        for f in [-262121.82751980482, 0.1 + 0.2, 1.0 / 3.0, 5e-324, -1.7976931348623157e308] {
            let v = Value::from_f64(f).unwrap();
            let text = JsonCodec::compact().serialize(&v).unwrap();
            let back = deserialize(&text).unwrap();
            assert_eq!(back, v, "text={text}");
        }
        let doc = Value::object([("x", Value::from_f64(-262121.82751980482).unwrap())]);
        assert_eq!(deserialize(&serialize(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn test_codec_follows_config() {
        let config = EditorConfig {
            pretty: false,
            ..EditorConfig::default()
        };
        assert_eq!(JsonCodec::from(&config), JsonCodec::compact());
        assert_eq!(JsonCodec::from(&EditorConfig::default()), JsonCodec::pretty());
    }

    #[test]
    fn test_top_level_scalars() {
        assert_eq!(deserialize("42").unwrap(), Value::from(42i64));
        assert_eq!(deserialize("\"x\"").unwrap(), Value::from("x"));
        assert_eq!(deserialize("null").unwrap(), Value::null());
    }

    #[test]
    fn test_invalid_text_is_parse_error() {
        let err = deserialize("{\"a\": [1, 2}").unwrap_err();
        assert_eq!(err.line(), 1);
        assert!(deserialize("").is_err());
    }

    #[test]
    fn test_duplicate_keys_keep_first_position_last_value() {
        let v = deserialize(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        assert_eq!(JsonCodec::compact().serialize(&v).unwrap(), r#"{"a":3,"b":2}"#);
    }
}

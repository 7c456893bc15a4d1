//! Value codec: typed records to store items and back.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Number, Value};
use tablewright_types::{AttributeValue, Item};

/// Errors from converting between records and items.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Only records that serialize to a map can be stored.
    #[error("record must serialize to a map, got {kind}")]
    NotAMap { kind: &'static str },

    /// A number attribute holds text that is not a number.
    #[error("attribute '{attribute}' holds an invalid number: '{value}'")]
    InvalidNumber { attribute: String, value: String },

    #[error("record serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Converts typed records to store items and back.
pub trait ValueCodec: Send + Sync {
    /// Marshals a record into an item.
    fn to_item<T: Serialize>(&self, record: &T) -> Result<Item, CodecError>;

    /// Unmarshals an item into a record.
    fn from_item<T: DeserializeOwned>(&self, item: &Item) -> Result<T, CodecError>;
}

/// Codec going through `serde_json::Value`.
///
/// | JSON | attribute |
/// |---|---|
/// | string | `S` |
/// | number | `N` |
/// | bool | `BOOL` |
/// | null | `NULL` |
/// | array | `L` |
/// | object | `M` |
///
/// Decoding also accepts sets (as arrays) and binary values (as base64 text).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    fn to_item<T: Serialize>(&self, record: &T) -> Result<Item, CodecError> {
        match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name, to_attribute(value)))
                .collect()),
            other => Err(CodecError::NotAMap {
                kind: json_kind(&other),
            }),
        }
    }

    fn from_item<T: DeserializeOwned>(&self, item: &Item) -> Result<T, CodecError> {
        let mut map = Map::with_capacity(item.len());
        for (name, value) in item {
            map.insert(name.clone(), from_attribute(name, value)?);
        }
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

fn to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => AttributeValue::L(values.into_iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.into_iter()
                .map(|(name, value)| (name, to_attribute(value)))
                .collect(),
        ),
    }
}

fn from_attribute(name: &str, value: &AttributeValue) -> Result<Value, CodecError> {
    Ok(match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(name, n)?),
        AttributeValue::B(bytes) => Value::String(STANDARD.encode(bytes)),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Ss(list) => Value::Array(list.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(list) => Value::Array(
            list.iter()
                .map(|n| parse_number(name, n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::Bs(list) => Value::Array(
            list.iter()
                .map(|bytes| Value::String(STANDARD.encode(bytes)))
                .collect(),
        ),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(|v| from_attribute(name, v))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(item) => {
            let mut map = Map::with_capacity(item.len());
            for (key, value) in item {
                map.insert(key.clone(), from_attribute(&format!("{name}.{key}"), value)?);
            }
            Value::Object(map)
        }
    })
}

fn parse_number(attribute: &str, text: &str) -> Result<Number, CodecError> {
    text.parse::<Number>()
        .map_err(|_| CodecError::InvalidNumber {
            attribute: attribute.to_string(),
            value: text.to_string(),
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

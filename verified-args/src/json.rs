//! JSON interop, enabled by the `serde` feature.
//!
//! JSON objects become [`Object`] values wrapping a `serde_json::Map`, so an
//! option can require one with `TypeTag::class::<serde_json::Map<String, serde_json::Value>>()`.
//! Nested objects are not resolved against the schema.
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value as Json};

use crate::error::ArgumentError;
use crate::resolver::{UnknownKeys, VerifiedArguments};
use crate::spec::Schema;
use crate::value::{Object, Value};

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Object(Object::new(map)),
        }
    }
}

impl TryFrom<&Value> for Json {
    type Error = ArgumentError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Integer(n) => Json::Number(Number::from(*n)),
            // Matches serde_json, which writes non-finite floats as null.
            Value::Float(n) => Number::from_f64(*n).map_or(Json::Null, Json::Number),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(Json::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Callable(_) => return Err(ArgumentError::NotSerializable("callable")),
            Value::Object(obj) => match obj.downcast_ref::<Map<String, Json>>() {
                Some(map) => Json::Object(map.clone()),
                None => return Err(ArgumentError::NotSerializable(obj.type_name())),
            },
        })
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Json::try_from(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl Serialize for VerifiedArguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl VerifiedArguments {
    /// Resolves a decoded JSON object against `schema`.
    pub fn from_json(
        raw: Map<String, Json>,
        schema: &Schema,
        unknown_keys: UnknownKeys,
    ) -> Result<Self, ArgumentError> {
        Self::with_policy(raw, schema, unknown_keys)
    }

    /// Converts every entry to JSON.
    ///
    /// Fails on the first callable or non-JSON object.
    pub fn to_json(&self) -> Result<Map<String, Json>, ArgumentError> {
        self.iter()
            .map(|(key, value)| Json::try_from(value).map(|json| (key.clone(), json)))
            .collect()
    }
}

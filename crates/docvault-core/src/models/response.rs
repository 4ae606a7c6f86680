use std::fmt;
use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::wire::is_truthy;

/// Envelope every backend endpoint answers with.
///
/// Built from any JSON value without rejecting it: the whole payload is kept
/// in [`ApiResponse::raw`], and `status`, `message` and `data` are read from
/// it leniently. A non-object payload reads as a failed call with no message.
/// A `message` that is not a string reads as `None`. `T` is the shape the
/// caller expects when it asks for [`ApiResponse::data`]. Any other
/// top-level fields are kept in `extra`.
pub struct ApiResponse<T = Value> {
    pub status: bool,
    pub message: Option<String>,
    pub data: Option<Value>,
    pub extra: Map<String, Value>,
    raw: Value,
    marker: PhantomData<fn() -> T>,
}

impl<T> ApiResponse<T> {
    pub fn from_value(raw: Value) -> Self {
        let mut extra = match &raw {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        let status = extra.remove("status").is_some_and(|v| is_truthy(&v));
        let message = match extra.remove("message") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let data = extra.remove("data");

        Self {
            status,
            message,
            data,
            extra,
            raw,
            marker: PhantomData,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status
    }

    /// Server message, or the given fallback
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
    }

    /// The payload exactly as the server sent it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The raw `data` payload
    pub fn raw_data(&self) -> Option<&Value> {
        self.data.as_ref().filter(|v| !v.is_null())
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decode `data` into the expected shape. `Ok(None)` when absent or null.
    pub fn data(&self) -> Result<Option<T>, serde_json::Error> {
        match self.raw_data() {
            Some(value) => T::deserialize(value).map(Some),
            None => Ok(None),
        }
    }
}

impl<T> From<Value> for ApiResponse<T> {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl<'de, T> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl<T> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<T> Clone for ApiResponse<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            message: self.message.clone(),
            data: self.data.clone(),
            extra: self.extra.clone(),
            raw: self.raw.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ApiResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResponse")
            .field("status", &self.status)
            .field("message", &self.message)
            .field("data", &self.data)
            .field("extra", &self.extra)
            .finish()
    }
}

impl<T> PartialEq for ApiResponse<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

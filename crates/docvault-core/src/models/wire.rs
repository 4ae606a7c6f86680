//! Serde helpers for the backend's loosely typed fields.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::utils::format::DATE_FORMAT;

/// `NaiveDate` as a DD-MM-YYYY string.
pub mod ddmmyyyy {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(de::Error::custom)
    }
}

/// Truthiness of the envelope `status` field: booleans, non-zero numbers,
/// and the strings "true", "success", "1" all count as success.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "success" | "1")
        }
        _ => false,
    }
}

fn value_to_string<E: de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(E::custom(format!("expected string or number, got {}", other))),
    }
}

/// Identifier that the backend sends as either a number or a string
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    value_to_string(value)?.ok_or_else(|| de::Error::custom("identifier must not be null"))
}

/// Optional identifier that may be a number, a string, or null
pub fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        Some(value) => value_to_string(value),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Envelope {
        #[serde(default, deserialize_with = "opt_string_or_number")]
        id: Option<String>,
    }

    fn parse(json: &str) -> Envelope {
        serde_json::from_str(json).expect("valid test JSON")
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("success")));
        assert!(is_truthy(&json!(" TRUE ")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("failed")));
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!({"ok": true})));
    }

    #[test]
    fn test_opt_string_or_number() {
        assert_eq!(parse(r#"{"id": 42}"#).id.as_deref(), Some("42"));
        assert_eq!(parse(r#"{"id": "u-7"}"#).id.as_deref(), Some("u-7"));
        assert_eq!(parse(r#"{"id": null}"#).id, None);
        assert_eq!(parse(r#"{}"#).id, None);
        assert!(serde_json::from_str::<Envelope>(r#"{"id": [1]}"#).is_err());
    }
}

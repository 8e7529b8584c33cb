use crate::domain::errors::RequestError;
use hyper::http::Uri;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Represents a validated absolute http(s) URL
#[derive(Debug, Clone)]
pub struct Url(pub Uri);

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL
    /// * `Err(RequestError::InvalidUrl)` - If the URL is empty or unparsable
    pub fn new(url: &str) -> Result<Self, RequestError> {
        let invalid = |reason: String| RequestError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        if url.is_empty() {
            return Err(invalid("URL cannot be empty".to_string()));
        }
        let uri = url.parse::<Uri>().map_err(|e| invalid(e.to_string()))?;
        Ok(Url(uri))
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    pub fn is_https(&self) -> bool {
        self.0.scheme_str() == Some("https")
    }
}

/// Represents a serialized JSON request body
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub String);

impl JsonBody {
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self, RequestError> {
        serde_json::to_string(value)
            .map(JsonBody)
            .map_err(|e| RequestError::InvalidBody(e.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A `--data` value after best-effort numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::Integer(n) => serializer.serialize_i64(*n),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
        }
    }
}

/// Ordered `key -> FieldValue` mapping built from `--data` pairs.
///
/// Re-inserting a key keeps its original position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields(Vec<(String, FieldValue)>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: FieldValue) {
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }
}

impl Serialize for FormFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A response body: decoded JSON when possible, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn decode(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(json) => Payload::Json(json),
            Err(_) => Payload::Text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_rejects_empty_input() {
        assert!(matches!(
            Url::new(""),
            Err(RequestError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn form_fields_keep_first_position_and_last_value() {
        let mut fields = FormFields::new();
        fields.insert("a".into(), FieldValue::Integer(1));
        fields.insert("b".into(), FieldValue::Text("x".into()));
        fields.insert("a".into(), FieldValue::Float(2.5));

        let body = JsonBody::from_value(&fields).unwrap();
        assert_eq!(body.0, r#"{"a":2.5,"b":"x"}"#);
    }

    #[test]
    fn unserializable_body_is_an_error() {
        let mut map = std::collections::BTreeMap::new();
        map.insert((1, 2), "tuple keys are not JSON object keys");

        assert!(matches!(
            JsonBody::from_value(&map),
            Err(RequestError::InvalidBody(_))
        ));
    }

    #[test]
    fn payload_falls_back_to_text() {
        assert_eq!(
            Payload::decode("plain words".into()),
            Payload::Text("plain words".into())
        );
        assert_eq!(
            Payload::decode("[1,2]".into()),
            Payload::Json(serde_json::json!([1, 2]))
        );
    }
}

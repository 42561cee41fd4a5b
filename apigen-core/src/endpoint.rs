//! Endpoint descriptors and their identity keys.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identity of an endpoint: normalized URL plus uppercased method.
///
/// Serialized as a two-element `[url, method]` array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct EndpointKey {
    url: String,
    method: String,
}

impl EndpointKey {
    /// Build a key, trimming the URL and uppercasing the method.
    pub fn new(url: impl AsRef<str>, method: impl AsRef<str>) -> Self {
        Self {
            url: url.as_ref().trim().to_string(),
            method: method.as_ref().trim().to_uppercase(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl From<(String, String)> for EndpointKey {
    fn from((url, method): (String, String)) -> Self {
        Self::new(url, method)
    }
}

impl From<EndpointKey> for (String, String) {
    fn from(key: EndpointKey) -> Self {
        (key.url, key.method)
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// One documented API operation.
///
/// Descriptors are read-only inputs; every string field defaults to empty
/// and numeric ids are accepted as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointDescriptor {
    #[serde(deserialize_with = "lenient_string")]
    pub method: String,

    #[serde(deserialize_with = "lenient_string")]
    pub url: String,

    #[serde(deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(deserialize_with = "lenient_string")]
    pub category: String,

    #[serde(deserialize_with = "lenient_string")]
    pub page_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,

    /// Request body description (`mode`, `json`, `urlencoded`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Response sample container (`responseExample`, `responseOriginal`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl EndpointDescriptor {
    /// Create a descriptor with the identifying fields set.
    pub fn new(method: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_page_id(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = page_id.into();
        self
    }

    pub fn key(&self) -> EndpointKey {
        EndpointKey::new(&self.url, &self.method)
    }
}

/// Accept strings, numbers, booleans and null as a string value.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(deserializer)?))
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_normalization() {
        let a = EndpointKey::new("  /user/info ", "get");
        let b = EndpointKey::new("/user/info", "GET");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "GET /user/info");
    }

    #[test]
    fn test_key_serializes_as_pair() {
        let key = EndpointKey::new("/a", "post");
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json, json!(["/a", "POST"]));

        let back: EndpointKey = serde_json::from_value(json!(["/a ", "post"])).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_descriptor_lenient_fields() {
        let descriptor: EndpointDescriptor = serde_json::from_value(json!({
            "method": "post",
            "url": "/user/login",
            "page_id": 1024,
            "category": null
        }))
        .unwrap();

        assert_eq!(descriptor.page_id, "1024");
        assert_eq!(descriptor.category, "");
        assert_eq!(descriptor.title, "");
        assert!(descriptor.body.is_none());
        assert_eq!(descriptor.key(), EndpointKey::new("/user/login", "POST"));
    }
}

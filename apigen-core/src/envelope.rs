//! Payload extraction from documented samples.
//!
//! Response samples are usually wrapped in a `{code, msg, data}` envelope and
//! may be stored under several keys. Request bodies come in one of three
//! documented modes. This module reduces both to the value the analyzers
//! should see.

use serde_json::{Map, Value};

use crate::request::ParamRecord;

/// Keys describing the request body itself rather than request fields.
const BODY_META_KEYS: [&str; 5] = ["mode", "urlencoded", "formdata", "json", "jsonDesc"];

/// Normalized request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    /// Sample JSON object (json mode, or a bare parameter object).
    Object(Map<String, Value>),
    /// Declared parameter list (urlencoded, formdata or jsonDesc).
    Params(Vec<ParamRecord>),
}

impl RequestPayload {
    pub fn is_empty(&self) -> bool {
        match self {
            RequestPayload::Object(map) => map.is_empty(),
            RequestPayload::Params(params) => params.is_empty(),
        }
    }
}

/// Extract the response payload from a response sample container.
///
/// Sources are tried in order: `responseExample` (JSON text),
/// `responseOriginal` (object), `responseText` (JSON text), then `example`
/// or `body`. A `{code, msg}` envelope without `data` yields `None`.
pub fn extract_response_payload(response: &Value) -> Option<Value> {
    let container = response.as_object()?;
    if container.is_empty() {
        return None;
    }

    if let Some(Value::String(text)) = container.get("responseExample") {
        if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(text) {
            if let Some(data) = parsed.get("data") {
                return Some(data.clone());
            }
            if is_envelope(&parsed) {
                return None;
            }
        }
    }

    if let Some(Value::Object(original)) = container.get("responseOriginal") {
        if let Some(data) = original.get("data") {
            return Some(data.clone());
        }
    }

    if let Some(Value::String(text)) = container.get("responseText") {
        if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(text) {
            if let Some(data) = parsed.get("data") {
                return Some(data.clone());
            }
        }
    }

    let example = container
        .get("example")
        .filter(|v| is_truthy(v))
        .or_else(|| container.get("body"));

    match example {
        Some(Value::Object(example)) => {
            if let Some(data) = example.get("data") {
                Some(data.clone())
            } else if is_envelope(example) {
                None
            } else {
                Some(Value::Object(example.clone()))
            }
        }
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(parsed)) => parsed.get("data").cloned(),
            _ => None,
        },
        _ => None,
    }
}

/// Full response sample text for doc comments, pretty-printed when it parses.
///
/// Prefers `responseExample`, then `responseOriginal`, then `responseText`.
pub fn response_sample_text(response: &Value) -> Option<String> {
    let container = response.as_object()?;
    let pretty = |text: &str| match serde_json::from_str::<Value>(text) {
        Ok(parsed) => serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    };

    if let Some(Value::String(text)) = container.get("responseExample") {
        if !text.trim().is_empty() {
            return Some(pretty(text.trim()));
        }
    }
    if let Some(original) = container.get("responseOriginal").filter(|v| is_truthy(v)) {
        if let Ok(text) = serde_json::to_string_pretty(original) {
            return Some(text);
        }
    }
    if let Some(Value::String(text)) = container.get("responseText") {
        if !text.trim().is_empty() {
            return Some(pretty(text.trim()));
        }
    }
    None
}

/// Whether an unwrapped payload carries nothing worth a schema.
///
/// Absent values, `null`, `{}`, `[]` and blank strings are empty.
pub fn is_empty_payload(payload: Option<&Value>) -> bool {
    match payload {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Normalize a request body description.
///
/// Returns `None` when the body yields neither a non-empty object nor a
/// non-empty parameter list.
pub fn extract_request_payload(body: &Value) -> Option<RequestPayload> {
    let body = body.as_object()?;
    if body.is_empty() {
        return None;
    }

    let mode = body
        .get("mode")
        .and_then(Value::as_str)
        .map(|m| m.trim().to_lowercase())
        .unwrap_or_default();

    let payload = if mode.is_empty() {
        let filtered: Map<String, Value> = body
            .iter()
            .filter(|(k, _)| !BODY_META_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        RequestPayload::Object(filtered)
    } else {
        match mode.as_str() {
            "json" => json_mode_payload(body)?,
            "urlencoded" => RequestPayload::Params(
                param_list(body.get("urlencoded"))
                    .into_iter()
                    .filter(|p| !p.is_disabled())
                    .collect(),
            ),
            "formdata" => RequestPayload::Params(param_list(body.get("formdata"))),
            other => {
                tracing::debug!(mode = %other, "unknown request body mode");
                return None;
            }
        }
    };

    (!payload.is_empty()).then_some(payload)
}

fn json_mode_payload(body: &Map<String, Value>) -> Option<RequestPayload> {
    if let Some(Value::String(text)) = body.get("json") {
        if !text.trim().is_empty() {
            if let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(text) {
                return Some(RequestPayload::Object(parsed));
            }
        }
    }

    let described = param_list(body.get("jsonDesc"));
    (!described.is_empty()).then_some(RequestPayload::Params(described))
}

/// Parse a parameter array, keeping records with a non-blank name.
fn param_list(value: Option<&Value>) -> Vec<ParamRecord> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(ParamRecord::from_value)
        .filter(|p| !p.name.trim().is_empty())
        .collect()
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("code") && map.contains_key("msg")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

//! Loading endpoint lists.
//!
//! Three document shapes are accepted:
//!
//! - a bare array of endpoint objects;
//! - `{"endpoints": [...]}`;
//! - a documentation tree export,
//!   `{"item_info": {...}, "categories": [{"cat_name", "pages", "children"}]}`.
//!
//! Tree pages are flattened depth-first. Each endpoint takes the name of the
//! category that lists it, while category filtering matches the top-level
//! category so that a matched subtree is kept whole.
//!
//! Duplicate endpoint keys are collapsed when endpoints are read, after any
//! category filter, so an endpoint listed under several categories survives
//! a filter that matches only one of them.

use std::collections::HashSet;
use std::path::Path;

use serde_json::{Map, Value};

use crate::endpoint::{value_to_string, EndpointDescriptor, EndpointKey};
use crate::error::SourceError;

/// Filter values that select every category.
const MATCH_ALL: [&str; 2] = ["all", "全部"];

#[derive(Debug, Clone)]
struct SourceEntry {
    endpoint: EndpointDescriptor,
    /// Category name matched by the category filter.
    group: String,
}

/// An endpoint list, deduplicated by key when read.
#[derive(Debug, Clone, Default)]
pub struct EndpointSource {
    entries: Vec<SourceEntry>,
    item_id: Option<String>,
    item_name: Option<String>,
}

impl EndpointSource {
    /// Read and parse an endpoint document.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::not_found(path));
        }
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| SourceError::invalid_json(path, e.to_string()))?;

        let source = Self::from_value(&value).map_err(|message| SourceError::unsupported(path, message))?;
        tracing::debug!(path = %path.display(), endpoints = source.len(), "loaded endpoints");
        Ok(source)
    }

    /// Parse an already-decoded document.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Array(items) => Ok(Self::from_flat(items)),
            Value::Object(doc) if doc.contains_key("categories") => Ok(Self::from_tree(doc)),
            Value::Object(doc) => match doc.get("endpoints") {
                Some(Value::Array(items)) => Ok(Self::from_flat(items)),
                Some(_) => Err("'endpoints' must be an array".to_string()),
                None => Err("expected an endpoint array, an 'endpoints' member or a 'categories' tree".to_string()),
            },
            _ => Err("expected a JSON array or object".to_string()),
        }
    }

    /// Build from descriptors. Duplicate keys keep the first occurrence.
    pub fn from_endpoints(endpoints: impl IntoIterator<Item = EndpointDescriptor>) -> Self {
        let mut source = Self::default();
        for endpoint in endpoints {
            let group = endpoint.category.clone();
            source.entries.push(SourceEntry { endpoint, group });
        }
        source
    }

    fn from_flat(items: &[Value]) -> Self {
        let endpoints = items.iter().filter_map(|item| {
            match serde_json::from_value::<EndpointDescriptor>(item.clone()) {
                Ok(endpoint) => Some(endpoint),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed endpoint");
                    None
                }
            }
        });
        Self::from_endpoints(endpoints)
    }

    fn from_tree(doc: &Map<String, Value>) -> Self {
        let info = doc.get("item_info").and_then(Value::as_object);
        let item_field = |key: &str| {
            info.and_then(|i| i.get(key))
                .map(value_to_string)
                .filter(|s| !s.is_empty())
        };

        let mut source = Self {
            entries: Vec::new(),
            item_id: item_field("item_id"),
            item_name: item_field("item_name"),
        };

        if let Some(Value::Array(categories)) = doc.get("categories") {
            for category in categories.iter().filter_map(Value::as_object) {
                let top = category_name(category);
                collect_category(category, &top, &mut source.entries);
            }
        }

        source
    }

    /// Entries in order, first occurrence of each key only.
    fn unique_entries(&self) -> impl Iterator<Item = &SourceEntry> {
        let mut seen: HashSet<EndpointKey> = HashSet::new();
        self.entries
            .iter()
            .filter(move |entry| seen.insert(entry.endpoint.key()))
    }

    /// Keep endpoints whose category contains `filter`, ignoring case.
    ///
    /// A blank filter, `all` or `全部` keeps everything.
    pub fn with_category_filter(mut self, filter: &str) -> Self {
        let needle = filter.trim().to_lowercase();
        if needle.is_empty() || MATCH_ALL.contains(&needle.as_str()) {
            return self;
        }
        self.entries
            .retain(|entry| entry.group.to_lowercase().contains(&needle));
        tracing::debug!(filter = %filter, kept = self.len(), "applied category filter");
        self
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.unique_entries().map(|e| &e.endpoint)
    }

    pub fn into_endpoints(self) -> Vec<EndpointDescriptor> {
        let mut seen: HashSet<EndpointKey> = HashSet::new();
        let before = self.entries.len();
        let endpoints: Vec<EndpointDescriptor> = self
            .entries
            .into_iter()
            .map(|e| e.endpoint)
            .filter(|endpoint| seen.insert(endpoint.key()))
            .collect();
        if endpoints.len() < before {
            tracing::debug!(dropped = before - endpoints.len(), "dropped duplicate endpoints");
        }
        endpoints
    }

    /// Documentation project id from a tree export.
    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    /// Documentation project name from a tree export.
    pub fn item_name(&self) -> Option<&str> {
        self.item_name.as_deref()
    }

    /// Number of distinct endpoints.
    pub fn len(&self) -> usize {
        self.unique_entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn category_name(category: &Map<String, Value>) -> String {
    category.get("cat_name").map(value_to_string).unwrap_or_default()
}

fn collect_category(category: &Map<String, Value>, top: &str, out: &mut Vec<SourceEntry>) {
    let name = category_name(category);

    if let Some(Value::Array(pages)) = category.get("pages") {
        for page in pages.iter().filter_map(Value::as_object) {
            if let Some(endpoint) = page_endpoint(page, &name) {
                out.push(SourceEntry {
                    endpoint,
                    group: top.to_string(),
                });
            }
        }
    }

    if let Some(Value::Array(children)) = category.get("children") {
        for child in children.iter().filter_map(Value::as_object) {
            collect_category(child, top, out);
        }
    }
}

/// Endpoint for one tree page, or `None` when the page is not an API page.
fn page_endpoint(page: &Map<String, Value>, category: &str) -> Option<EndpointDescriptor> {
    let api = page.get("api_info")?.as_object()?;
    let mut endpoint: EndpointDescriptor = match serde_json::from_value(Value::Object(api.clone())) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed api page");
            return None;
        }
    };

    // Exports keep headers, query and body under `request`.
    if let Some(request) = api.get("request").and_then(Value::as_object) {
        let take = |key: &str| request.get(key).filter(|v| !v.is_null()).cloned();
        endpoint.headers = endpoint.headers.or_else(|| take("headers"));
        endpoint.query = endpoint.query.or_else(|| take("query"));
        endpoint.body = endpoint.body.or_else(|| take("params"));
    }

    let page_title = page.get("page_title").map(value_to_string).unwrap_or_default();
    if !page_title.trim().is_empty() {
        endpoint.title = page_title;
    }
    if endpoint.page_id.is_empty() {
        endpoint.page_id = page.get("page_id").map(value_to_string).unwrap_or_default();
    }
    if endpoint.category.is_empty() {
        endpoint.category = category.to_string();
    }
    if endpoint.method.trim().is_empty() {
        endpoint.method = "GET".to_string();
    }

    Some(endpoint)
}

//! Client service operations.
//!
//! Each endpoint with a URL becomes one [`ServiceOperation`]: the call a
//! generated service interface exposes, with its HTTP method, path,
//! parameters, request body and response model. Renderers turn the list
//! into service, repository and HTTP client files.

use std::collections::HashSet;

use convert_case::{Case, Casing};
use serde_json::{Map, Value};

use crate::endpoint::{value_to_string, EndpointDescriptor, EndpointKey};
use crate::envelope::RequestPayload;
use crate::ir::{Direction, FieldType, Primitive};
use crate::naming::{pascal, path_params, url_method_name, url_path};
use crate::request::ParamRecord;

/// Bodies with fewer simple fields than this are sent as separate form
/// fields (or query parameters for `GET`).
pub const FORM_FIELD_LIMIT: usize = 5;

/// Member names the generated service and repository classes use
/// themselves.
const RESERVED_METHODS: [&str; 4] = ["request", "getInstance", "dio", "apiService"];

/// A generated model referenced by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelRef {
    pub name: String,
    /// Sanitized category folder of the model file.
    pub folder: String,
    pub direction: Direction,
}

impl ModelRef {
    pub fn new(name: impl Into<String>, folder: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            folder: folder.into(),
            direction,
        }
    }
}

/// A query, path or form parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceParam {
    /// Name on the wire.
    pub wire_name: String,
    /// Identifier used in generated signatures.
    pub ident: String,
    /// Nullable when the parameter is optional.
    pub ty: FieldType,
}

/// How an operation sends its request body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServiceBody {
    #[default]
    None,
    /// Individual form fields.
    Fields(Vec<ServiceParam>),
    /// A generated request model sent as JSON.
    Model(ModelRef),
}

/// One generated client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOperation {
    /// Method name, unique within the service.
    pub name: String,
    /// Uppercase HTTP method.
    pub http_method: String,
    /// Request path with a leading `/` and `{param}` placeholders.
    pub path: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub origin: EndpointKey,
    pub path_params: Vec<ServiceParam>,
    pub query: Vec<ServiceParam>,
    pub body: ServiceBody,
    /// Model wrapped in the response envelope, when one was generated.
    pub response: Option<ModelRef>,
}

impl ServiceOperation {
    pub fn form_fields(&self) -> &[ServiceParam] {
        match &self.body {
            ServiceBody::Fields(fields) => fields,
            _ => &[],
        }
    }

    pub fn request_model(&self) -> Option<&ModelRef> {
        match &self.body {
            ServiceBody::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Every parameter in signature order: path, query, form fields.
    pub fn params(&self) -> impl Iterator<Item = &ServiceParam> {
        self.path_params
            .iter()
            .chain(self.query.iter())
            .chain(self.form_fields().iter())
    }

    /// Models the operation refers to.
    pub fn models(&self) -> impl Iterator<Item = &ModelRef> {
        self.request_model().into_iter().chain(self.response.iter())
    }
}

/// Builds operations for one service, keeping method names unique.
#[derive(Debug)]
pub struct OperationBuilder {
    keywords: &'static [&'static str],
    taken: HashSet<String>,
}

impl OperationBuilder {
    pub fn new(keywords: &'static [&'static str]) -> Self {
        Self {
            keywords,
            taken: RESERVED_METHODS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Operation for `endpoint`, or `None` when it has no URL.
    ///
    /// `request` and `response` are the models generated for the endpoint.
    /// Small bodies of scalar fields become form fields; for `GET` they
    /// become query parameters and any other body is dropped.
    pub fn build(
        &mut self,
        endpoint: &EndpointDescriptor,
        payload: Option<&RequestPayload>,
        request: Option<ModelRef>,
        response: Option<ModelRef>,
    ) -> Option<ServiceOperation> {
        if endpoint.url.trim().is_empty() {
            return None;
        }

        let http_method = match endpoint.method.trim().to_uppercase() {
            m if m.is_empty() => "GET".to_string(),
            m => m,
        };
        let mut used: HashSet<String> = HashSet::new();

        let path_params: Vec<ServiceParam> = path_params(&endpoint.url)
            .into_iter()
            .map(|name| self.param(&name, FieldType::primitive(Primitive::String), &mut used))
            .collect();

        let mut query: Vec<ServiceParam> = query_records(endpoint.query.as_ref())
            .into_iter()
            .map(|record| self.param(&record.name, record.field_type(), &mut used))
            .collect();

        let fields = payload.and_then(simple_fields).map(|fields| {
            fields
                .into_iter()
                .map(|(name, ty)| self.param(&name, ty, &mut used))
                .collect::<Vec<_>>()
        });

        let body = match (fields, http_method.as_str()) {
            (Some(fields), "GET") => {
                query.extend(fields);
                ServiceBody::None
            }
            (Some(fields), _) => ServiceBody::Fields(fields),
            (None, "GET") => ServiceBody::None,
            (None, _) => request.map_or(ServiceBody::None, ServiceBody::Model),
        };

        let name = self.method_name(endpoint);
        Some(ServiceOperation {
            name,
            http_method,
            path: url_path(&endpoint.url),
            title: endpoint.title.trim().to_string(),
            description: endpoint.description.trim().to_string(),
            category: endpoint.category.trim().to_string(),
            origin: endpoint.key(),
            path_params,
            query,
            body,
            response,
        })
    }

    fn param(&self, wire_name: &str, ty: FieldType, used: &mut HashSet<String>) -> ServiceParam {
        let base = identifier(wire_name, self.keywords, "Param");
        let ident = unique(base, used);
        ServiceParam {
            wire_name: wire_name.to_string(),
            ident,
            ty,
        }
    }

    fn method_name(&mut self, endpoint: &EndpointDescriptor) -> String {
        let from_title = || {
            let title = endpoint.title.trim();
            (!title.is_empty()).then(|| pascal(title).to_case(Case::Camel))
        };
        let base = url_method_name(&endpoint.url)
            .or_else(from_title)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("{}Request", endpoint.method.trim().to_lowercase()));

        let base = identifier(&base, self.keywords, "Method");
        unique(base, &mut self.taken)
    }
}

/// camelCase identifier for `text`, suffixed when it is a keyword.
pub fn identifier(text: &str, keywords: &[&str], keyword_suffix: &str) -> String {
    let mut name = pascal(text).to_case(Case::Camel);
    if name.is_empty() {
        name = "value".to_string();
    }
    if keywords.contains(&name.as_str()) {
        name.push_str(keyword_suffix);
    }
    if !name.chars().next().is_some_and(char::is_alphabetic) {
        name.insert(0, 'a');
    }
    name
}

fn unique(base: String, used: &mut HashSet<String>) -> String {
    let name = if used.contains(&base) {
        (2..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !used.contains(candidate))
            .unwrap_or_default()
    } else {
        base
    };
    used.insert(name.clone());
    name
}

/// Declared query parameters; entries may name themselves with `key`.
fn query_records(query: Option<&Value>) -> Vec<ParamRecord> {
    let Some(Value::Array(items)) = query else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let mut record = ParamRecord::from_value(item)?;
            if record.name.trim().is_empty() {
                record.name = item.get("key").map(value_to_string).unwrap_or_default();
            }
            (!record.name.trim().is_empty() && !record.is_disabled()).then_some(record)
        })
        .collect()
}

/// Form fields for a body of fewer than [`FORM_FIELD_LIMIT`] scalar
/// fields, `None` otherwise.
fn simple_fields(payload: &RequestPayload) -> Option<Vec<(String, FieldType)>> {
    let fields: Vec<(String, FieldType)> = match payload {
        RequestPayload::Params(params) => params
            .iter()
            .filter(|p| !p.is_disabled())
            .map(|p| {
                let ty = p.field_type();
                scalar_param(&ty).then(|| (p.name.clone(), ty))
            })
            .collect::<Option<_>>()?,
        RequestPayload::Object(map) => scalar_object(map)?,
    };
    (!fields.is_empty() && fields.len() < FORM_FIELD_LIMIT).then_some(fields)
}

fn scalar_param(ty: &FieldType) -> bool {
    matches!(
        ty.kind,
        crate::ir::FieldKind::Primitive(
            Primitive::String
                | Primitive::Int
                | Primitive::Long
                | Primitive::Float
                | Primitive::Double
                | Primitive::Boolean
        )
    )
}

fn scalar_object(map: &Map<String, Value>) -> Option<Vec<(String, FieldType)>> {
    map.iter()
        .map(|(key, value)| {
            let ty = match value {
                Value::Null => FieldType::primitive(Primitive::String).as_nullable(),
                Value::Bool(_) => FieldType::primitive(Primitive::Boolean),
                Value::Number(n) if n.is_i64() || n.is_u64() => {
                    let fits = n.as_i64().is_some_and(|v| i32::try_from(v).is_ok());
                    FieldType::primitive(if fits { Primitive::Int } else { Primitive::Long })
                }
                Value::Number(_) => FieldType::primitive(Primitive::Double),
                Value::String(_) => FieldType::primitive(Primitive::String),
                Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key.clone(), ty))
        })
        .collect()
}

//! Request schemas built from declared parameter lists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoint::{lenient_string, value_to_string};
use crate::ir::{FieldType, Primitive, TypeSchema};

/// One declared request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Declared type, e.g. `string`, `int`, `file`.
    #[serde(rename = "type", default = "default_type", deserialize_with = "lenient_string")]
    pub declared_type: String,

    /// `"1"` when the parameter is mandatory.
    #[serde(alias = "require", default = "default_required", deserialize_with = "lenient_string")]
    pub required: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub disable: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub remark: String,
}

fn default_type() -> String {
    "string".to_string()
}

fn default_required() -> String {
    "1".to_string()
}

impl ParamRecord {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            required: if required { "1" } else { "0" }.to_string(),
            disable: String::new(),
            remark: String::new(),
        }
    }

    /// Parse a record leniently; non-object values are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let field = |key: &str| map.get(key).map(value_to_string);
        Some(Self {
            name: field("name").unwrap_or_default(),
            declared_type: field("type").unwrap_or_else(default_type),
            required: field("required")
                .or_else(|| field("require"))
                .unwrap_or_else(default_required),
            disable: field("disable").unwrap_or_default(),
            remark: field("remark").unwrap_or_default(),
        })
    }

    pub fn is_required(&self) -> bool {
        self.required.trim() == "1"
    }

    pub fn is_disabled(&self) -> bool {
        self.disable.trim() == "1"
    }

    /// Field type for this parameter.
    pub fn field_type(&self) -> FieldType {
        let ty = match Primitive::from_declared(&self.declared_type) {
            Some(primitive) => FieldType::primitive(primitive),
            None => FieldType::array(FieldType::primitive(Primitive::Any)),
        };
        if self.is_required() {
            ty
        } else {
            ty.as_nullable()
        }
    }
}

/// Builds flat request schemas from parameter lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestSchemaBuilder;

impl RequestSchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a schema with one field per named parameter, in list order.
    pub fn build(&self, params: &[ParamRecord]) -> TypeSchema {
        let mut schema = TypeSchema::new();
        for param in params {
            let name = param.name.trim();
            if name.is_empty() {
                continue;
            }
            schema.insert(name, param.field_type());
        }
        schema
    }
}

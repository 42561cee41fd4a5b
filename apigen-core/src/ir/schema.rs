//! Schema containers.
//!
//! [`TypeSchema`] keeps fields in the order they were first seen in the
//! sample payload so rendered classes follow the documented field order.
//! [`NestedTypes`] is the per-bundle registry of extracted object types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::FieldType;
use crate::endpoint::EndpointKey;

/// Ordered mapping of field name to field type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    fields: Vec<(String, FieldType)>,
}

impl TypeSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. A repeated name replaces the earlier type in place.
    pub fn insert(&mut self, name: impl Into<String>, ty: FieldType) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = ty,
            None => self.fields.push((name, ty)),
        }
    }

    /// Look up a field type by name.
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, ty)| ty)
    }

    /// Iterate over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Field names in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of all nested types referenced by this schema's fields.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|(_, ty)| ty.reference_name())
    }
}

/// A named object type extracted from a sample value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedTypeDef {
    pub name: String,
    pub schema: TypeSchema,
}

impl NestedTypeDef {
    pub fn new(name: impl Into<String>, schema: TypeSchema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Registry of nested type definitions for one bundle.
///
/// Definitions keep their first registration order; registering a name that
/// already exists replaces that definition in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedTypes {
    defs: Vec<NestedTypeDef>,
}

impl NestedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.
    pub fn register(&mut self, def: NestedTypeDef) {
        match self.defs.iter_mut().find(|d| d.name == def.name) {
            Some(slot) => *slot = def,
            None => self.defs.push(def),
        }
    }

    /// Register every definition of `other`, in its order.
    pub fn merge(&mut self, other: NestedTypes) {
        for def in other.defs {
            self.register(def);
        }
    }

    pub fn get(&self, name: &str) -> Option<&NestedTypeDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NestedTypeDef> {
        self.defs.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.defs.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Which side of an endpoint a bundle describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    /// Folder name used in artifact paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root schema plus the nested definitions inferred from one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBundle {
    /// Resolved type name of the root class.
    pub name: String,

    pub root: TypeSchema,

    pub nested: NestedTypes,

    /// Display name of the owning category.
    pub category: String,

    pub direction: Direction,

    /// Endpoint this bundle was generated from.
    pub origin: EndpointKey,

    /// Endpoint title, used in rendered doc comments.
    #[serde(default)]
    pub title: String,

    /// Documentation page id, used for doc links.
    #[serde(default)]
    pub page_id: String,

    /// Raw sample text shown in rendered doc comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

impl TypeBundle {
    /// Reference names (root or nested) that have no definition in this
    /// bundle.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        let schemas = std::iter::once(&self.root).chain(self.nested.iter().map(|d| &d.schema));
        for schema in schemas {
            for name in schema.references() {
                if !self.nested.contains(name) && !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
            }
        }
        missing
    }
}

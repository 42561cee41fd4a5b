//! Field type definitions.
//!
//! These types describe inferred JSON shapes independent of any target
//! language. Renderers map them to concrete source types.

use serde::{Deserialize, Serialize};

/// Type of a single schema field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    /// The kind of value held by the field.
    pub kind: FieldKind,

    /// Whether the field may be absent or null.
    pub nullable: bool,
}

impl FieldType {
    /// Create a non-nullable field type.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// Create a nullable field type.
    pub fn nullable(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }

    /// Non-nullable primitive.
    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(FieldKind::Primitive(primitive))
    }

    /// Non-nullable array of `element`.
    pub fn array(element: FieldType) -> Self {
        Self::new(FieldKind::Array(Box::new(element)))
    }

    /// Non-nullable reference to a nested type.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(FieldKind::Reference(name.into()))
    }

    /// The untyped value used for `null` samples.
    pub fn untyped() -> Self {
        Self::nullable(FieldKind::Primitive(Primitive::Any))
    }

    /// Mark this type as nullable.
    #[allow(clippy::wrong_self_convention)]
    pub fn as_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Nested type name referenced by this field at any array depth.
    pub fn reference_name(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Reference(name) => Some(name),
            FieldKind::Array(element) => element.reference_name(),
            FieldKind::Primitive(_) => None,
        }
    }
}

/// Kind of a field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FieldKind {
    /// Scalar or opaque value.
    Primitive(Primitive),

    /// Homogeneous list; the element type is inferred from the first sample.
    Array(Box<FieldType>),

    /// Reference to a nested type defined in the same bundle.
    Reference(String),
}

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    String,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    /// Free-form object whose shape was not sampled.
    Object,
    /// Uploaded file (multipart requests).
    File,
    /// Untyped value.
    Any,
}

impl Primitive {
    /// Look up the primitive for a declared parameter type.
    ///
    /// Unknown declarations fall back to [`Primitive::String`]. `array`/`list`
    /// are not primitives and return `None`; callers map them to an array of
    /// [`Primitive::Any`].
    pub fn from_declared(declared: &str) -> Option<Self> {
        match declared.trim().to_lowercase().as_str() {
            "array" | "list" => None,
            "int" | "integer" => Some(Primitive::Int),
            "long" => Some(Primitive::Long),
            "float" => Some(Primitive::Float),
            "double" => Some(Primitive::Double),
            "boolean" | "bool" => Some(Primitive::Boolean),
            "object" | "json" => Some(Primitive::Object),
            "file" => Some(Primitive::File),
            _ => Some(Primitive::String),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_name_through_arrays() {
        let ty = FieldType::array(FieldType::array(FieldType::reference("TagBean")));
        assert_eq!(ty.reference_name(), Some("TagBean"));
        assert_eq!(FieldType::primitive(Primitive::Int).reference_name(), None);
    }

    #[test]
    fn test_untyped_is_nullable_any() {
        let ty = FieldType::untyped();
        assert!(ty.nullable);
        assert_eq!(ty.kind, FieldKind::Primitive(Primitive::Any));
    }

    #[test]
    fn test_declared_type_lookup() {
        assert_eq!(Primitive::from_declared("String"), Some(Primitive::String));
        assert_eq!(Primitive::from_declared(" INT "), Some(Primitive::Int));
        assert_eq!(Primitive::from_declared("integer"), Some(Primitive::Int));
        assert_eq!(Primitive::from_declared("bool"), Some(Primitive::Boolean));
        assert_eq!(Primitive::from_declared("json"), Some(Primitive::Object));
        assert_eq!(Primitive::from_declared("file"), Some(Primitive::File));
        assert_eq!(Primitive::from_declared("list"), None);
        assert_eq!(Primitive::from_declared("uuid"), Some(Primitive::String));
    }
}

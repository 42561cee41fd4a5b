//! Schema inference from sample JSON values.
//!
//! Every object found in a sample becomes a nested type named after the
//! field that holds it. Arrays are typed by their first element only.

use serde_json::{Map, Number, Value};

use crate::ir::{FieldType, NestedTypeDef, NestedTypes, Primitive, TypeSchema};
use crate::naming::NameResolver;

/// Root schema and nested definitions inferred from one sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub root: TypeSchema,
    pub nested: NestedTypes,
}

impl Analysis {
    /// An analysis with no root fields produces no artifact.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Infers schemas, naming nested types through a [`NameResolver`].
pub struct SchemaAnalyzer<'a> {
    resolver: &'a mut NameResolver,
}

impl<'a> SchemaAnalyzer<'a> {
    pub fn new(resolver: &'a mut NameResolver) -> Self {
        Self { resolver }
    }

    /// Analyze a sample value for the type named `base_name`.
    ///
    /// Objects become the root schema; a non-empty array whose first element
    /// is an object is analyzed through that element. Any other value yields
    /// an empty analysis.
    pub fn analyze(&mut self, value: &Value, base_name: &str) -> Analysis {
        match value {
            Value::Object(map) => {
                let mut nested = NestedTypes::new();
                let root = self.object_schema(map, base_name, &mut nested);
                Analysis { root, nested }
            }
            Value::Array(items) => match items.first() {
                Some(first @ Value::Object(_)) => self.analyze(first, base_name),
                Some(first) => {
                    tracing::debug!(
                        base = %base_name,
                        element = value_kind(first),
                        "top-level array has no object elements"
                    );
                    Analysis::default()
                }
                None => Analysis::default(),
            },
            other => {
                tracing::debug!(base = %base_name, kind = value_kind(other), "top-level sample is not an object");
                Analysis::default()
            }
        }
    }

    fn object_schema(
        &mut self,
        map: &Map<String, Value>,
        base_name: &str,
        nested: &mut NestedTypes,
    ) -> TypeSchema {
        let mut schema = TypeSchema::new();
        for (key, value) in map {
            let ty = self.value_type(value, Some(key), base_name, nested);
            schema.insert(key.clone(), ty);
        }
        schema
    }

    fn value_type(
        &mut self,
        value: &Value,
        field: Option<&str>,
        base_name: &str,
        nested: &mut NestedTypes,
    ) -> FieldType {
        match value {
            Value::Null => FieldType::untyped(),
            Value::Bool(_) => FieldType::primitive(Primitive::Boolean),
            Value::Number(n) => FieldType::primitive(number_primitive(n)),
            Value::String(_) => FieldType::primitive(Primitive::String),
            Value::Array(items) => match items.first() {
                Some(first) => FieldType::array(self.value_type(first, field, base_name, nested)),
                None => FieldType::array(FieldType::primitive(Primitive::Any)),
            },
            Value::Object(map) => {
                let name = self.resolver.nested_name(field, base_name);
                let schema = self.object_schema(map, base_name, nested);
                nested.register(NestedTypeDef::new(name.clone(), schema));
                FieldType::reference(name)
            }
        }
    }
}

/// Integers that fit in 32 bits are `Int`, larger ones `Long`.
fn number_primitive(n: &Number) -> Primitive {
    if n.is_f64() {
        return Primitive::Double;
    }
    match n.as_i64() {
        Some(v) if i32::try_from(v).is_ok() => Primitive::Int,
        _ => Primitive::Long,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

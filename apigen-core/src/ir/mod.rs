//! Intermediate representation of inferred schemas.
//!
//! The IR is target-agnostic: the analyzers produce it and every
//! [`Renderer`](crate::renderer::Renderer) consumes it.

mod schema;
mod types;

pub use schema::{Direction, NestedTypeDef, NestedTypes, TypeBundle, TypeSchema};
pub use types::{FieldKind, FieldType, Primitive};

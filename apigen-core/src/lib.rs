//! # apigen-core
//!
//! Generates typed client models from documented API endpoints.
//!
//! Given endpoint descriptors with sample request and response payloads,
//! the crate infers a schema per endpoint, assigns collision-free type
//! names, renders source files for a target language and keeps a manifest
//! so later runs only rewrite what changed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apigen_core::{ArtifactPlanner, EndpointSource, KotlinRenderer, Pipeline, PipelineOptions, RenderConfig};
//!
//! let endpoints = EndpointSource::load("api.json".as_ref())?.into_endpoints();
//! let renderer = KotlinRenderer::new();
//! let planner = ArtifactPlanner::new(&renderer, RenderConfig::new().with_package("com.acme.api"));
//!
//! let outcome = Pipeline::new(planner, PipelineOptions::new("./generated")).run(&endpoints)?;
//! println!("{} updated, {} unchanged", outcome.summary.updated, outcome.summary.unchanged);
//! ```
//!
//! ## Architecture
//!
//! - [`source`] - Endpoint document loading, dedup and category filtering
//! - [`envelope`] - Response envelope unwrapping and request body normalization
//! - [`analyzer`] - Schema inference from sample JSON
//! - [`request`] - Schema inference from declared parameter lists
//! - [`naming`] - Class names, translation and collision resolution
//! - [`renderer`] - Kotlin and Dart renderers
//! - [`service`] - Client operations (method, path, parameters, body) per endpoint
//! - [`planner`] - Bundles and rendered artifacts for one run
//! - [`manifest`] - Persisted file versions, diffing and orphan cleanup
//! - [`writer`] - File output with dry-run support
//! - [`pipeline`] - Plan, diff, write and commit
//! - [`error`] - Error types

pub mod analyzer;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod ir;
pub mod manifest;
pub mod naming;
pub mod pipeline;
pub mod planner;
pub mod renderer;
pub mod request;
pub mod service;
pub mod source;
pub mod writer;

pub use analyzer::{Analysis, SchemaAnalyzer};
pub use endpoint::{EndpointDescriptor, EndpointKey};
pub use error::{CoreError, ManifestError, RenderError, Result, SourceError, WriteError};
pub use ir::{Direction, FieldKind, FieldType, NestedTypeDef, NestedTypes, Primitive, TypeBundle, TypeSchema};
pub use manifest::{content_hash, Comparison, ManifestEntry, VersionStore};
pub use naming::{Glossary, NameAssignment, NameResolver, Translator};
pub use pipeline::{Pipeline, PipelineOptions, RunOutcome, RunSummary};
pub use planner::{Artifact, ArtifactPlanner, Plan};
pub use renderer::{DartRenderer, DocLinks, KotlinRenderer, RenderConfig, Renderer, Target};
pub use request::{ParamRecord, RequestSchemaBuilder};
pub use service::{ModelRef, OperationBuilder, ServiceBody, ServiceOperation, ServiceParam};
pub use source::EndpointSource;
pub use writer::{FileWriter, WriteResult};

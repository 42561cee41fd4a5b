//! Target language renderers.
//!
//! A [`Renderer`] turns a [`TypeBundle`] into source text and decides where
//! that text lives in the output tree. The rest of the pipeline never looks
//! at target syntax, so supporting a new language means implementing this
//! trait.

mod dart;
mod kotlin;

pub use dart::{DartRenderer, DartTypeMapper};
pub use kotlin::{KotlinRenderer, KotlinTypeMapper};

use std::fmt;
use std::str::FromStr;

use std::collections::{BTreeSet, HashMap};

use crate::error::RenderError;
use crate::ir::{Direction, TypeBundle};
use crate::service::{ModelRef, ServiceOperation};

/// Trait for target language renderers.
///
/// # Example
///
/// ```rust,ignore
/// use apigen_core::renderer::{Renderer, RenderConfig, SharedArtifact};
/// use apigen_core::ir::TypeBundle;
/// use apigen_core::error::RenderError;
///
/// struct Swift;
///
/// impl Renderer for Swift {
///     fn id(&self) -> &'static str { "swift" }
///     fn name(&self) -> &'static str { "Swift Codable" }
///     fn file_extension(&self) -> &'static str { "swift" }
///     fn type_suffix(&self) -> &'static str { "" }
///     fn keywords(&self) -> &'static [&'static str] { &["class", "struct"] }
///     fn model_dir(&self) -> &'static str { "Models" }
///
///     fn render_bundle(&self, bundle: &TypeBundle, _folder: &str, _config: &RenderConfig) -> Result<String, RenderError> {
///         Ok(format!("struct {}: Codable {{}}\n", bundle.name))
///     }
///
///     fn shared_artifacts(&self, _config: &RenderConfig) -> Vec<SharedArtifact> {
///         Vec::new()
///     }
/// }
/// ```
pub trait Renderer: Send + Sync {
    /// Short lowercase identifier (`kotlin`, `dart`).
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// Extension of generated files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Suffix appended to every generated type name (may be empty).
    fn type_suffix(&self) -> &'static str;

    /// Reserved words that cannot be used as type names.
    fn keywords(&self) -> &'static [&'static str];

    /// Top-level directory of generated models.
    fn model_dir(&self) -> &'static str;

    /// File name (without extension) for a type.
    fn file_stem(&self, type_name: &str) -> String {
        type_name.to_string()
    }

    /// Relative artifact path for a type.
    fn artifact_path(&self, category_folder: &str, direction: Direction, type_name: &str) -> String {
        format!(
            "{}/{}/{}/{}.{}",
            self.model_dir(),
            category_folder,
            direction.as_str(),
            self.file_stem(type_name),
            self.file_extension()
        )
    }

    /// Render one bundle. `category_folder` is the sanitized folder name.
    fn render_bundle(
        &self,
        bundle: &TypeBundle,
        category_folder: &str,
        config: &RenderConfig,
    ) -> Result<String, RenderError>;

    /// Files shared by every bundle, such as the response envelope class.
    fn shared_artifacts(&self, config: &RenderConfig) -> Vec<SharedArtifact>;

    /// Service interface, repository and HTTP client files for
    /// `operations`. Targets without client generation emit nothing.
    fn render_services(
        &self,
        _operations: &[ServiceOperation],
        _config: &RenderConfig,
    ) -> Result<Vec<SharedArtifact>, RenderError> {
        Ok(Vec::new())
    }
}

/// A rendered file not tied to any endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedArtifact {
    pub path: String,
    pub content: String,
}

/// Documentation site used to link generated types to their pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLinks {
    pub server_base: String,
    pub item_id: String,
}

impl DocLinks {
    pub fn new(server_base: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            server_base: server_base.into(),
            item_id: item_id.into(),
        }
    }

    /// Page URL, or `None` when any part is missing.
    pub fn page_url(&self, page_id: &str) -> Option<String> {
        let base = self.server_base.trim_end_matches('/');
        if base.is_empty() || self.item_id.is_empty() || page_id.is_empty() {
            return None;
        }
        Some(format!("{}/web/#/{}/{}", base, self.item_id, page_id))
    }
}

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base package (Kotlin) or library prefix.
    pub package: String,

    /// Whether to emit doc comments (titles, links, samples).
    pub generate_docs: bool,

    /// Documentation links, when configured.
    pub doc_links: Option<DocLinks>,

    /// Whether to emit service, repository and HTTP client files.
    pub generate_services: bool,

    /// Server base URL baked into the HTTP client configuration.
    pub base_url: String,

    /// Connect, read and write timeout of the HTTP client.
    pub timeout_seconds: u64,

    /// Whether the HTTP client logs request and response bodies in debug
    /// builds.
    pub http_logging: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            package: "com.example.api".to_string(),
            generate_docs: true,
            doc_links: None,
            generate_services: false,
            base_url: "https://api.example.com".to_string(),
            timeout_seconds: 30,
            http_logging: true,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_generate_docs(mut self, generate: bool) -> Self {
        self.generate_docs = generate;
        self
    }

    pub fn with_doc_links(mut self, links: Option<DocLinks>) -> Self {
        self.doc_links = links;
        self
    }

    pub fn with_services(mut self, generate: bool) -> Self {
        self.generate_services = generate;
        self
    }

    /// HTTP client settings used by generated client configuration.
    pub fn with_client(mut self, base_url: impl Into<String>, timeout_seconds: u64, http_logging: bool) -> Self {
        self.base_url = base_url.into();
        self.timeout_seconds = timeout_seconds;
        self.http_logging = http_logging;
        self
    }

    /// Doc page URL for a bundle, if links are configured.
    pub fn page_url(&self, page_id: &str) -> Option<String> {
        self.doc_links.as_ref().and_then(|l| l.page_url(page_id))
    }
}

/// Supported targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    #[default]
    Kotlin,
    Dart,
}

impl Target {
    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self {
            Target::Kotlin => Box::new(KotlinRenderer::new()),
            Target::Dart => Box::new(DartRenderer::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Kotlin => "kotlin",
            Target::Dart => "dart",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kotlin" | "android" | "kt" => Ok(Target::Kotlin),
            "dart" | "flutter" => Ok(Target::Dart),
            other => Err(format!("unknown target '{}' (expected kotlin or dart)", other)),
        }
    }
}

/// Check every reference in `bundle` before rendering it.
pub(crate) fn check_references(bundle: &TypeBundle) -> Result<(), RenderError> {
    if bundle.name.trim().is_empty() {
        return Err(RenderError::EmptyName {
            endpoint: bundle.origin.to_string(),
        });
    }
    match bundle.dangling_references().into_iter().next() {
        Some(reference) => Err(RenderError::missing_reference(&bundle.name, reference)),
        None => Ok(()),
    }
}

/// Distinct models referenced by `operations`, sorted, plus the names that
/// more than one of them share (a request and a response model may carry
/// the same name).
pub(crate) fn referenced_models(operations: &[ServiceOperation]) -> (Vec<&ModelRef>, BTreeSet<&str>) {
    let models: BTreeSet<&ModelRef> = operations.iter().flat_map(ServiceOperation::models).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for model in &models {
        *counts.entry(model.name.as_str()).or_default() += 1;
    }
    let shared = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();

    (models.into_iter().collect(), shared)
}

/// Make sample text safe inside a block comment.
pub(crate) fn comment_safe(text: &str) -> String {
    text.replace("*/", "*\\/")
}

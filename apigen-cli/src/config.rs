//! Configuration management for the CLI.
//!
//! Settings come from `apigen.toml` and are overridden by command-line
//! flags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use apigen_core::naming::DEFAULT_CACHE_CAPACITY;
use apigen_core::{
    DocLinks, Glossary, NameResolver, PipelineOptions, RenderConfig, Renderer, Target, Translator,
};

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "apigen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub naming: NamingConfig,
    pub generation: GenerationConfig,
    pub docs: DocsConfig,
    pub client: ClientConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory of generated files.
    pub dir: PathBuf,

    /// `kotlin` or `dart`.
    pub target: String,

    /// Base package of generated Kotlin files.
    pub package: String,

    /// Whether to emit doc comments.
    pub generate_docs: bool,
}

/// Naming configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Overrides the target's type suffix.
    pub type_suffix: Option<String>,

    /// Extra phrase translations, merged over the built-in glossary.
    pub glossary: BTreeMap<String, String>,

    /// Capacity of the translation cache.
    pub cache_capacity: usize,
}

/// Generation behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub incremental: bool,
    pub auto_delete: bool,

    /// Case-insensitive category filter.
    pub category: Option<String>,
}

/// Documentation links.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub server_base: Option<String>,

    /// Project id; falls back to the id found in a tree export.
    pub item_id: Option<String>,
}

/// Generated HTTP client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Emit the service interface, repository and client setup files.
    pub services: bool,
    pub base_url: String,
    pub timeout_seconds: u64,

    /// Install an HTTP logging interceptor in the generated client.
    pub http_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            services: true,
            base_url: "https://api.example.com".to_string(),
            timeout_seconds: 30,
            http_logging: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            target: Target::default().to_string(),
            package: "com.example.api".to_string(),
            generate_docs: true,
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            type_suffix: None,
            glossary: BTreeMap::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            incremental: true,
            auto_delete: false,
            category: None,
        }
    }
}

impl Config {
    /// Parsed output target.
    pub fn target(&self) -> Result<Target, ConfigError> {
        self.output
            .target
            .parse::<Target>()
            .map_err(|message| ConfigError::invalid_value("output.target", message))
    }

    /// Renderer settings. `source_item_id` is used when no item id is
    /// configured.
    pub fn render_config(&self, source_item_id: Option<&str>) -> RenderConfig {
        let doc_links = self.docs.server_base.as_deref().and_then(|base| {
            let item_id = self.docs.item_id.as_deref().or(source_item_id)?;
            Some(DocLinks::new(base, item_id))
        });

        RenderConfig::new()
            .with_package(self.output.package.clone())
            .with_generate_docs(self.output.generate_docs)
            .with_doc_links(doc_links)
            .with_services(self.client.services)
            .with_client(
                self.client.base_url.clone(),
                self.client.timeout_seconds,
                self.client.http_logging,
            )
    }

    /// Name resolver for `renderer`, honoring the suffix override and the
    /// configured glossary.
    pub fn name_resolver(&self, renderer: &dyn Renderer) -> NameResolver {
        let mut glossary = Glossary::default();
        glossary.extend(self.naming.glossary.clone());

        let suffix = self
            .naming
            .type_suffix
            .clone()
            .unwrap_or_else(|| renderer.type_suffix().to_string());
        let capacity = self.naming.cache_capacity.max(1);

        NameResolver::new(suffix, renderer.keywords(), Translator::new(glossary, capacity))
    }

    pub fn pipeline_options(&self, dry_run: bool) -> PipelineOptions {
        PipelineOptions::new(self.output.dir.clone())
            .with_dry_run(dry_run)
            .with_incremental(self.generation.incremental)
            .with_auto_delete(self.generation.auto_delete)
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `apigen.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => return Err(ConfigError::not_found(path.to_path_buf()).into()),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            tracing::debug!("no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.clone(), e.to_string()))?;

        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref target) = args.target {
            config.output.target = target.clone();
        }

        if let Some(ref package) = args.package {
            config.output.package = package.clone();
        }

        if let Some(auto_delete) = args.auto_delete {
            config.generation.auto_delete = auto_delete;
        }

        if let Some(incremental) = args.incremental {
            config.generation.incremental = incremental;
        }

        if let Some(ref category) = args.category {
            config.generation.category = Some(category.clone());
        }

        config
    }

    /// Default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# apigen configuration file

[output]
# Root directory of generated files
dir = "./generated"

# Target language: kotlin or dart
target = "kotlin"

# Base package of generated Kotlin files
package = "com.example.api"

# Emit doc comments with titles, doc links and sample responses
generate_docs = true

[naming]
# Override the target's type suffix (Kotlin: "Bean", Dart: none)
# type_suffix = "Bean"

# Capacity of the translation cache
cache_capacity = 512

# Extra translations for category and field names
[naming.glossary]
# "用户" = "user"

[generation]
# Only rewrite files whose content changed
incremental = true

# Delete files whose endpoint no longer exists
auto_delete = false

# Only generate categories whose name contains this text
# category = "user"

[docs]
# Documentation server used for doc links
# server_base = "https://doc.example.com"
# item_id = "42"

[client]
# Generate the API service, repository and HTTP client setup
services = true

# Base URL and timeout baked into the client setup
base_url = "https://api.example.com"
timeout_seconds = 30

# Log requests and responses
http_logging = true
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    pub output: Option<PathBuf>,
    pub target: Option<String>,
    pub package: Option<String>,
    pub auto_delete: Option<bool>,
    pub incremental: Option<bool>,
    pub category: Option<String>,
}

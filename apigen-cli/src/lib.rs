//! # apigen-cli
//!
//! CLI library for generating Kotlin and Dart client models from documented
//! API endpoints.
//!
//! - [`config`] - `apigen.toml` loading and CLI overrides
//! - [`generate`] - Pipeline invocation from a configuration
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generate;

pub use config::{CliArgs, Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generate::run_pipeline;

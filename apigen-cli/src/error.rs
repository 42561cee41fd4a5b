//! Error types for the CLI.

use std::path::PathBuf;
use thiserror::Error;

use apigen_core::{CoreError, SourceError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error from the generation pipeline.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Generated output differs from what a run would produce.
    #[error("Check failed: {0}")]
    Check(String),

    /// Some artifacts could not be written or removed.
    #[error("{0} file(s) could not be written or removed")]
    Incomplete(usize),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SourceError> for CliError {
    fn from(error: SourceError) -> Self {
        CliError::Core(error.into())
    }
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file passed explicitly but missing.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Refusing to overwrite an existing file.
    #[error("Configuration file already exists: {path} (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_converts_through_core() {
        let err = CliError::from(SourceError::not_found("api.json"));
        assert!(matches!(err, CliError::Core(CoreError::Source(_))));
        assert_eq!(
            err.to_string(),
            "Failed to load endpoints: Endpoint file not found: api.json"
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::invalid_value("output.target", "unknown target 'swift'");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'output.target': unknown target 'swift'"
        );
    }
}

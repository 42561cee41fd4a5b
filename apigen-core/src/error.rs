//! Error types for the generation pipeline.
//!
//! Most anomalies in the pipeline are recoverable and handled where they
//! occur (untyped fields, numeric name fallbacks, an empty manifest). The
//! errors here are the ones a caller has to see.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Main error type of the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The endpoint source could not be loaded.
    #[error("Failed to load endpoints: {0}")]
    Source(#[from] SourceError),

    /// A bundle could not be rendered; nothing was written.
    #[error("Failed to render artifacts: {0}")]
    Render(#[from] RenderError),

    /// The manifest could not be persisted.
    #[error("Failed to update manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Error loading the endpoint list.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Input file does not exist.
    #[error("Endpoint file not found: {path}")]
    NotFound { path: PathBuf },

    /// Input is not valid JSON.
    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: PathBuf, message: String },

    /// Input is JSON but not a supported endpoint document.
    #[error("Unsupported endpoint document in {path}: {message}")]
    UnsupportedShape { path: PathBuf, message: String },

    /// IO error reading the input.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error rendering a bundle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A field references a nested type the bundle does not define.
    #[error("Type '{type_name}' references undefined type '{reference}'")]
    MissingReference { type_name: String, reference: String },

    /// A bundle has no usable type name.
    #[error("Cannot render a type with an empty name (endpoint {endpoint})")]
    EmptyName { endpoint: String },
}

/// Error persisting the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest could not be serialized.
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Manifest file could not be written or moved into place.
    #[error("Failed to persist manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove file.
    #[error("Failed to remove file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A recorded path does not resolve inside the output directory.
    #[error("Refusing to remove {path}: outside the output directory")]
    OutsideRoot { path: PathBuf },
}

impl SourceError {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an invalid JSON error.
    pub fn invalid_json(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidJson {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported shape error.
    pub fn unsupported(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RenderError {
    pub fn missing_reference(type_name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::MissingReference {
            type_name: type_name.into(),
            reference: reference.into(),
        }
    }
}

impl WriteError {
    /// Path of the file or directory involved.
    pub fn path(&self) -> &std::path::Path {
        match self {
            WriteError::CreateDir { path, .. }
            | WriteError::WriteFile { path, .. }
            | WriteError::RemoveFile { path, .. }
            | WriteError::OutsideRoot { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = CoreError::from(SourceError::not_found("api.json"));
        assert_eq!(
            err.to_string(),
            "Failed to load endpoints: Endpoint file not found: api.json"
        );

        let err = RenderError::missing_reference("InfoBean", "UserBean");
        assert_eq!(
            err.to_string(),
            "Type 'InfoBean' references undefined type 'UserBean'"
        );
    }

    #[test]
    fn test_write_error_path() {
        let err = WriteError::RemoveFile {
            path: PathBuf::from("out/a.kt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.path(), std::path::Path::new("out/a.kt"));

        let err = WriteError::OutsideRoot {
            path: PathBuf::from("out/../etc/passwd"),
        };
        assert_eq!(
            err.to_string(),
            "Refusing to remove out/../etc/passwd: outside the output directory"
        );
    }
}

//! Writes rendered artifacts under the output directory.
//!
//! In dry-run mode nothing touches the disk; the writer reports what it
//! would have done instead.

use std::path::{Path, PathBuf};

use crate::error::WriteError;

/// Result of a write or remove operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written.
    Written {
        path: PathBuf,
        bytes: usize,
    },
    /// File was removed.
    Removed { path: PathBuf },
    /// Dry run; nothing changed on disk.
    DryRun {
        /// Content that would have been written, empty for removals.
        content: String,
        path: PathBuf,
    },
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write `content` to `path`, creating parent directories.
    pub fn write(&self, path: &Path, content: &str) -> Result<WriteResult, WriteError> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::trace!(path = %path.display(), bytes = content.len(), "wrote artifact");

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Remove `path`. A file that is already gone counts as removed.
    pub fn remove(&self, path: &Path) -> Result<WriteResult, WriteError> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: String::new(),
                path: path.to_path_buf(),
            });
        }

        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(WriteError::RemoveFile {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }

        Ok(WriteResult::Removed {
            path: path.to_path_buf(),
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::Removed { path }
            | WriteResult::DryRun { path, .. } => path,
        }
    }

    /// True when the disk was changed.
    pub fn was_written(&self) -> bool {
        !matches!(self, WriteResult::DryRun { .. })
    }

    /// Bytes written (0 for removals and dry runs).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            _ => 0,
        }
    }
}

//! Persisted record of emitted files.
//!
//! The manifest lives at `<output>/.apigen/manifest.json` and maps every
//! emitted relative path to the SHA-256 of its content, the time it was
//! last recorded and the endpoint that produced it. Hash equality is the
//! only change signal.
//!
//! ```json
//! {
//!   "version": 1,
//!   "files": {
//!     "entities/user/response/InfoBean.kt": {
//!       "hash": "9f86d0...",
//!       "timestamp": "2024-05-01T10:00:00+00:00",
//!       "endpoint_key": ["/v1/user/info", "GET"]
//!     }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::endpoint::EndpointKey;
use crate::error::{ManifestError, WriteError};
use crate::writer::FileWriter;

/// Directory holding the manifest, relative to the output root.
pub const MANIFEST_DIR: &str = ".apigen";

/// Manifest file name.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// SHA-256 of rendered content as lowercase hex.
pub fn content_hash(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub hash: String,

    /// RFC 3339 time of the last record. Informational only.
    #[serde(default)]
    pub timestamp: String,

    /// Endpoint that produced the file; `None` for shared files.
    #[serde(default)]
    pub endpoint_key: Option<EndpointKey>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestDocument {
    version: u32,
    #[serde(default)]
    files: BTreeMap<String, ManifestEntry>,
}

/// Diff between the manifest and a fresh set of artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    /// New paths and paths whose hash changed.
    pub to_update: Vec<String>,
    /// Recorded paths that are no longer produced.
    pub to_delete: Vec<String>,
    /// Paths whose hash matches the record.
    pub unchanged: Vec<String>,
}

impl Comparison {
    pub fn has_changes(&self) -> bool {
        !self.to_update.is_empty() || !self.to_delete.is_empty()
    }
}

/// Manifest-backed store of emitted file versions.
#[derive(Debug)]
pub struct VersionStore {
    root: PathBuf,
    entries: BTreeMap<String, ManifestEntry>,
}

impl VersionStore {
    /// Open the manifest under `output_dir`.
    ///
    /// A missing manifest starts empty. An unreadable, unparsable or
    /// unknown-version manifest also starts empty, with a warning.
    pub fn open(output_dir: impl Into<PathBuf>) -> Self {
        let root = output_dir.into();
        let path = manifest_path(&root);

        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<ManifestDocument>(&text) {
                Ok(doc) if doc.version == MANIFEST_VERSION => doc.files,
                Ok(doc) => {
                    tracing::warn!(
                        path = %path.display(),
                        version = doc.version,
                        "unsupported manifest version, starting fresh"
                    );
                    BTreeMap::new()
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "corrupt manifest, starting fresh");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable manifest, starting fresh");
                BTreeMap::new()
            }
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "opened manifest");
        Self { root, entries }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        manifest_path(&self.root)
    }

    pub fn get(&self, path: &str) -> Option<&ManifestEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Recorded paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compare fresh `path -> hash` pairs with the record.
    pub fn compare(&self, new_hashes: &BTreeMap<String, String>) -> Comparison {
        let mut comparison = Comparison::default();

        for (path, hash) in new_hashes {
            match self.entries.get(path) {
                Some(entry) if entry.hash == *hash => comparison.unchanged.push(path.clone()),
                _ => comparison.to_update.push(path.clone()),
            }
        }

        comparison.to_delete = self
            .entries
            .keys()
            .filter(|path| !new_hashes.contains_key(*path))
            .cloned()
            .collect();

        comparison
    }

    /// Paths whose originating endpoint is not in `current_keys`, sorted.
    ///
    /// Entries without an origin (shared files) are never orphans.
    pub fn orphans(&self, current_keys: &HashSet<EndpointKey>) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| {
                entry
                    .endpoint_key
                    .as_ref()
                    .is_some_and(|key| !current_keys.contains(key))
            })
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Insert or refresh the entry for `path`.
    pub fn record(&mut self, path: impl Into<String>, hash: impl Into<String>, key: Option<EndpointKey>) {
        self.entries.insert(
            path.into(),
            ManifestEntry {
                hash: hash.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                endpoint_key: key,
            },
        );
    }

    /// Drop `paths` from the record, optionally deleting the files.
    ///
    /// Deleted files leave their directories pruned up to, but not
    /// including, the output root. An entry stays recorded when its file
    /// could not be deleted, so the next run retries it. Entries whose path
    /// leaves the output root are never deleted from disk; they are dropped
    /// and reported as [`WriteError::OutsideRoot`].
    pub fn clean(&mut self, paths: &[String], delete_from_disk: bool) -> Vec<WriteError> {
        let writer = FileWriter::new(false);
        let mut failures = Vec::new();

        for path in paths {
            if !delete_from_disk {
                self.entries.remove(path);
                continue;
            }

            let Some(full) = self.contained_path(path) else {
                tracing::warn!(path = %path, "recorded path leaves the output directory, not deleting");
                self.entries.remove(path);
                failures.push(WriteError::OutsideRoot {
                    path: self.root.join(path),
                });
                continue;
            };

            match writer.remove(&full) {
                Ok(_) => {
                    tracing::debug!(path = %path, "deleted stale artifact");
                    self.entries.remove(path);
                    self.prune_empty_parents(&full);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "failed to delete stale artifact");
                    failures.push(e);
                }
            }
        }

        failures
    }

    /// `root/path` when `path` is relative and made only of normal
    /// components.
    fn contained_path(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if path.trim().is_empty() || !plain {
            return None;
        }
        let full = self.root.join(relative);
        (full != self.root && full.starts_with(&self.root)).then_some(full)
    }

    fn prune_empty_parents(&self, file: &Path) {
        let mut dir = file.parent();
        while let Some(current) = dir {
            if current == self.root || !current.starts_with(&self.root) {
                break;
            }
            let is_empty = fs::read_dir(current)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if !is_empty || fs::remove_dir(current).is_err() {
                break;
            }
            tracing::trace!(dir = %current.display(), "pruned empty directory");
            dir = current.parent();
        }
    }

    /// Persist the manifest: write a sibling temp file, then rename it over
    /// the manifest.
    pub fn commit(&self) -> Result<(), ManifestError> {
        let path = self.manifest_path();
        let doc = ManifestDocument {
            version: MANIFEST_VERSION,
            files: self.entries.clone(),
        };
        let content = serde_json::to_string_pretty(&doc)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ManifestError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| ManifestError::Io {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &path).map_err(|e| ManifestError::Io {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), entries = self.entries.len(), "committed manifest");
        Ok(())
    }
}

fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_DIR).join(MANIFEST_FILE)
}

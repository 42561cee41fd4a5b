//! End-to-end generation run.
//!
//! A run plans every artifact, diffs the plan against the manifest, writes
//! what changed, optionally deletes stale files and commits the manifest.
//! Planning failures abort before anything is written. Write failures are
//! collected per file and reported in the [`RunSummary`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::endpoint::EndpointDescriptor;
use crate::error::{Result, WriteError};
use crate::manifest::{Comparison, VersionStore};
use crate::planner::{ArtifactPlanner, Plan};
use crate::writer::{FileWriter, WriteResult};

/// Options for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,

    /// Report changes without writing.
    pub dry_run: bool,

    /// Diff against the manifest; when off every artifact is written.
    pub incremental: bool,

    /// Delete orphaned and stale files.
    pub auto_delete: bool,
}

impl PipelineOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dry_run: false,
            incremental: true,
            auto_delete: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    pub fn with_auto_delete(mut self, auto_delete: bool) -> Self {
        self.auto_delete = auto_delete;
        self
    }
}

/// Counts and paths reported by a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Artifacts written (or that would be written in a dry run).
    pub updated: usize,
    pub unchanged: usize,
    /// Files deleted (or that would be deleted in a dry run).
    pub deleted: usize,
    /// Recorded files whose endpoint no longer exists.
    pub orphaned: usize,
    pub failed: usize,
    pub orphaned_paths: Vec<String>,
    /// Recorded files the plan no longer produces, orphans included.
    pub stale_paths: Vec<String>,
    pub failures: Vec<WriteError>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Whether anything on disk differs from the plan.
    pub fn has_drift(&self) -> bool {
        self.updated > 0 || !self.stale_paths.is_empty()
    }
}

/// Result of a run.
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub plan: Plan,
    /// Paths written, or that would be written in a dry run.
    pub updated_paths: Vec<String>,
    /// Paths deleted, or that would be deleted in a dry run.
    pub deleted_paths: Vec<String>,
    /// Per-file writer results: deletions first, then writes.
    pub results: Vec<WriteResult>,
    pub dry_run: bool,
}

/// Plans, diffs and writes artifacts for one output directory.
pub struct Pipeline<'r> {
    planner: ArtifactPlanner<'r>,
    options: PipelineOptions,
}

impl<'r> Pipeline<'r> {
    pub fn new(planner: ArtifactPlanner<'r>, options: PipelineOptions) -> Self {
        Self { planner, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn output_dir(&self) -> &Path {
        &self.options.output_dir
    }

    #[tracing::instrument(skip_all, fields(output = %self.options.output_dir.display()))]
    pub fn run(&mut self, endpoints: &[EndpointDescriptor]) -> Result<RunOutcome> {
        let plan = self.planner.plan(endpoints)?;
        let hashes = plan.hashes();
        let mut store = VersionStore::open(&self.options.output_dir);

        let (comparison, orphans) = if self.options.incremental {
            // A path the plan still produces is overwritten, not orphaned.
            let orphans = store
                .orphans(&plan.endpoint_keys)
                .into_iter()
                .filter(|path| !hashes.contains_key(path))
                .collect();
            (store.compare(&hashes), orphans)
        } else {
            let everything = Comparison {
                to_update: hashes.keys().cloned().collect(),
                ..Comparison::default()
            };
            (everything, Vec::new())
        };

        let root = self.options.output_dir.clone();
        let (rewrite, present): (Vec<String>, Vec<String>) = comparison
            .unchanged
            .iter()
            .cloned()
            .partition(|path| !root.join(path).exists());

        let mut updated_paths = comparison.to_update.clone();
        updated_paths.extend(rewrite);
        updated_paths.sort();

        let removals: Vec<String> = if self.options.auto_delete {
            orphans
                .iter()
                .chain(comparison.to_delete.iter())
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            Vec::new()
        };

        let mut summary = RunSummary {
            unchanged: present.len(),
            orphaned: orphans.len(),
            orphaned_paths: orphans,
            stale_paths: comparison.to_delete.clone(),
            ..RunSummary::default()
        };

        let writer = FileWriter::new(self.options.dry_run);
        let mut results = Vec::new();

        let mut deleted_paths = Vec::new();
        if writer.is_dry_run() {
            for path in &removals {
                match writer.remove(&root.join(path)) {
                    Ok(result) => {
                        results.push(result);
                        deleted_paths.push(path.clone());
                    }
                    Err(e) => summary.failures.push(e),
                }
            }
        } else if !removals.is_empty() {
            let failures = store.clean(&removals, true);
            for path in &removals {
                let full = root.join(path);
                if !failures.iter().any(|f| f.path() == full.as_path()) {
                    results.push(WriteResult::Removed { path: full });
                    deleted_paths.push(path.clone());
                }
            }
            summary.failures.extend(failures);
        }

        let mut written = Vec::new();
        for path in &updated_paths {
            let Some(artifact) = plan.artifact(path) else {
                continue;
            };
            match writer.write(&root.join(path), &artifact.content) {
                Ok(result) => {
                    if result.was_written() {
                        store.record(path.clone(), artifact.hash(), artifact.origin.clone());
                    }
                    written.push(path.clone());
                    results.push(result);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "failed to write artifact");
                    summary.failures.push(e);
                }
            }
        }

        summary.updated = written.len();
        summary.deleted = deleted_paths.len();
        summary.failed = summary.failures.len();

        if writer.is_dry_run() {
            tracing::debug!(updated = summary.updated, deleted = summary.deleted, "dry run");
        } else {
            for path in &present {
                if let Some(artifact) = plan.artifact(path) {
                    store.record(path.clone(), artifact.hash(), artifact.origin.clone());
                }
            }
            store.commit()?;
            tracing::debug!(
                updated = summary.updated,
                unchanged = summary.unchanged,
                deleted = summary.deleted,
                failed = summary.failed,
                "run complete"
            );
        }

        Ok(RunOutcome {
            summary,
            plan,
            updated_paths: written,
            deleted_paths,
            results,
            dry_run: writer.is_dry_run(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{KotlinRenderer, RenderConfig};
    use serde_json::json;
    use tempfile::TempDir;

    fn endpoint(url: &str) -> EndpointDescriptor {
        EndpointDescriptor::new("GET", url, "").with_response(json!({
            "responseOriginal": {"code": 0, "msg": "ok", "data": {"id": 1}}
        }))
    }

    fn run(endpoints: &[EndpointDescriptor], options: PipelineOptions) -> RunOutcome {
        let renderer = KotlinRenderer::new();
        let planner = ArtifactPlanner::new(&renderer, RenderConfig::new());
        Pipeline::new(planner, options).run(endpoints).unwrap()
    }

    #[test]
    fn test_first_run_writes_everything() {
        let dir = TempDir::new().unwrap();
        let outcome = run(&[endpoint("/v1/user/info")], PipelineOptions::new(dir.path()));

        assert_eq!(outcome.summary.updated, 2);
        assert_eq!(outcome.summary.unchanged, 0);
        assert!(dir.path().join("entities/uncategorized/response/InfoBean.kt").exists());
        assert!(dir.path().join("entities/ResponseData.kt").exists());
        assert_eq!(VersionStore::open(dir.path()).len(), 2);
    }

    #[test]
    fn test_second_run_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let endpoints = [endpoint("/v1/user/info")];
        run(&endpoints, PipelineOptions::new(dir.path()));
        let outcome = run(&endpoints, PipelineOptions::new(dir.path()));

        assert_eq!(outcome.summary.updated, 0);
        assert_eq!(outcome.summary.unchanged, 2);
        assert!(!outcome.summary.has_drift());
    }

    #[test]
    fn test_missing_unchanged_file_is_rewritten() {
        let dir = TempDir::new().unwrap();
        let endpoints = [endpoint("/v1/user/info")];
        run(&endpoints, PipelineOptions::new(dir.path()));
        std::fs::remove_file(dir.path().join("entities/ResponseData.kt")).unwrap();

        let outcome = run(&endpoints, PipelineOptions::new(dir.path()));
        assert_eq!(outcome.updated_paths, vec!["entities/ResponseData.kt"]);
        assert!(dir.path().join("entities/ResponseData.kt").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let outcome = run(
            &[endpoint("/v1/user/info")],
            PipelineOptions::new(dir.path()).with_dry_run(true),
        );

        assert!(outcome.dry_run);
        assert_eq!(outcome.summary.updated, 2);
        assert!(!dir.path().join("entities").exists());
        assert!(!dir.path().join(".apigen").exists());
    }

    #[test]
    fn test_dry_run_reports_writer_results() {
        let dir = TempDir::new().unwrap();
        let endpoints = [endpoint("/v1/user/info"), endpoint("/v1/user/list")];
        run(&endpoints, PipelineOptions::new(dir.path()));
        let info = dir.path().join("entities/uncategorized/response/InfoBean.kt");
        let list = dir.path().join("entities/uncategorized/response/ListBean.kt");
        std::fs::remove_file(&info).unwrap();

        let outcome = run(
            &endpoints[..1],
            PipelineOptions::new(dir.path())
                .with_dry_run(true)
                .with_auto_delete(true),
        );

        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results.iter().all(|r| !r.was_written()));

        let removal = &outcome.results[0];
        assert_eq!(removal.path(), list.as_path());
        assert!(matches!(removal, WriteResult::DryRun { content, .. } if content.is_empty()));

        let planned = outcome
            .plan
            .artifact("entities/uncategorized/response/InfoBean.kt")
            .unwrap();
        assert!(matches!(
            &outcome.results[1],
            WriteResult::DryRun { path, content } if *path == info && *content == planned.content
        ));

        assert!(list.exists());
        assert!(!info.exists());
        assert!(VersionStore::open(dir.path()).contains("entities/uncategorized/response/ListBean.kt"));
    }

    #[test]
    fn test_results_report_bytes_written() {
        let dir = TempDir::new().unwrap();
        let outcome = run(&[endpoint("/v1/user/info")], PipelineOptions::new(dir.path()));

        assert_eq!(outcome.results.len(), 2);
        for result in &outcome.results {
            let on_disk = std::fs::read_to_string(result.path()).unwrap();
            assert_eq!(result.bytes(), on_disk.len());
        }
    }

    #[test]
    fn test_write_failure_is_isolated_and_retried() {
        let dir = TempDir::new().unwrap();
        let endpoints = [
            endpoint("/v1/user/info").with_category("User"),
            endpoint("/v1/order/list").with_category("Order"),
        ];
        // A file where the `user` folder belongs blocks that artifact only.
        std::fs::create_dir_all(dir.path().join("entities")).unwrap();
        std::fs::write(dir.path().join("entities/user"), "blocker").unwrap();

        let outcome = run(&endpoints, PipelineOptions::new(dir.path()));

        assert_eq!(outcome.summary.failed, 1);
        assert!(outcome.summary.has_failures());
        assert!(matches!(outcome.summary.failures[0], WriteError::CreateDir { .. }));
        assert_eq!(
            outcome.updated_paths,
            vec!["entities/ResponseData.kt", "entities/order/response/ListBean.kt"]
        );
        assert!(dir.path().join("entities/order/response/ListBean.kt").exists());

        let store = VersionStore::open(dir.path());
        assert!(!store.contains("entities/user/response/InfoBean.kt"));
        assert!(store.contains("entities/order/response/ListBean.kt"));

        std::fs::remove_file(dir.path().join("entities/user")).unwrap();
        let retry = run(&endpoints, PipelineOptions::new(dir.path()));
        assert_eq!(retry.summary.failed, 0);
        assert_eq!(retry.updated_paths, vec!["entities/user/response/InfoBean.kt"]);
        assert!(dir.path().join("entities/user/response/InfoBean.kt").exists());
    }

    #[test]
    fn test_auto_delete_never_leaves_output_root() {
        let parent = TempDir::new().unwrap();
        let root = parent.path().join("out");
        std::fs::create_dir_all(&root).unwrap();
        let victim = parent.path().join("victim.txt");
        std::fs::write(&victim, "keep me").unwrap();

        let mut store = VersionStore::open(&root);
        store.record("../victim.txt", "h", Some(crate::endpoint::EndpointKey::new("/gone", "GET")));
        store.commit().unwrap();

        let outcome = run(
            &[endpoint("/v1/user/info")],
            PipelineOptions::new(&root).with_auto_delete(true),
        );

        assert!(victim.exists());
        assert_eq!(outcome.summary.orphaned_paths, vec!["../victim.txt"]);
        assert_eq!(outcome.summary.failed, 1);
        assert!(matches!(outcome.summary.failures[0], WriteError::OutsideRoot { .. }));
        assert!(outcome.deleted_paths.is_empty());
        assert!(!VersionStore::open(&root).contains("../victim.txt"));
    }

    #[test]
    fn test_non_incremental_rewrites_all() {
        let dir = TempDir::new().unwrap();
        let endpoints = [endpoint("/v1/user/info")];
        run(&endpoints, PipelineOptions::new(dir.path()));

        let outcome = run(
            &endpoints,
            PipelineOptions::new(dir.path()).with_incremental(false),
        );
        assert_eq!(outcome.summary.updated, 2);
    }
}

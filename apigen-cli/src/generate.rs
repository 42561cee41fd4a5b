//! Runs the generation pipeline from a loaded configuration.

use std::path::Path;

use apigen_core::{ArtifactPlanner, EndpointSource, Pipeline, RunOutcome};

use crate::config::Config;
use crate::error::CliResult;

/// Load endpoints from `input` and run the pipeline described by `config`.
pub fn run_pipeline(input: &Path, config: &Config, dry_run: bool) -> CliResult<RunOutcome> {
    let target = config.target()?;
    let renderer = target.renderer();

    let mut source = EndpointSource::load(input)?;
    if let Some(category) = config.generation.category.as_deref() {
        source = source.with_category_filter(category);
    }
    tracing::debug!(
        language = %target,
        endpoints = source.len(),
        output = %config.output.dir.display(),
        "starting run"
    );

    let render_config = config.render_config(source.item_id());
    let resolver = config.name_resolver(renderer.as_ref());
    let planner = ArtifactPlanner::with_resolver(renderer.as_ref(), resolver, render_config);

    let endpoints = source.into_endpoints();
    let outcome = Pipeline::new(planner, config.pipeline_options(dry_run)).run(&endpoints)?;
    Ok(outcome)
}

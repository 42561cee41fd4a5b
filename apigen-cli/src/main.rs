//! # apigen
//!
//! CLI tool for generating Kotlin and Dart client models from documented
//! API endpoints.
//!
//! ## Usage
//!
//! ```bash
//! # Generate models from an endpoint export
//! apigen generate --input api.json
//!
//! # Generate Dart models into a Flutter project
//! apigen generate --input api.json --target dart --output ./lib
//!
//! # Preview changes without writing files
//! apigen generate --input api.json --dry-run
//!
//! # Initialize configuration
//! apigen init
//!
//! # Fail when generated files are out of date
//! apigen check --input api.json
//! ```

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use apigen_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::{CliError, ConfigError},
    run_pipeline,
};
use apigen_core::{RunOutcome, RunSummary, WriteResult};

#[derive(Parser)]
#[command(name = "apigen")]
#[command(author, version, about = "Generate typed client models from documented API endpoints", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model files from an endpoint export
    Generate {
        /// Endpoint list or documentation tree (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target language: kotlin or dart
        #[arg(short, long)]
        target: Option<String>,

        /// Base package of generated Kotlin files
        #[arg(long)]
        package: Option<String>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Delete files whose endpoint no longer exists
        #[arg(long)]
        auto_delete: bool,

        /// Rewrite every file, ignoring the manifest
        #[arg(long)]
        full: bool,

        /// Only generate categories whose name contains this text
        #[arg(long)]
        category: Option<String>,
    },

    /// Initialize a new apigen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "apigen.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Check that generated files are up-to-date
    Check {
        /// Endpoint list or documentation tree (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory of generated files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target language: kotlin or dart
        #[arg(short, long)]
        target: Option<String>,

        /// Only check categories whose name contains this text
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Check(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the level from warn.
fn init_tracing(verbose: u8) {
    let directive = match verbose {
        0 => "warn",
        1 => "apigen_core=debug,apigen_cli=debug,info",
        _ => "trace",
    };

    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            target,
            package,
            dry_run,
            auto_delete,
            full,
            category,
        } => {
            let args = CliArgs {
                output,
                target,
                package,
                auto_delete: auto_delete.then_some(true),
                incremental: full.then_some(false),
                category,
            };
            cmd_generate(&input, config.as_deref(), &args, dry_run, cli.verbose)
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Check {
            input,
            output,
            config,
            target,
            category,
        } => {
            let args = CliArgs {
                output,
                target,
                incremental: Some(true),
                category,
                ..Default::default()
            };
            cmd_check(&input, config.as_deref(), &args)
        }
    }
}

fn load_config(config_path: Option<&Path>, args: &CliArgs) -> Result<Config, CliError> {
    let config = ConfigManager::load(config_path)?;
    Ok(ConfigManager::merge_cli_args(config, args))
}

/// Generate command implementation.
fn cmd_generate(
    input: &Path,
    config_path: Option<&Path>,
    args: &CliArgs,
    dry_run: bool,
    verbose: u8,
) -> Result<(), CliError> {
    let config = load_config(config_path, args)?;

    println!(
        "{} {} ({})",
        "Generating models from".cyan(),
        input.display(),
        config.output.target
    );

    let outcome = run_pipeline(input, &config, dry_run)?;
    let summary = &outcome.summary;

    if outcome.plan.artifacts.is_empty() {
        println!("{}", "No endpoints with a usable payload found.".yellow());
    } else {
        println!(
            "  Planned {} model(s) in {} file(s)",
            outcome.plan.bundle_count().to_string().green(),
            outcome.plan.artifacts.len().to_string().green()
        );
    }

    print_changes(&outcome, verbose > 0);
    print_summary(summary);

    if summary.has_failures() {
        for failure in &summary.failures {
            println!("  {} {}", "✗".red(), failure);
        }
        return Err(CliError::Incomplete(summary.failed));
    }

    Ok(())
}

/// Print per-file results. Dry runs show the would-be content when
/// `show_content` is set.
fn print_changes(outcome: &RunOutcome, show_content: bool) {
    for result in &outcome.results {
        match result {
            WriteResult::Written { path, bytes } => {
                println!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    path.display()
                );
            }
            WriteResult::Removed { path } => {
                println!("{} Deleted {}", "✓".green(), path.display());
            }
            WriteResult::DryRun { content, path } if content.is_empty() => {
                println!("{} Would delete {}", "[dry-run]".yellow(), path.display());
            }
            WriteResult::DryRun { content, path } => {
                if show_content {
                    println!("{} Would write to {}:", "[dry-run]".yellow(), path.display());
                    println!("{}", "─".repeat(60).dimmed());
                    println!("{}", content);
                    println!("{}", "─".repeat(60).dimmed());
                } else {
                    println!("{} Would write {}", "[dry-run]".yellow(), path.display());
                }
            }
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} updated, {} unchanged, {} deleted",
        summary.updated.to_string().green(),
        summary.unchanged,
        summary.deleted
    );

    if !summary.orphaned_paths.is_empty() {
        println!(
            "{} {} file(s) no longer match an endpoint:",
            "Warning:".yellow(),
            summary.orphaned
        );
        for path in &summary.orphaned_paths {
            println!("  {}", path);
        }
        println!("  Run with --auto-delete to remove them");
    }
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        return Err(ConfigError::AlreadyExists { path: output }.into());
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Check command implementation.
fn cmd_check(input: &Path, config_path: Option<&Path>, args: &CliArgs) -> Result<(), CliError> {
    println!("{}", "Checking generated files...".cyan());

    let config = load_config(config_path, args)?;
    let outcome = run_pipeline(input, &config, true)?;
    let summary = &outcome.summary;

    if !summary.has_drift() {
        println!("{} Generated files are up-to-date", "✓".green());
        return Ok(());
    }

    println!("{} Generated files are out of date", "✗".red());
    for path in &outcome.updated_paths {
        println!("  {} {}", "changed".yellow(), path);
    }
    for path in &summary.stale_paths {
        println!("  {} {}", "stale".yellow(), path);
    }
    println!("  Run 'apigen generate' to update");

    Err(CliError::Check(format!(
        "{} file(s) out of date",
        outcome.updated_paths.len() + summary.stale_paths.len()
    )))
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

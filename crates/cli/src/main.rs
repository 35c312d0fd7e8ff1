//! Tagger CLI - replay tagging sessions against an in-memory map surface.
//!
//! A script is a JSON array of steps. Each step is either a command, as
//! understood by [`api::Command`], or `{ "query": ... }` wrapping an
//! [`api::Query`]. Every result is printed as one JSON line.

use anyhow::{bail, Context, Result};
use api::{execute_command, execute_query, Command, CommandResult, Query};
use canvas::MemorySurface;
use interchange::write_collection;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tagging::{Bucket, Workspace, WorkspaceConfig};

/// Tagger - classify map features from a command script
#[derive(Parser)]
#[command(name = "tagger")]
#[command(about = "Replay feature tagging scripts and export the classified features")]
struct Cli {
    /// Workspace config (JSON). Defaults apply to every field left out.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script and print each result
    Run {
        /// Path to the JSON script
        script: PathBuf,

        /// Print the classified features as GeoJSON once the script ends
        #[arg(short, long)]
        export: bool,

        /// Write the classified features to a GeoJSON file once the script ends
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop at the first failing command
        #[arg(long)]
        fail_fast: bool,
    },

    /// Parse a script without running it
    Validate {
        /// Path to the JSON script
        script: PathBuf,
    },

    /// List the classification buckets and the classes they match
    Buckets,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Step {
    Query { query: Query },
    Command(Command),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            script,
            export,
            output,
            fail_fast,
        } => run(&script, config, export, output.as_deref(), fail_fast),
        Commands::Validate { script } => validate(&script),
        Commands::Buckets => list_buckets(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<WorkspaceConfig> {
    let Some(path) = path else {
        return Ok(WorkspaceConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    WorkspaceConfig::from_json(&text)
        .with_context(|| format!("Invalid config {}", path.display()))
}

fn load_script(path: &Path) -> Result<Vec<Step>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid script {}", path.display()))
}

fn run(
    script: &Path,
    config: WorkspaceConfig,
    export: bool,
    output: Option<&Path>,
    fail_fast: bool,
) -> Result<()> {
    let steps = load_script(script)?;
    let mut workspace = Workspace::new(MemorySurface::new(), config);
    log::info!("running {} step(s) from {}", steps.len(), script.display());

    for (index, step) in steps.into_iter().enumerate() {
        let line = match step {
            Step::Command(command) => {
                let result = execute_command(&mut workspace, command);
                if fail_fast {
                    if let CommandResult::Error { message } = &result {
                        bail!("Step {} failed: {}", index, message);
                    }
                }
                serde_json::to_string(&result)?
            }
            Step::Query { query } => serde_json::to_string(&execute_query(&workspace, query))?,
        };
        println!("{}", line);

        for event in workspace.drain_events() {
            log::debug!("step {}: {}", index, serde_json::to_string(&event)?);
        }
    }

    let collection = workspace.export_aggregate();
    if export {
        println!("{}", collection.to_json_pretty()?);
    }
    if let Some(path) = output {
        write_collection(path, &collection)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("wrote {} feature(s) to {}", collection.len(), path.display());
    }
    Ok(())
}

fn validate(script: &Path) -> Result<()> {
    let steps = load_script(script)?;
    let commands = steps
        .iter()
        .filter(|step| matches!(step, Step::Command(_)))
        .count();
    println!(
        "{}: {} command(s), {} query(ies)",
        script.display(),
        commands,
        steps.len() - commands
    );
    Ok(())
}

fn list_buckets(config: &WorkspaceConfig) -> Result<()> {
    for bucket in Bucket::iter() {
        let name: &str = bucket.as_ref();
        let classes: Vec<String> = config
            .buckets
            .iter()
            .filter(|rule| rule.bucket == bucket)
            .map(|rule| rule.match_class.to_string())
            .collect();
        if classes.is_empty() {
            println!("{:<10} (unused)", name);
        } else {
            println!("{:<10} {}={}", name, config.class_property, classes.join(","));
        }
    }
    Ok(())
}

//! CLI argument parsing for fct-provision.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.
//!
//! Branch and category are taken as plain strings and parsed by the
//! commands, so an unfamiliar value is a configuration error with its own
//! exit code rather than a clap usage error.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// fct-provision: populate a generated FLASC project with upstream examples.
///
/// Runs as the post-generation step of the project template:
/// - Downloads the FLASC source archive for a branch
/// - Specializes the example scripts for the new project's package
/// - Moves them, their data and the FLORIS model inputs into the project
#[derive(Parser, Debug)]
#[command(name = "fct-provision")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to fct.yaml in the project directory).
    #[arg(long, global = true, env = "FCT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the generated project (defaults to the current directory).
    #[arg(long, global = true, env = "FCT_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Python package name of the generated project.
    #[arg(long, global = true, env = "FCT_PROJECT_SLUG")]
    pub project_slug: Option<String>,

    /// Directory under which the scratch workspace is created
    /// (defaults to the project directory).
    #[arg(long, global = true, env = "FCT_WORKSPACE_ROOT")]
    pub workspace_root: Option<PathBuf>,
}

/// Available commands for fct-provision.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Post-generation entry point.
    ///
    /// Reads the example selector and provisions the selected examples,
    /// or prunes the template's placeholder examples when none are selected
    /// and pruning is enabled.
    Run(RunArgs),

    /// Provision the examples of one category from one branch.
    Provision(ProvisionArgs),

    /// Replace substrings in every line of a file.
    Rewrite(RewriteArgs),

    /// Remove marker-delimited blocks of lines from a file.
    Excise(ExciseArgs),

    /// Convert Jupyter notebooks to plain Python scripts.
    Convert(ConvertArgs),

    /// Remove the template's placeholder examples from the project.
    Prune,
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Example selector as rendered by the template.
    #[arg(long, env = "FCT_POPULATE_WITH_EXAMPLES")]
    pub populate_with_examples: Option<String>,

    /// Remove placeholder examples when no examples are selected.
    #[arg(long, env = "FCT_PRUNE")]
    pub prune: bool,

    /// Convert provisioned notebooks to scripts.
    #[arg(long)]
    pub convert_notebooks: bool,
}

/// Arguments for the `provision` command.
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Upstream branch (main, develop).
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// Example category (examples_artificial_data, examples_smarteole).
    #[arg(short, long)]
    pub category: String,

    /// Convert provisioned notebooks to scripts.
    #[arg(long)]
    pub convert_notebooks: bool,
}

/// Arguments for the `rewrite` command.
#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// File to rewrite in place.
    pub file: PathBuf,

    /// Substring to replace and its replacement. Repeatable; applied in order.
    #[arg(
        long = "replace",
        num_args = 2,
        value_names = ["OLD", "NEW"],
        action = ArgAction::Append,
        required = true
    )]
    pub replace: Vec<String>,
}

impl RewriteArgs {
    /// The `--replace` values as `(old, new)` pairs.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.replace
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
            .collect()
    }
}

/// Arguments for the `excise` command.
#[derive(Args, Debug)]
pub struct ExciseArgs {
    /// File to edit in place.
    pub file: PathBuf,

    /// Marker on the first line to remove.
    #[arg(long)]
    pub start: String,

    /// Marker on the last line to remove.
    #[arg(long)]
    pub end: String,
}

/// Arguments for the `convert` command.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Notebooks to convert; each `{stem}.py` is written alongside.
    #[arg(required = true)]
    pub notebooks: Vec<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

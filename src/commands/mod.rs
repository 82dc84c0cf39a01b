//! Command implementations for fct-provision.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, and the settings loader shared by every command that
//! works on a project.

mod edit;
mod provision;
mod prune;
mod run;


use crate::cli::{Cli, Command, GlobalArgs};
use crate::config::{Config, ConfigOverrides, DEFAULT_CONFIG_FILE};
use crate::context::ProjectContext;
use crate::error::Result;
use std::path::PathBuf;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let Cli { global, command } = cli;
    match command {
        Command::Run(args) => run::cmd_run(&global, args),
        Command::Provision(args) => provision::cmd_provision(&global, args),
        Command::Rewrite(args) => edit::cmd_rewrite(args),
        Command::Excise(args) => edit::cmd_excise(args),
        Command::Convert(args) => edit::cmd_convert(args),
        Command::Prune => prune::cmd_prune(&global),
    }
}

/// Validated configuration and resolved project paths for one command.
#[derive(Debug)]
pub(crate) struct Settings {
    pub config: Config,
    pub ctx: ProjectContext,
}

/// Load the config file, layer `overrides` on top, validate, and resolve paths.
///
/// The config file defaults to `fct.yaml` in the project directory; a missing
/// default file means all defaults. An explicitly named file must exist.
pub(crate) fn load_settings(global: &GlobalArgs, overrides: &ConfigOverrides) -> Result<Settings> {
    let project_dir = global
        .project_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(project_dir.join(DEFAULT_CONFIG_FILE))?,
    };

    let overrides = ConfigOverrides {
        project_slug: global
            .project_slug
            .clone()
            .or_else(|| overrides.project_slug.clone()),
        ..overrides.clone()
    };
    config.apply_overrides(&overrides);
    config.validate()?;

    let ctx = ProjectContext::resolve(
        Some(project_dir.as_path()),
        global.workspace_root.as_deref(),
        &config.project_slug,
        &config.scratch_dir_name,
    )?;

    tracing::debug!(
        project = %ctx.project_dir.display(),
        slug = %ctx.project_slug,
        "loaded settings"
    );
    Ok(Settings { config, ctx })
}

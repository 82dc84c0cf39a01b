//! Implementation of the `fct-provision prune` command.

use super::{Settings, load_settings};
use crate::cli::GlobalArgs;
use crate::config::ConfigOverrides;
use crate::error::Result;
use crate::prune::prune_examples;

/// Execute the `fct-provision prune` command.
pub fn cmd_prune(global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global, &ConfigOverrides::default())?;
    prune_and_report(&settings)
}

pub(super) fn prune_and_report(settings: &Settings) -> Result<()> {
    let removed = prune_examples(&settings.ctx)?;

    if removed.is_empty() {
        println!("No placeholder examples to remove.");
        return Ok(());
    }

    println!("Removed placeholder examples:");
    for path in &removed {
        let shown = path
            .strip_prefix(&settings.ctx.project_dir)
            .unwrap_or(path);
        println!("  {}", shown.display());
    }
    Ok(())
}

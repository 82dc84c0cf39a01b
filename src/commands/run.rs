//! Implementation of the `fct-provision run` command.
//!
//! This is what the project template invokes after rendering. The selector
//! decides between provisioning one category, pruning the placeholder
//! examples, or leaving the project alone.

use super::provision::provision_and_report;
use super::prune::prune_and_report;
use super::{Settings, load_settings};
use crate::cli::{GlobalArgs, RunArgs};
use crate::config::{ConfigOverrides, ExampleSelection};
use crate::error::Result;
use crate::fetch::{ArchiveSource, HttpSource};
use std::time::Duration;

/// Execute the `fct-provision run` command.
pub fn cmd_run(global: &GlobalArgs, args: RunArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        populate_with_examples: args.populate_with_examples,
        prune_unpopulated: args.prune.then_some(true),
        convert_notebooks: args.convert_notebooks.then_some(true),
        ..ConfigOverrides::default()
    };
    let settings = load_settings(global, &overrides)?;

    let source = HttpSource::new(Duration::from_secs(settings.config.timeout_secs));
    run_with_source(&settings, &source)
}

pub(super) fn run_with_source(settings: &Settings, source: &dyn ArchiveSource) -> Result<()> {
    match settings.config.selection()? {
        ExampleSelection::Examples(branch, category) => {
            provision_and_report(settings, source, branch, category)
        }
        ExampleSelection::None if settings.config.prune_unpopulated => prune_and_report(settings),
        ExampleSelection::None => {
            tracing::info!("no examples selected");
            println!("No examples selected; project left as generated.");
            Ok(())
        }
    }
}

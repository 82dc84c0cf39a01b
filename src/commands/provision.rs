//! Implementation of the `fct-provision provision` command.

use super::{Settings, load_settings};
use crate::cli::{GlobalArgs, ProvisionArgs};
use crate::config::{Branch, Category, ConfigOverrides};
use crate::error::Result;
use crate::fetch::{ArchiveSource, HttpSource};
use crate::provision::{ProvisionReport, Provisioner};
use std::path::Path;
use std::time::Duration;

/// Execute the `fct-provision provision` command.
pub fn cmd_provision(global: &GlobalArgs, args: ProvisionArgs) -> Result<()> {
    // Reject unfamiliar names before touching the config or the network.
    let branch: Branch = args.branch.parse()?;
    let category: Category = args.category.parse()?;

    let overrides = ConfigOverrides {
        convert_notebooks: args.convert_notebooks.then_some(true),
        ..ConfigOverrides::default()
    };
    let settings = load_settings(global, &overrides)?;

    let source = HttpSource::new(Duration::from_secs(settings.config.timeout_secs));
    provision_and_report(&settings, &source, branch, category)
}

/// Provision from `source` and print the summary.
pub(super) fn provision_and_report(
    settings: &Settings,
    source: &dyn ArchiveSource,
    branch: Branch,
    category: Category,
) -> Result<()> {
    let report = Provisioner::new(&settings.config, &settings.ctx, source).provision(branch, category)?;
    print_report(&report, &settings.ctx.project_dir);
    Ok(())
}

fn print_report(report: &ProvisionReport, project_dir: &Path) {
    println!(
        "Provisioned {} examples from the '{}' branch",
        report.category, report.branch
    );
    println!();

    println!("Written:");
    for path in &report.relocated {
        let shown = path.strip_prefix(project_dir).unwrap_or(path);
        println!("  {}", shown.display());
    }

    if !report.converted.is_empty() {
        println!();
        println!("Converted notebooks:");
        for path in &report.converted {
            let shown = path.strip_prefix(project_dir).unwrap_or(path);
            println!("  {}", shown.display());
        }
    }

    if !report.skipped_conversions.is_empty() {
        println!();
        println!("Notebooks left unconverted (a script of the same name exists):");
        for path in &report.skipped_conversions {
            let shown = path.strip_prefix(project_dir).unwrap_or(path);
            println!("  {}", shown.display());
        }
    }

    if report.unterminated_excisions > 0 {
        println!();
        println!(
            "Warning: {} excision(s) in models.py found no end marker; the rest of the file was dropped.",
            report.unterminated_excisions
        );
    }
}

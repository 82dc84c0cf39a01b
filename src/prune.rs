//! Removing the template's placeholder examples.
//!
//! The project template ships a few example directories and demo datasets.
//! When the user asks for no examples and opts into pruning, they are
//! deleted. Only paths under the project directory are ever touched.

use crate::context::{ProjectContext, join_relative};
use crate::error::{FctError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Template example paths, relative to the project directory.
pub const EXAMPLE_PATHS: [&str; 5] = [
    "python/export_energyratios_to_table",
    "python/raw_data_processing",
    "python/visualize_energy_ratios",
    "common_windfarm_information/demo_dataset_metmast_600s.csv",
    "common_windfarm_information/demo_dataset_scada_600s.csv",
];

/// Remove the template's example paths from the project.
pub fn prune_examples(ctx: &ProjectContext) -> Result<Vec<PathBuf>> {
    prune_paths(&ctx.project_dir, &EXAMPLE_PATHS)
}

/// Remove each of `relative_paths` under `root`. Missing paths are skipped.
///
/// Returns the paths actually removed.
pub fn prune_paths(root: &Path, relative_paths: &[&str]) -> Result<Vec<PathBuf>> {
    // Validate everything before deleting anything.
    for relative in relative_paths {
        validate_relative(relative)?;
    }

    let mut removed = Vec::new();
    for relative in relative_paths {
        let path = join_relative(root, relative);
        let meta = match fs::symlink_metadata(&path) {
            Ok(meta) => meta,
            Err(_) => {
                tracing::debug!(path = %path.display(), "nothing to prune");
                continue;
            }
        };

        let result = if meta.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|e| FctError::filesystem(&path, format!("failed to remove: {}", e)))?;

        tracing::info!(path = %path.display(), "pruned example path");
        removed.push(path);
    }
    Ok(removed)
}

fn validate_relative(relative: &str) -> Result<()> {
    let path = Path::new(relative);
    let escapes = relative.is_empty()
        || path.is_absolute()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(FctError::Config(format!(
            "refusing to prune '{}': path must stay inside the project",
            relative
        )));
    }
    Ok(())
}

//! Scratch workspace for one provisioning run.
//!
//! The downloaded archive and its extracted tree live in a directory owned
//! exclusively by one run. The directory is created with exclusive semantics
//! (`create_dir` fails if it exists) and carries a `.workspace.json` record
//! naming its owner. A [`ScratchWorkspace`] guard deletes the directory when
//! dropped, so success and failure paths both clean up.
//!
//! A directory left behind by a killed run is reclaimed once its record is
//! older than `stale_workspace_minutes`; a younger one is reported as in use.
//! A directory without a readable record is never removed.

mod guard;
mod metadata;


pub use guard::ScratchWorkspace;
pub use metadata::{METADATA_FILE, WorkspaceMetadata};

use crate::config::{Branch, Category};
use crate::error::{FctError, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Create the scratch workspace at `path` for a run of `(branch, category)`.
pub fn acquire(
    path: &Path,
    stale_minutes: u32,
    branch: Branch,
    category: Category,
) -> Result<ScratchWorkspace> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FctError::filesystem(parent, format!("failed to create workspace root: {}", e))
        })?;
    }

    match fs::create_dir(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            reclaim_if_stale(path, stale_minutes)?;
            fs::create_dir(path).map_err(|e| {
                FctError::filesystem(path, format!("failed to create scratch workspace: {}", e))
            })?;
        }
        Err(e) => {
            return Err(FctError::filesystem(
                path,
                format!("failed to create scratch workspace: {}", e),
            ));
        }
    }

    // From here on the guard owns the directory.
    let workspace = ScratchWorkspace::new(path.to_path_buf());

    let metadata = WorkspaceMetadata::new(branch, category);
    let record = workspace.join(METADATA_FILE);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&record)
        .map_err(|e| FctError::filesystem(&record, format!("failed to create workspace record: {}", e)))?;
    file.write_all(metadata.to_json()?.as_bytes())
        .map_err(|e| FctError::filesystem(&record, format!("failed to write workspace record: {}", e)))?;

    tracing::debug!(path = %path.display(), "acquired scratch workspace");
    Ok(workspace)
}

/// Remove a leftover workspace if it is stale, otherwise report it as busy.
fn reclaim_if_stale(path: &Path, stale_minutes: u32) -> Result<()> {
    let record = path.join(METADATA_FILE);
    let busy = match WorkspaceMetadata::from_file(&record) {
        Ok(meta) if meta.is_stale(stale_minutes) => None,
        Ok(meta) => Some(format!(
            "scratch workspace is in use (created {} ago by {}, pid {}, {} from {})",
            meta.age_string(),
            meta.owner,
            meta.pid.map(|p| p.to_string()).unwrap_or_else(|| "?".to_string()),
            meta.category,
            meta.branch
        )),
        // Without our record the directory belongs to someone else.
        Err(_) => Some(
            "scratch path exists but has no fct-provision ownership record, so it is not ours to remove"
                .to_string(),
        ),
    };

    if let Some(message) = busy {
        return Err(FctError::filesystem(
            path,
            format!("{}; remove it or choose another workspace root if no other run is active", message),
        ));
    }

    tracing::warn!(path = %path.display(), "reclaiming stale scratch workspace");
    fs::remove_dir_all(path).map_err(|e| {
        FctError::filesystem(path, format!("failed to remove stale scratch workspace: {}", e))
    })
}

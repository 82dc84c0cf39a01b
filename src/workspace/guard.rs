//! RAII guard for a scratch workspace directory.

use crate::error::{FctError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// RAII guard for the scratch workspace.
///
/// When dropped, the workspace directory and everything in it is deleted.
/// If deletion fails, a warning is logged but no panic occurs.
#[derive(Debug)]
pub struct ScratchWorkspace {
    path: PathBuf,
    released: bool,
}

impl ScratchWorkspace {
    pub(super) fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    /// Path to the workspace directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `name` inside the workspace.
    pub fn join<P: AsRef<Path>>(&self, name: P) -> PathBuf {
        self.path.join(name)
    }

    /// Delete the workspace now, reporting failure instead of logging it.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_dir_all(&self.path)
            .map_err(|e| FctError::filesystem(&self.path, format!("failed to remove scratch workspace: {}", e)))?;
        tracing::debug!(path = %self.path.display(), "removed scratch workspace");
        Ok(())
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed scratch workspace"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove scratch workspace"
            ),
        }
    }
}

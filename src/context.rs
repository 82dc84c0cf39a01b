//! Destination project layout and workspace path resolution.
//!
//! The generated project has a fixed layout which the example scripts rely on
//! through relative-path lookups from their own location:
//!
//! ```text
//! {project_dir}/
//!   common_windfarm_information/
//!   python/
//!     {slug}/
//!       models.py
//!       floris_inputs/
//! ```
//!
//! All provisioning code uses this module to locate destinations so the
//! layout is spelled out in one place.

use crate::error::{FctError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Directory receiving example scripts.
pub const PYTHON_DIR: &str = "python";

/// Directory receiving shared wind-farm data files.
pub const COMMON_DIR: &str = "common_windfarm_information";

/// File name of the downloaded archive inside the scratch workspace.
pub const ARCHIVE_FILE_NAME: &str = "flasc_repository.zip";

/// Resolved paths for one provisioning run. All paths are absolute.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Root of the generated project tree.
    pub project_dir: PathBuf,

    /// Python package name of the generated project.
    pub project_slug: String,

    /// Directory under which the scratch workspace is created.
    pub workspace_root: PathBuf,

    /// Name of the scratch directory under `workspace_root`.
    pub scratch_dir_name: String,
}

impl ProjectContext {
    /// Build a context, resolving relative paths against the current directory.
    pub fn resolve(
        project_dir: Option<&Path>,
        workspace_root: Option<&Path>,
        project_slug: &str,
        scratch_dir_name: &str,
    ) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            FctError::filesystem(".", format!("failed to get current working directory: {}", e))
        })?;

        let project_dir = absolutize(&cwd, project_dir.unwrap_or(Path::new(".")));
        // The hook runs from inside the rendered project, so scratch space
        // defaults to the project itself.
        let workspace_root = workspace_root
            .map(|p| absolutize(&cwd, p))
            .unwrap_or_else(|| project_dir.clone());

        if !project_dir.is_dir() {
            return Err(FctError::filesystem(
                &project_dir,
                "project directory does not exist",
            ));
        }

        Ok(Self::new(
            project_dir,
            workspace_root,
            project_slug,
            scratch_dir_name,
        ))
    }

    /// Build a context from already absolute paths.
    pub fn new(
        project_dir: PathBuf,
        workspace_root: PathBuf,
        project_slug: &str,
        scratch_dir_name: &str,
    ) -> Self {
        Self {
            project_dir,
            project_slug: project_slug.to_string(),
            workspace_root,
            scratch_dir_name: scratch_dir_name.to_string(),
        }
    }

    /// `{project_dir}/python`
    pub fn python_dir(&self) -> PathBuf {
        self.project_dir.join(PYTHON_DIR)
    }

    /// `{project_dir}/python/{slug}`
    pub fn package_dir(&self) -> PathBuf {
        self.python_dir().join(&self.project_slug)
    }

    /// `{project_dir}/common_windfarm_information`
    pub fn common_dir(&self) -> PathBuf {
        self.project_dir.join(COMMON_DIR)
    }

    /// `{workspace_root}/{scratch_dir_name}`
    pub fn scratch_dir(&self) -> PathBuf {
        self.workspace_root.join(&self.scratch_dir_name)
    }

    /// Join a `/`-separated relative path onto the project directory.
    pub fn project_path(&self, relative: &str) -> PathBuf {
        join_relative(&self.project_dir, relative)
    }
}

/// Join a `/`-separated relative path onto `base` component by component.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

//! Configuration model for fct-provision.

use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "fct.yaml";

/// Configuration for a provisioning run.
///
/// This struct represents the contents of `fct.yaml`. Unknown fields in the
/// YAML are ignored for forward compatibility. Command-line and environment
/// values are layered on top with [`Config::apply_overrides`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Project settings
    // =========================================================================
    /// Python package name of the generated project (e.g. `my_windfarm`).
    pub project_slug: String,

    /// Raw `populate_with_examples` value rendered by the template.
    pub populate_with_examples: String,

    /// Remove the template's placeholder example paths when no examples are selected.
    pub prune_unpopulated: bool,

    /// Convert relocated notebooks to plain scripts after provisioning.
    pub convert_notebooks: bool,

    // =========================================================================
    // Archive settings
    // =========================================================================
    /// Upstream repository as `owner/name`.
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Base URL of the archive host.
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,

    /// Read buffer size for streaming downloads, in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Whole-request download timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // =========================================================================
    // Workspace settings
    // =========================================================================
    /// Name of the scratch directory created under the workspace root.
    #[serde(default = "default_scratch_dir_name")]
    pub scratch_dir_name: String,

    /// Minutes after which a leftover scratch workspace may be reclaimed.
    #[serde(default = "default_stale_workspace_minutes")]
    pub stale_workspace_minutes: u32,
}

// Default value functions for serde
fn default_repository() -> String {
    "NREL/flasc".to_string()
}
fn default_archive_base_url() -> String {
    "https://github.com".to_string()
}
fn default_chunk_size() -> usize {
    8192
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_scratch_dir_name() -> String {
    "tmp".to_string()
}
fn default_stale_workspace_minutes() -> u32 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_slug: String::new(),
            populate_with_examples: String::new(),
            prune_unpopulated: false,
            convert_notebooks: false,
            repository: default_repository(),
            archive_base_url: default_archive_base_url(),
            chunk_size: default_chunk_size(),
            timeout_secs: default_timeout_secs(),
            scratch_dir_name: default_scratch_dir_name(),
            stale_workspace_minutes: default_stale_workspace_minutes(),
        }
    }
}

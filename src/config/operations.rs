//! Config loading, validation, and derived values.

use super::model::Config;
use super::types::{Branch, ExampleSelection};
use crate::error::{FctError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid slug regex"));

/// Values supplied on the command line or through `FCT_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_slug: Option<String>,
    pub populate_with_examples: Option<String>,
    pub prune_unpopulated: Option<bool>,
    pub convert_notebooks: Option<bool>,
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FctError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, otherwise start from defaults.
    ///
    /// Defaults are not validated here because the slug usually arrives as an
    /// override; call [`Config::validate`] after applying overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                FctError::Config(format!(
                    "failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            Self::parse_yaml(&content)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config = Self::parse_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| FctError::Config(format!("failed to parse config YAML: {}", e)))
    }

    /// Layer command-line and environment values over file values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(slug) = &overrides.project_slug {
            self.project_slug = slug.clone();
        }
        if let Some(selector) = &overrides.populate_with_examples {
            self.populate_with_examples = selector.clone();
        }
        if let Some(prune) = overrides.prune_unpopulated {
            self.prune_unpopulated = prune;
        }
        if let Some(convert) = overrides.convert_notebooks {
            self.convert_notebooks = convert;
        }
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `project_slug` must be a Python identifier
    /// - `repository` must be `owner/name`
    /// - `chunk_size`, `timeout_secs` and `stale_workspace_minutes` must be positive
    /// - `scratch_dir_name` must be a single path component
    pub fn validate(&self) -> Result<()> {
        if !SLUG_PATTERN.is_match(&self.project_slug) {
            return Err(FctError::Config(format!(
                "config validation failed: project_slug '{}' is not a valid Python package name",
                self.project_slug
            )));
        }

        let mut parts = self.repository.split('/');
        let valid_repository = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !valid_repository {
            return Err(FctError::Config(format!(
                "config validation failed: repository '{}' must have the form owner/name",
                self.repository
            )));
        }

        if self.chunk_size == 0 {
            return Err(FctError::Config(
                "config validation failed: chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(FctError::Config(
                "config validation failed: timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.stale_workspace_minutes == 0 {
            return Err(FctError::Config(
                "config validation failed: stale_workspace_minutes must be greater than 0"
                    .to_string(),
            ));
        }

        if self.scratch_dir_name.is_empty()
            || self.scratch_dir_name.contains(['/', '\\'])
            || self.scratch_dir_name == "."
            || self.scratch_dir_name == ".."
        {
            return Err(FctError::Config(format!(
                "config validation failed: scratch_dir_name '{}' must be a single directory name",
                self.scratch_dir_name
            )));
        }

        Ok(())
    }

    /// Download URL of the archive for `branch`.
    pub fn archive_url(&self, branch: Branch) -> String {
        format!(
            "{}/{}/archive/refs/heads/{}.zip",
            self.archive_base_url.trim_end_matches('/'),
            self.repository,
            branch
        )
    }

    /// Name of the top-level directory inside the archive for `branch`.
    pub fn archive_root_name(&self, branch: Branch) -> String {
        let name = self
            .repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository);
        format!("{}-{}", name, branch)
    }

    /// Parsed `populate_with_examples` selection.
    pub fn selection(&self) -> Result<ExampleSelection> {
        ExampleSelection::parse(&self.populate_with_examples)
    }
}

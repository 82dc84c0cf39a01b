//! Error types for the fct-provision CLI.
//!
//! Uses thiserror for derive macros. Every variant maps to a distinct exit
//! code so a calling template engine can tell a bad configuration apart from a
//! transient network failure.

use crate::exit_codes;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pipeline step a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Workspace,
    Fetch,
    Extract,
    Rewrite,
    Relocate,
    Cleanup,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Workspace => "workspace",
            Step::Fetch => "fetch",
            Step::Extract => "extract",
            Step::Rewrite => "rewrite",
            Step::Relocate => "relocate",
            Step::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Main error type for provisioning operations.
#[derive(Error, Debug)]
pub enum FctError {
    /// Unrecognized branch, category, selector or invalid config value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Fetching the archive failed.
    #[error("network error fetching '{url}': {message}")]
    Network { url: String, message: String },

    /// The archive is not a valid ZIP container.
    #[error("archive error in '{}': {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// A filesystem operation failed or an expected path is missing.
    #[error("filesystem error at '{}': {message}", path.display())]
    Filesystem { path: PathBuf, message: String },

    /// A provisioning step failed.
    #[error("provisioning failed during {step}: {source}")]
    Step {
        step: Step,
        #[source]
        source: Box<FctError>,
    },
}

impl FctError {
    pub fn filesystem(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        FctError::Filesystem {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn archive(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        FctError::Archive {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn network(url: &str, message: impl fmt::Display) -> Self {
        FctError::Network {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// Attach the pipeline step this error happened in.
    pub fn during(self, step: Step) -> Self {
        match self {
            // Keep the innermost step.
            FctError::Step { .. } => self,
            other => FctError::Step {
                step,
                source: Box::new(other),
            },
        }
    }

    /// The step recorded on this error, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            FctError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The underlying error with any step wrapper removed.
    pub fn root(&self) -> &FctError {
        match self {
            FctError::Step { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether re-running the same provisioning could succeed.
    ///
    /// Only network failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self.root(), FctError::Network { .. })
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FctError::Config(_) => exit_codes::CONFIG_ERROR,
            FctError::Network { .. } => exit_codes::NETWORK_FAILURE,
            FctError::Archive { .. } => exit_codes::ARCHIVE_FAILURE,
            FctError::Filesystem { .. } => exit_codes::FILESYSTEM_FAILURE,
            FctError::Step { source, .. } => source.exit_code(),
        }
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, FctError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_has_correct_exit_code() {
        let err = FctError::Config("unknown branch 'feature'".to_string());
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
        assert!(!err.is_retryable());
    }

    #[test]
    fn network_error_is_retryable() {
        let err = FctError::network("https://example.com/a.zip", "timed out");
        assert_eq!(err.exit_code(), exit_codes::NETWORK_FAILURE);
        assert!(err.is_retryable());
    }

    #[test]
    fn step_wrapper_delegates_exit_code_and_retry() {
        let err = FctError::archive("/tmp/a.zip", "invalid Zip archive").during(Step::Extract);
        assert_eq!(err.step(), Some(Step::Extract));
        assert_eq!(err.exit_code(), exit_codes::ARCHIVE_FAILURE);
        assert!(!err.is_retryable());

        let err = FctError::network("u", "503").during(Step::Fetch);
        assert!(err.is_retryable());
    }

    #[test]
    fn during_keeps_innermost_step() {
        let err = FctError::filesystem("/x", "missing")
            .during(Step::Rewrite)
            .during(Step::Relocate);
        assert_eq!(err.step(), Some(Step::Rewrite));
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = FctError::filesystem("/p/models.py", "not found").during(Step::Relocate);
        assert_eq!(
            err.to_string(),
            "provisioning failed during relocate: filesystem error at '/p/models.py': not found"
        );
    }
}

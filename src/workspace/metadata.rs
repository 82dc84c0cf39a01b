//! Ownership record written into a scratch workspace.

use crate::config::{Branch, Category};
use crate::error::{FctError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the ownership record inside the workspace.
pub const METADATA_FILE: &str = ".workspace.json";

/// Who created a scratch workspace, when, and for which archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMetadata {
    /// Owner of the workspace (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the provisioning run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the workspace was created (RFC3339).
    pub created_at: DateTime<Utc>,

    pub branch: Branch,
    pub category: Category,
}

impl WorkspaceMetadata {
    /// Create new metadata with the current timestamp.
    pub fn new(branch: Branch, category: Category) -> Self {
        Self {
            owner: get_owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
            branch,
            category,
        }
    }

    /// Parse metadata from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| FctError::filesystem(path, format!("failed to read workspace record: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| FctError::filesystem(path, format!("failed to parse workspace record: {}", e)))
    }

    /// Serialize metadata to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            FctError::Config(format!("failed to serialize workspace record: {}", e))
        })
    }

    /// Age of the workspace.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();

        if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }

    /// Check if the workspace is older than `stale_minutes`.
    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age().num_minutes() > i64::from(stale_minutes)
    }
}

/// Get the owner string for workspace metadata.
fn get_owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

//! Run report types

use crate::deconflict::EntryKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether a run touches the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Plan only, nothing is renamed
    Preview,
    /// Renames are performed
    Execute,
}

impl RunMode {
    /// Label prefixed to per-entry lines
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Preview => "[DRY RUN]",
            Self::Execute => "[EXECUTING]",
        }
    }
}

/// Result of a single rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OperationOutcome {
    /// Preview mode: would have been renamed
    Planned,
    /// Rename succeeded
    Renamed,
    /// Rename was attempted and failed
    Failed { message: String },
}

/// One planned or attempted rename, in the order it happened
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameOperation {
    pub kind: EntryKind,
    pub from: PathBuf,
    pub to: PathBuf,
    #[serde(flatten)]
    pub outcome: OperationOutcome,
}

impl RenameOperation {
    /// File name of the destination, for display
    #[must_use]
    pub fn new_name(&self) -> String {
        self.to
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: RunMode,
    /// Root directory that was walked
    pub root: PathBuf,
    /// Files planned or attempted, failures included
    pub files_renamed: usize,
    /// Folders planned or attempted, failures included
    pub folders_renamed: usize,
    #[serde(default)]
    pub operations: Vec<RenameOperation>,
    /// Destinations that had to be numbered to avoid a collision
    #[serde(default)]
    pub conflicts: Vec<String>,
    /// Rename attempts that failed
    #[serde(default)]
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Check if any rename failed
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if any destination was renumbered
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Counts as `(files, folders)`
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.files_renamed, self.folders_renamed)
    }
}

//! Error types for bulk rename runs

use crate::report::RunReport;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for run-level operations
pub type RenameResult<T> = Result<T, RenameError>;

/// Errors raised while loading or validating a mapping table
#[derive(Error, Debug)]
pub enum MappingError {
    /// Mapping file could not be opened
    #[error("Cannot open mapping table {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV decoding failed
    #[error("Failed to read mapping table: {0}")]
    Csv(#[from] csv::Error),

    /// Row does not have exactly two columns
    #[error("Line {line}: expected 2 columns (old_name,new_name), found {found}")]
    ColumnCount { line: u64, found: usize },

    /// New name is empty or refers to the current/parent directory
    #[error("Line {line}: invalid new name {name:?} for {old_name:?}")]
    InvalidNewName {
        line: u64,
        old_name: String,
        name: String,
    },

    /// Table contains no rows
    #[error("Mapping table is empty")]
    Empty,
}

/// Fatal errors that abort a rename run
#[derive(Error, Debug)]
pub enum RenameError {
    /// Root path missing or not a directory
    #[error("Invalid root directory: {0}")]
    InvalidRoot(PathBuf),

    /// A mapping table failed to load
    #[error("Invalid {kind} mapping: {source}")]
    Mapping {
        kind: &'static str,
        #[source]
        source: MappingError,
    },

    /// IO error outside a single rename attempt
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Run stopped by an interrupt signal; carries what was done before it
    #[error(
        "Interrupted after {} file(s) and {} folder(s)",
        report.files_renamed,
        report.folders_renamed
    )]
    Interrupted { report: Box<RunReport> },
}

impl RenameError {
    /// Get the error code for CLI/JSON responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRoot(_) => "INVALID_ROOT",
            Self::Mapping { .. } => "INVALID_MAPPING",
            Self::Io(_) => "IO_ERROR",
            Self::Interrupted { .. } => "INTERRUPTED",
        }
    }

    /// Wrap a mapping error for the file table
    pub fn file_mapping(source: MappingError) -> Self {
        Self::Mapping {
            kind: "file",
            source,
        }
    }

    /// Wrap a mapping error for the folder table
    pub fn folder_mapping(source: MappingError) -> Self {
        Self::Mapping {
            kind: "folder",
            source,
        }
    }
}

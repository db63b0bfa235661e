//! Collision-free destination selection
//!
//! A [`PathDeconflictor`] is created per run. It remembers every destination
//! it has handed out so that renames planned earlier in the run (including
//! ones never executed, as in preview mode) are treated as occupied.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of entry being renamed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

/// Destinations already claimed during the current run
#[derive(Debug, Clone, Default)]
pub struct ReservedPathSet {
    paths: HashSet<PathBuf>,
}

impl ReservedPathSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Claim a path; returns false if it was already claimed
    pub fn reserve(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Picks destination paths that collide with nothing on disk or reserved
#[derive(Debug, Default)]
pub struct PathDeconflictor {
    reserved: ReservedPathSet,
    conflicts: Vec<String>,
}

impl PathDeconflictor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a free destination for `existing`, preferring `desired`
    ///
    /// When `desired` is taken, `_1`, `_2`, ... is appended to its base name
    /// (before the extension for files, after the whole name for folders)
    /// until a free name is found. The search has no upper bound. Each
    /// adjusted destination adds one entry to the conflict log.
    pub fn resolve(&mut self, existing: &Path, desired: &Path, kind: EntryKind) -> PathBuf {
        if !self.is_taken(desired) {
            self.reserved.reserve(desired.to_path_buf());
            return desired.to_path_buf();
        }

        let parent = desired.parent().unwrap_or_else(|| Path::new(""));
        let (base, extension) = split_name(desired, kind);

        let mut counter: u64 = 1;
        loop {
            let mut name = base.clone();
            name.push(format!("_{counter}"));
            if let Some(ext) = &extension {
                name.push(".");
                name.push(ext);
            }

            let candidate = parent.join(&name);
            if !self.is_taken(&candidate) {
                self.conflicts.push(format!(
                    "Renaming: {} -> {} to avoid conflict",
                    existing.display(),
                    Path::new(&name).display()
                ));
                tracing::debug!(
                    from = %existing.display(),
                    wanted = %desired.display(),
                    chosen = %candidate.display(),
                    "destination taken, using numbered name"
                );
                self.reserved.reserve(candidate.clone());
                return candidate;
            }
            counter += 1;
        }
    }

    /// Conflict log entries recorded so far, in order
    #[must_use]
    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    #[must_use]
    pub fn reserved(&self) -> &ReservedPathSet {
        &self.reserved
    }

    /// Consume the deconflictor, keeping only its conflict log
    #[must_use]
    pub fn into_conflicts(self) -> Vec<String> {
        self.conflicts
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.reserved.contains(path) || exists_on_disk(path)
    }
}

/// Existence check that does not follow symlinks, so dangling links count
fn exists_on_disk(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Split a destination into the part that receives the counter and the
/// extension that must stay at the end
fn split_name(path: &Path, kind: EntryKind) -> (OsString, Option<OsString>) {
    let full = path.file_name().map(OsString::from).unwrap_or_default();
    match kind {
        EntryKind::Folder => (full, None),
        EntryKind::File => match (path.file_stem(), path.extension()) {
            (Some(stem), Some(ext)) => (stem.to_os_string(), Some(ext.to_os_string())),
            _ => (full, None),
        },
    }
}

//! Bottom-up traversal and rename execution

use crate::deconflict::{EntryKind, PathDeconflictor};
use crate::error::{RenameError, RenameResult};
use crate::mapping::{MappingLookup, NameMapping};
use crate::report::{OperationOutcome, RenameOperation, RunMode, RunReport};
use chrono::{DateTime, Utc};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

/// Rename runner
///
/// Each call to [`Renamer::run`] owns its own reserved paths and logs, so a
/// single `Renamer` can be reused for independent runs.
#[derive(Debug, Default, Clone)]
pub struct Renamer {
    /// Plan only, do not touch the filesystem
    pub preview: bool,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Renamer {
    /// Create a renamer in execute mode
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable preview mode
    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Stop the run before the next entry once `flag` is set
    #[must_use]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    #[must_use]
    pub fn mode(&self) -> RunMode {
        if self.preview {
            RunMode::Preview
        } else {
            RunMode::Execute
        }
    }

    /// Rename everything under `root` that matches a mapping
    ///
    /// # Errors
    /// Returns an error if either mapping is empty or maps to an unusable
    /// name, `root` is not a readable directory, or the run is interrupted.
    /// An interrupted run carries the report of what was done before it. Failed renames of individual
    /// entries are not errors; they are recorded in the report.
    pub fn run(
        &self,
        root: &Path,
        file_mapping: &NameMapping,
        folder_mapping: &NameMapping,
    ) -> RenameResult<RunReport> {
        file_mapping.validate().map_err(RenameError::file_mapping)?;
        folder_mapping.validate().map_err(RenameError::folder_mapping)?;

        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(RenameError::InvalidRoot(root.to_path_buf())),
        }
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };

        let started_at = Utc::now();
        let mode = self.mode();
        tracing::info!(
            mode = mode.label(),
            root = %root.display(),
            file_mappings = file_mapping.len(),
            folder_mappings = folder_mapping.len(),
            "starting rename run"
        );

        let mut pass = Pass {
            mode,
            interrupt: self.interrupt.as_deref(),
            files: file_mapping.lookup(),
            folders: folder_mapping.lookup(),
            deconflictor: PathDeconflictor::new(),
            operations: Vec::new(),
            errors: Vec::new(),
            files_renamed: 0,
            folders_renamed: 0,
        };

        let listing = list_dir(&root).map_err(io::Error::from)?;
        let outcome = pass.visit_listing(&listing);
        let report = pass.into_report(root, started_at);

        match outcome {
            Ok(()) => Ok(report),
            Err(Halted) => {
                tracing::warn!(
                    files = report.files_renamed,
                    folders = report.folders_renamed,
                    "run interrupted"
                );
                Err(RenameError::Interrupted {
                    report: Box::new(report),
                })
            }
        }
    }
}

/// Run once with the given mode
///
/// # Errors
/// See [`Renamer::run`]
pub fn run(
    root: &Path,
    file_mapping: &NameMapping,
    folder_mapping: &NameMapping,
    preview: bool,
) -> RenameResult<RunReport> {
    Renamer::new()
        .with_preview(preview)
        .run(root, file_mapping, folder_mapping)
}

/// Interrupt flag was seen; the traversal unwinds without further renames
#[derive(Debug)]
struct Halted;

/// One directory level, read in full before anything in it is renamed
#[derive(Debug, Default)]
struct Listing {
    files: Vec<PathBuf>,
    /// Entries matched against the folder mapping
    folders: Vec<PathBuf>,
    /// Real directories to descend into; symlinks are never followed
    subdirs: Vec<PathBuf>,
}

/// State of a single run
struct Pass<'a> {
    mode: RunMode,
    interrupt: Option<&'a AtomicBool>,
    files: MappingLookup,
    folders: MappingLookup,
    deconflictor: PathDeconflictor,
    operations: Vec<RenameOperation>,
    errors: Vec<String>,
    files_renamed: usize,
    folders_renamed: usize,
}

impl Pass<'_> {
    fn into_report(self, root: PathBuf, started_at: DateTime<Utc>) -> RunReport {
        RunReport {
            mode: self.mode,
            root,
            files_renamed: self.files_renamed,
            folders_renamed: self.folders_renamed,
            operations: self.operations,
            conflicts: self.deconflictor.into_conflicts(),
            errors: self.errors,
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn visit_dir(&mut self, dir: &Path) -> Result<(), Halted> {
        self.check_interrupt()?;
        match list_dir(dir) {
            Ok(listing) => self.visit_listing(&listing),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                Ok(())
            }
        }
    }

    /// Children first, then this level's files, then this level's folders
    fn visit_listing(&mut self, listing: &Listing) -> Result<(), Halted> {
        for subdir in &listing.subdirs {
            self.visit_dir(subdir)?;
        }
        for file in &listing.files {
            self.check_interrupt()?;
            self.rename_file(file);
        }
        for folder in &listing.folders {
            self.check_interrupt()?;
            self.rename_folder(folder);
        }
        Ok(())
    }

    fn rename_file(&mut self, path: &Path) {
        let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
            tracing::debug!(path = %path.display(), "skipping file with non UTF-8 name");
            return;
        };
        let Some(new_base) = self.files.get(stem) else {
            return;
        };

        let mut new_name = OsString::from(new_base);
        if let Some(ext) = path.extension() {
            new_name.push(".");
            new_name.push(ext);
        }
        let desired = path.with_file_name(new_name);
        self.apply(EntryKind::File, path, &desired);
    }

    fn rename_folder(&mut self, path: &Path) {
        let Some(name) = path.file_name().and_then(OsStr::to_str) else {
            tracing::debug!(path = %path.display(), "skipping folder with non UTF-8 name");
            return;
        };
        let Some(new_name) = self.folders.get(name) else {
            return;
        };

        let desired = path.with_file_name(new_name);
        self.apply(EntryKind::Folder, path, &desired);
    }

    fn apply(&mut self, kind: EntryKind, from: &Path, desired: &Path) {
        let to = self.deconflictor.resolve(from, desired, kind);
        match kind {
            EntryKind::File => self.files_renamed += 1,
            EntryKind::Folder => self.folders_renamed += 1,
        }

        let outcome = match self.mode {
            RunMode::Preview => OperationOutcome::Planned,
            RunMode::Execute => match fs::rename(from, &to) {
                Ok(()) => OperationOutcome::Renamed,
                Err(e) => {
                    let new_name = to.file_name().unwrap_or_default().to_string_lossy();
                    self.errors.push(format!(
                        "Failed to rename {kind} {} -> {new_name}: {e}",
                        from.display()
                    ));
                    tracing::warn!(
                        kind = %kind,
                        from = %from.display(),
                        to = %to.display(),
                        error = %e,
                        "rename failed"
                    );
                    OperationOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            },
        };

        tracing::info!(
            mode = self.mode.label(),
            kind = %kind,
            from = %from.display(),
            to = %to.display(),
            "rename"
        );
        self.operations.push(RenameOperation {
            kind,
            from: from.to_path_buf(),
            to,
            outcome,
        });
    }

    fn check_interrupt(&self) -> Result<(), Halted> {
        match self.interrupt {
            Some(flag) if flag.load(Ordering::SeqCst) => Err(Halted),
            _ => Ok(()),
        }
    }
}

/// Read one directory level completely
///
/// A symlink to a directory is renamed through the folder mapping but is not
/// descended into.
fn list_dir(dir: &Path) -> Result<Listing, walkdir::Error> {
    let mut listing = Listing::default();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            listing.subdirs.push(entry.path().to_path_buf());
            listing.folders.push(entry.into_path());
        } else if entry.path_is_symlink() && entry.path().is_dir() {
            listing.folders.push(entry.into_path());
        } else {
            listing.files.push(entry.into_path());
        }
    }

    Ok(listing)
}

//! Bulk Rename Core - conflict-safe renaming engine
//!
//! This crate renames files and folders under a root directory according to
//! two name mapping tables, walking the tree bottom-up so that children are
//! always renamed before their parents.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod deconflict;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod output;
pub mod report;
pub mod sanitize;

pub use deconflict::{EntryKind, PathDeconflictor, ReservedPathSet};
pub use engine::{run, Renamer};
pub use error::{MappingError, RenameError, RenameResult};
pub use mapping::{MappingLookup, NameMapping};
pub use report::{OperationOutcome, RenameOperation, RunMode, RunReport};
pub use sanitize::sanitize;

//! Bulk Rename CLI
//!
//! Renames the files and folders under a root directory using two CSV
//! mapping tables (`old_name,new_name`, no header row).

use anyhow::{bail, Context, Result};
use bulk_rename_core::output::{format_report_terminal, to_json};
use bulk_rename_core::{NameMapping, RenameError, Renamer, RunMode, RunReport};
use clap::Parser;
use signal_hook::consts::SIGINT;
use signal_hook::flag;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit status for a run stopped by Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[command(name = "bulk-rename")]
#[command(about = "Bulk Rename - rename files and folders from CSV name mappings")]
#[command(version)]
struct Cli {
    /// Root folder within which the renaming happens
    #[arg(long, value_name = "DIR")]
    root: PathBuf,

    /// CSV mapping old to new file names (matched without extension)
    #[arg(long, value_name = "CSV")]
    filemap: PathBuf,

    /// CSV mapping old to new folder names
    #[arg(long, value_name = "CSV")]
    foldermap: PathBuf,

    /// Preview changes without renaming anything
    #[arg(long, visible_alias = "dry-run")]
    dryrun: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        if let Some(RenameError::Interrupted { report }) = e.downcast_ref::<RenameError>() {
            if let Err(print_err) = print_report(report, cli.json) {
                eprintln!("Error: {print_err}");
            }
            eprintln!("{e}");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(exit_code(&e));
    }
}

/// Process exit status for a failed run
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<RenameError>() {
        Some(RenameError::Interrupted { .. }) => EXIT_INTERRUPTED,
        _ => 1,
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    validate_root(&cli.root)?;
    validate_csv("file map", &cli.filemap)?;
    validate_csv("folder map", &cli.foldermap)?;

    let file_mapping =
        NameMapping::from_csv_path(&cli.filemap).map_err(RenameError::file_mapping)?;
    let folder_mapping =
        NameMapping::from_csv_path(&cli.foldermap).map_err(RenameError::folder_mapping)?;

    let interrupt = install_interrupt_handler()?;
    let renamer = Renamer::new()
        .with_preview(cli.dryrun)
        .with_interrupt(interrupt);

    if !cli.json {
        let mode = match renamer.mode() {
            RunMode::Preview => "DRY RUN",
            RunMode::Execute => "LIVE",
        };
        println!("Starting in {mode} mode...");
        println!(
            "{} Loaded {} file mappings and {} folder mappings.",
            renamer.mode().label(),
            file_mapping.lookup().len(),
            folder_mapping.lookup().len()
        );
    }

    let report = renamer.run(&cli.root, &file_mapping, &folder_mapping)?;
    print_report(&report, cli.json)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(report)?);
    } else {
        print!("{}", format_report_terminal(report));
    }
    Ok(())
}

fn validate_root(root: &Path) -> Result<()> {
    if !root.is_dir() {
        bail!(
            "The root directory '{}' does not exist or is not a directory.",
            root.display()
        );
    }
    Ok(())
}

fn validate_csv(label: &str, path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("The {label} '{}' does not exist.", path.display());
    }
    let is_csv = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        bail!("The {label} '{}' is not a CSV file.", path.display());
    }
    Ok(())
}

/// First Ctrl-C stops the run before the next entry; a second one exits at once
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    flag::register_conditional_shutdown(SIGINT, EXIT_INTERRUPTED, Arc::clone(&interrupted))
        .context("Failed to install interrupt handler")?;
    flag::register(SIGINT, Arc::clone(&interrupted))
        .context("Failed to install interrupt handler")?;
    Ok(interrupted)
}

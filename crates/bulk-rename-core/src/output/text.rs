//! Terminal formatting of run reports

use crate::deconflict::EntryKind;
use crate::report::{RunMode, RunReport};
use std::fmt::Write;

/// Format a run report for terminal display
pub fn format_report_terminal(report: &RunReport) -> String {
    let mut output = String::new();
    let label = report.mode.label();

    for op in &report.operations {
        let kind = match op.kind {
            EntryKind::File => "File",
            EntryKind::Folder => "Folder",
        };
        writeln!(
            output,
            "{label} {kind}: {} -> {}",
            op.from.display(),
            op.new_name()
        )
        .unwrap();
    }

    if report.has_conflicts() {
        writeln!(output).unwrap();
        writeln!(output, "--- Warning: Rename Conflicts ---").unwrap();
        for entry in &report.conflicts {
            writeln!(output, "{entry}").unwrap();
        }
    }

    if report.has_errors() {
        writeln!(output).unwrap();
        writeln!(output, "--- Errors Encountered During Renaming ---").unwrap();
        for entry in &report.errors {
            writeln!(output, "{entry}").unwrap();
        }
    }

    let verb = match report.mode {
        RunMode::Preview => "would have been",
        RunMode::Execute => "have been",
    };
    if !output.is_empty() {
        writeln!(output).unwrap();
    }
    writeln!(
        output,
        "Done - {} file(s) and {} folder(s) {verb} renamed.",
        report.files_renamed, report.folders_renamed
    )
    .unwrap();

    output
}

//! JSON output formatter

use crate::report::RunReport;

/// Convert a run report to a pretty JSON string
///
/// # Errors
/// Returns an error if serialization fails
pub fn to_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

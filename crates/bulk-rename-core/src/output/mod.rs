//! Output formatters for run reports

pub mod json;
pub mod text;

pub use json::to_json;
pub use text::format_report_terminal;

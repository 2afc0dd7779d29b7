//! Output formatting for run reports (human/JSON).

use std::fmt::Write as _;

use serde::Serialize;

use super::run::{RunReport, SuiteReport, SuiteStatus};
use crate::util::shell::format_duration;

/// Output format for run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
}

impl std::str::FromStr for MessageFormat {
    type Err = MessageFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(MessageFormat::Human),
            "json" => Ok(MessageFormat::Json),
            _ => Err(MessageFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing the message format option.
#[derive(Debug, Clone)]
pub struct MessageFormatParseError(pub String);

impl std::fmt::Display for MessageFormatParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid message format '{}', valid values: human, json",
            self.0
        )
    }
}

impl std::error::Error for MessageFormatParseError {}

fn status_text(suite: &SuiteReport) -> String {
    match (suite.status, suite.outcome) {
        (SuiteStatus::Failed, Some(outcome)) => outcome.to_string(),
        (SuiteStatus::Passed, _) => "ok".to_string(),
        (SuiteStatus::Disabled, _) => "disabled".to_string(),
        (SuiteStatus::NotRun, _) => "not run".to_string(),
        (SuiteStatus::Failed, None) => "FAILED".to_string(),
    }
}

/// Format a run report for display (human-readable).
///
/// Each suite's captured output is followed by its status line; a summary
/// closes the report.
pub fn format_report(report: &RunReport, verbose: bool) -> String {
    let mut output = String::new();

    for suite in &report.suites {
        output.push_str(&suite.output);
        write!(output, "  {} ... {}", suite.name, status_text(suite)).unwrap();
        if verbose && suite.outcome.is_some() {
            write!(
                output,
                " ({} passed, {} skipped, {} pass(es), {})",
                suite.passed,
                suite.skipped,
                suite.passes,
                format_duration(suite.duration)
            )
            .unwrap();
        }
        output.push('\n');
    }

    writeln!(output).unwrap();

    let verdict = if report.is_success() { "ok" } else { "FAILED" };
    writeln!(
        output,
        "test result: {}. {} passed; {} failed; {} skipped; finished in {}",
        verdict,
        report.passed_count(),
        report.failed_count(),
        report.skipped_count(),
        format_duration(report.duration)
    )
    .unwrap();

    if !report.is_success() {
        writeln!(output).unwrap();
        writeln!(output, "failing suites:").unwrap();
        for suite in report.suites.iter().filter(|s| s.status == SuiteStatus::Failed) {
            writeln!(output, "    {} (code {})", suite.name, suite.exit_code()).unwrap();
        }
    }

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    passed: usize,
    failed: usize,
    skipped: usize,
    exit_code: u8,
}

/// Format a run report as JSON.
pub fn format_report_json(report: &RunReport) -> String {
    let json = JsonReport {
        report,
        passed: report.passed_count(),
        failed: report.failed_count(),
        skipped: report.skipped_count(),
        exit_code: report.exit_code(),
    };
    serde_json::to_string_pretty(&json)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize report: {}"}}"#, e))
}

/// Format a report in the requested format.
pub fn render(report: &RunReport, format: MessageFormat, verbose: bool) -> String {
    match format {
        MessageFormat::Human => format_report(report, verbose),
        MessageFormat::Json => format_report_json(report),
    }
}

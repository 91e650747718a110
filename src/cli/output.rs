//! Output formatting for refcheck reports.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: color disabled via NO_COLOR or --no-color
//! - Empty reports: valid output with zero checks
//! - Unexecuted checks: rendered as "Not executed" rather than dropped
//!
//! All formatters produce valid output for any ValidationReport input.

use crate::cli::args::OutputFormat;
use crate::engine::result::{ResultSummary, ValidationReport};
use crate::platform::host;
use crate::{CheckCategory, CheckResult};
use serde::Serialize;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a validation report into a string
    fn format(&self, report: &ValidationReport) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn status_tag(&self, result: Option<&CheckResult>) -> String {
        match result {
            Some(CheckResult::Pass { .. }) => self.colorize("[PASS]", "32"),
            Some(CheckResult::Warn { .. }) => self.colorize("[WARN]", "33"),
            Some(CheckResult::Fail { .. }) => self.colorize("[FAIL]", "31"),
            Some(CheckResult::Skip { .. }) => self.colorize("[SKIP]", "90"),
            None => self.colorize("[----]", "90"),
        }
    }

    fn result_text(&self, result: Option<&CheckResult>) -> String {
        match result {
            Some(CheckResult::Pass { message, duration_ms }) if self.verbose => {
                format!("{} ({}ms)", message, duration_ms)
            }
            Some(CheckResult::Pass { message, .. }) => message.clone(),
            Some(CheckResult::Warn { message, details, duration_ms })
            | Some(CheckResult::Fail { message, details, duration_ms }) => {
                if self.verbose {
                    format!("{} - {} ({}ms)", message, details, duration_ms)
                } else {
                    message.clone()
                }
            }
            Some(CheckResult::Skip { reason }) => reason.clone(),
            None => "Not executed".to_string(),
        }
    }

    fn is_issue(result: Option<&CheckResult>) -> bool {
        matches!(result, Some(CheckResult::Fail { .. }) | Some(CheckResult::Warn { .. }))
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        output.push_str(RULE);
        output.push('\n');
        output.push_str("refcheck validation report\n");
        output.push_str(&format!("Host: {}\n", report.hostname));
        output.push_str(&format!("Backend: {}\n", report.backend));
        output.push_str(&format!("Timestamp: {}\n", host::format_timestamp(report.timestamp)));
        output.push_str(RULE);
        output.push_str("\n\n");

        for category in CheckCategory::ALL {
            let category_checks: Vec<_> = report
                .checks
                .iter()
                .filter(|c| c.category == category)
                .collect();

            if category_checks.is_empty() {
                continue;
            }

            if self.quiet && !category_checks.iter().any(|c| Self::is_issue(c.result.as_ref())) {
                continue;
            }

            output.push_str(&format!("{} CHECKS\n", category.slug().to_uppercase()));

            for check in category_checks {
                let result = check.result.as_ref();
                if self.quiet && !Self::is_issue(result) {
                    continue;
                }

                output.push_str(&format!(
                    "  {} {}: {} ({})\n",
                    self.status_tag(result),
                    check.id,
                    check.name,
                    self.result_text(result)
                ));
                if self.verbose && !check.description.is_empty() {
                    output.push_str(&format!("         {}\n", check.description));
                }
            }

            output.push('\n');
        }

        let summary = report.summary();
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} passed, {} warnings, {} failed, {} skipped\n",
            summary.passed, summary.warned, summary.failed, summary.skipped
        ));
        output.push_str(&format!(
            "Total time: {:.1}s\n",
            report.total_duration_ms as f64 / 1000.0
        ));

        let exit_desc = match summary.exit_code() {
            1 => "failures detected",
            2 => "warnings detected",
            _ => "all checks passed",
        };
        output.push_str(&format!("Exit code: {} ({})\n", summary.exit_code(), exit_desc));
        output.push_str(RULE);

        output
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a ValidationReport,
    generated_at: String,
    summary: ResultSummary,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let doc = JsonReport {
            report,
            generated_at: host::format_timestamp(report.timestamp),
            summary: report.summary(),
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        };

        rendered.unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}

/// JUnit XML formatter
#[derive(Default)]
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }

    fn seconds(ms: u64) -> f64 {
        ms as f64 / 1000.0
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total,
            summary.failed,
            summary.skipped,
            Self::seconds(report.total_duration_ms)
        ));

        for category in CheckCategory::ALL {
            let category_checks: Vec<_> = report
                .checks
                .iter()
                .filter(|c| c.category == category)
                .collect();

            if category_checks.is_empty() {
                continue;
            }

            let suite_name = category.slug();
            let suite_failures = category_checks
                .iter()
                .filter(|c| matches!(&c.result, Some(CheckResult::Fail { .. })))
                .count();
            let suite_skipped = category_checks
                .iter()
                .filter(|c| matches!(&c.result, Some(CheckResult::Skip { .. })))
                .count();
            let suite_time: u64 = category_checks
                .iter()
                .filter_map(|c| c.result.as_ref().and_then(CheckResult::duration_ms))
                .sum();

            output.push_str(&format!(
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
                suite_name,
                category_checks.len(),
                suite_failures,
                suite_skipped,
                Self::seconds(suite_time)
            ));

            for check in category_checks {
                let time = check
                    .result
                    .as_ref()
                    .and_then(CheckResult::duration_ms)
                    .unwrap_or(0);

                output.push_str(&format!(
                    "    <testcase name=\"{}\" classname=\"refcheck.{}\" time=\"{:.3}\"",
                    Self::escape_xml(&check.id),
                    suite_name,
                    Self::seconds(time)
                ));

                let body = match &check.result {
                    Some(CheckResult::Pass { message, .. }) => {
                        format!("<system-out>{}</system-out>", Self::escape_xml(message))
                    }
                    Some(CheckResult::Warn { message, details, .. }) => format!(
                        "<system-out>WARNING: {} - {}</system-out>",
                        Self::escape_xml(message),
                        Self::escape_xml(details)
                    ),
                    Some(CheckResult::Fail { message, details, .. }) => format!(
                        "<failure message=\"{}\">{}</failure>",
                        Self::escape_xml(message),
                        Self::escape_xml(details)
                    ),
                    Some(CheckResult::Skip { reason }) => {
                        format!("<skipped message=\"{}\" />", Self::escape_xml(reason))
                    }
                    None => {
                        output.push_str(" />\n");
                        continue;
                    }
                };

                output.push_str(">\n");
                output.push_str(&format!("      {}\n", body));
                output.push_str("    </testcase>\n");
            }

            output.push_str("  </testsuite>\n");
        }

        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    color: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}

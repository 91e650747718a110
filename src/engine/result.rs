//! Result aggregation and reporting.
//!
//! Collects check results, generates summaries, and supports baseline comparison.

use crate::platform::host;
use crate::{Check, CheckCategory, CheckResult, RefcheckError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

impl ResultSummary {
    fn from_checks(checks: &[Check]) -> Self {
        let mut summary = ResultSummary::default();

        for check in checks {
            summary.total += 1;

            match &check.result {
                Some(CheckResult::Pass { duration_ms, .. }) => {
                    summary.passed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Warn { duration_ms, .. }) => {
                    summary.warned += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Fail { duration_ms, .. }) => {
                    summary.failed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Skip { .. }) | None => {
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    /// Report exit code: 0 all passed, 1 failures, 2 warnings only
    pub fn exit_code(&self) -> u8 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }
}

/// Validation report containing all check results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Unix timestamp (seconds)
    pub timestamp: u64,
    pub hostname: String,
    /// Kernel backend the checks ran against
    pub backend: String,
    pub checks: Vec<Check>,
    pub total_duration_ms: u64,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        ValidationReport {
            timestamp: host::get_unix_timestamp(),
            hostname: String::new(),
            backend: String::new(),
            checks: Vec::new(),
            total_duration_ms: 0,
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_checks(&self.checks)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Baseline comparison result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    pub new_failures: Vec<String>,
    pub new_warnings: Vec<String>,
    pub resolved: Vec<String>,
    pub regressions: Vec<String>,
    pub unchanged: Vec<String>,
}

impl ComparisonResult {
    /// True when nothing got worse relative to the baseline
    pub fn is_clean(&self) -> bool {
        self.new_failures.is_empty() && self.regressions.is_empty()
    }

    /// Human-readable summary, one line per non-empty group
    pub fn render(&self) -> String {
        let groups = [
            ("Regressions", &self.regressions),
            ("New failures", &self.new_failures),
            ("New warnings", &self.new_warnings),
            ("Resolved", &self.resolved),
        ];

        let mut lines = vec!["Baseline comparison:".to_string()];
        for (label, ids) in groups.iter() {
            if !ids.is_empty() {
                lines.push(format!("  {}: {}", label, ids.join(", ")));
            }
        }
        lines.push(format!("  Unchanged: {}", self.unchanged.len()));
        lines.join("\n")
    }
}

/// Result aggregator for collecting check results
pub struct ResultAggregator {
    checks: Vec<Check>,
    hostname: String,
    backend: String,
    total_duration_ms: u64,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new() -> Self {
        ResultAggregator {
            checks: Vec::new(),
            hostname: String::new(),
            backend: String::new(),
            total_duration_ms: 0,
        }
    }

    /// Set report metadata
    pub fn set_metadata(&mut self, hostname: String, backend: String, total_duration_ms: u64) {
        self.hostname = hostname;
        self.backend = backend;
        self.total_duration_ms = total_duration_ms;
    }

    /// Add a completed check result
    pub fn add_result(&mut self, check: Check) {
        self.checks.push(check);
    }

    /// Check if there are any failures
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(&c.result, Some(CheckResult::Fail { .. })))
    }

    /// Get summary statistics
    pub fn get_summary(&self) -> ResultSummary {
        ResultSummary::from_checks(&self.checks)
    }

    /// Get checks by category
    pub fn get_by_category(&self, category: CheckCategory) -> Vec<&Check> {
        self.checks
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    /// Get only failed checks
    pub fn get_failures(&self) -> Vec<&Check> {
        self.checks
            .iter()
            .filter(|c| matches!(&c.result, Some(CheckResult::Fail { .. })))
            .collect()
    }

    /// Get only warning checks
    pub fn get_warnings(&self) -> Vec<&Check> {
        self.checks
            .iter()
            .filter(|c| matches!(&c.result, Some(CheckResult::Warn { .. })))
            .collect()
    }

    /// Create final validation report
    pub fn to_report(&self) -> ValidationReport {
        ValidationReport {
            timestamp: host::get_unix_timestamp(),
            hostname: self.hostname.clone(),
            backend: self.backend.clone(),
            checks: self.checks.clone(),
            total_duration_ms: self.total_duration_ms,
        }
    }

    /// Compare against a baseline report
    pub fn compare_to_baseline(&self, baseline: &ValidationReport) -> ComparisonResult {
        compare_checks(&self.checks, baseline)
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare a finished report against a baseline report
pub fn compare_reports(current: &ValidationReport, baseline: &ValidationReport) -> ComparisonResult {
    compare_checks(&current.checks, baseline)
}

fn compare_checks(checks: &[Check], baseline: &ValidationReport) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    let baseline_status: HashMap<&str, &'static str> = baseline
        .checks
        .iter()
        .filter_map(|c| c.result.as_ref().map(|r| (c.id.as_str(), r.status())))
        .collect();

    for check in checks {
        let current = check.result.as_ref().map(|r| r.status());
        let previous = baseline_status.get(check.id.as_str()).copied();

        match (previous, current) {
            (Some("pass"), Some("fail")) => result.regressions.push(check.id.clone()),
            (Some("pass"), Some("warn")) => result.new_warnings.push(check.id.clone()),
            (Some("fail"), Some("pass")) | (Some("warn"), Some("pass")) => {
                result.resolved.push(check.id.clone())
            }
            (None, Some("fail")) => result.new_failures.push(check.id.clone()),
            (None, Some("warn")) => result.new_warnings.push(check.id.clone()),
            _ => result.unchanged.push(check.id.clone()),
        }
    }

    result
}

/// Save a validation report as JSON baseline
pub fn save_as_baseline(report: &ValidationReport, path: &Path) -> Result<(), RefcheckError> {
    let json = serde_json::to_string_pretty(report).map_err(|e| RefcheckError::Parse {
        context: "save_as_baseline".to_string(),
        message: e.to_string(),
    })?;

    fs::write(path, json).map_err(|e| RefcheckError::Io {
        context: format!("save_as_baseline {}", path.display()),
        message: e.to_string(),
    })
}

/// Load a validation report from JSON baseline.
///
/// Accepts both baselines written by [`save_as_baseline`] and the output of
/// `--format json`; extra fields such as `summary` are ignored.
pub fn load_baseline(path: &Path) -> Result<ValidationReport, RefcheckError> {
    let content = fs::read_to_string(path).map_err(|e| RefcheckError::Io {
        context: format!("load_baseline {}", path.display()),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| RefcheckError::Parse {
        context: format!("load_baseline {}", path.display()),
        message: e.to_string(),
    })
}

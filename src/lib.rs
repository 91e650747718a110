//! refcheck library
//!
//! Validators for externally supplied numeric and sorting kernels.
//!
//! Two independent validators live here:
//! - The numeric sequence validator compares `fib`, `sqr` and `ring` against a
//!   literal reference sequence and locally computed values
//! - The sort validator fills a buffer with pseudo-random integers, sorts it with
//!   a quicksort kernel and checks the result is non-decreasing
//!
//! Both can be run standalone (see [`validators`]) or as checks in a
//! [`ValidationReport`] through [`run_checks`].
//!
//! # Example
//!
//! ```no_run
//! use refcheck::{run_checks, RefcheckConfig};
//!
//! let config = RefcheckConfig::default();
//! let report = run_checks(config).expect("Validation failed");
//! println!("Checks passed: {}", report.summary().passed);
//! ```

pub mod cli;
pub mod engine;
pub mod kernels;
pub mod platform;
pub mod validators;
pub mod version;

use cli::args::{CategoryFilter, CheckArgs, GlobalArgs};
use engine::orchestrator::{create_all_checks, CheckOrchestrator, OrchestratorConfig};
use engine::result::ValidationReport;
use kernels::{BackendKind, KernelSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use validators::sort::SortValidatorConfig;

pub use engine::orchestrator::CheckOrchestrator as Orchestrator;
pub use engine::result::{ResultSummary, ValidationReport as Report};
pub use validators::Verdict;

/// Check result indicating the outcome of a validation check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckResult {
    /// Check passed successfully
    Pass { message: String, duration_ms: u64 },
    /// Check passed with a suspicious outcome
    Warn {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Check failed
    Fail {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Check was skipped
    Skip { reason: String },
}

impl CheckResult {
    /// Short lowercase status label ("pass", "warn", "fail", "skip")
    pub fn status(&self) -> &'static str {
        match self {
            CheckResult::Pass { .. } => "pass",
            CheckResult::Warn { .. } => "warn",
            CheckResult::Fail { .. } => "fail",
            CheckResult::Skip { .. } => "skip",
        }
    }

    /// Execution time, if the check actually ran
    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            CheckResult::Pass { duration_ms, .. }
            | CheckResult::Warn { duration_ms, .. }
            | CheckResult::Fail { duration_ms, .. } => Some(*duration_ms),
            CheckResult::Skip { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CheckResult::Fail { .. })
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "PASS: {}", message),
            CheckResult::Warn { message, details, .. } => {
                write!(f, "WARN: {} ({})", message, details)
            }
            CheckResult::Fail { message, details, .. } => {
                write!(f, "FAIL: {} ({})", message, details)
            }
            CheckResult::Skip { reason } => write!(f, "SKIP: {}", reason),
        }
    }
}

/// Check category for grouping related checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckCategory {
    /// Fibonacci, square and ring kernel checks
    Numeric,
    /// Quicksort kernel checks
    Sort,
    /// External validator executables
    Probe,
}

impl CheckCategory {
    /// All categories in report order
    pub const ALL: [CheckCategory; 3] = [
        CheckCategory::Numeric,
        CheckCategory::Sort,
        CheckCategory::Probe,
    ];

    /// Lowercase name used for JUnit suite names
    pub fn slug(&self) -> &'static str {
        match self {
            CheckCategory::Numeric => "numeric",
            CheckCategory::Sort => "sort",
            CheckCategory::Probe => "probe",
        }
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Numeric => write!(f, "Numeric"),
            CheckCategory::Sort => write!(f, "Sort"),
            CheckCategory::Probe => write!(f, "Probe"),
        }
    }
}

/// A validation check with its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Unique identifier (e.g., "NUM-001")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Check category
    pub category: CheckCategory,
    /// Description of what this check validates
    pub description: String,
    /// Result of the check (None if not yet executed)
    pub result: Option<CheckResult>,
}

impl Default for Check {
    fn default() -> Self {
        Check {
            id: String::new(),
            name: String::new(),
            category: CheckCategory::Numeric,
            description: String::new(),
            result: None,
        }
    }
}

/// Error types for refcheck operations.
#[derive(Debug, Clone, Error)]
pub enum RefcheckError {
    /// Requested kernel backend is not compiled in
    #[error("Kernel backend '{backend}' is not available in this build")]
    BackendUnavailable { backend: String },

    /// Configuration values out of range
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Operation timed out
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout { operation: String, timeout_ms: u64 },

    /// I/O error
    #[error("I/O error in {context}: {message}")]
    Io { context: String, message: String },

    /// Parse error
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    /// External command error
    #[error("Command '{command}' error: {message}")]
    Command { command: String, message: String },
}

/// Configuration for running validation checks.
#[derive(Debug, Clone)]
pub struct RefcheckConfig {
    /// Categories to run (None = all)
    pub categories: Option<Vec<CheckCategory>>,
    /// Specific checks to skip (by ID)
    pub skip_checks: Vec<String>,
    /// Specific checks to run (by ID)
    pub only_checks: Vec<String>,
    /// Stop on first failure
    pub fail_fast: bool,
    /// Per-check timeout in milliseconds
    pub timeout_ms: u64,
    /// Kernel implementation under test
    pub backend: BackendKind,
    /// Sort validator trial settings
    pub sort: SortValidatorConfig,
}

impl Default for RefcheckConfig {
    fn default() -> Self {
        RefcheckConfig {
            categories: None,
            skip_checks: Vec::new(),
            only_checks: Vec::new(),
            fail_fast: false,
            timeout_ms: 30000,
            backend: BackendKind::Reference,
            sort: SortValidatorConfig::default(),
        }
    }
}

impl RefcheckConfig {
    /// Create configuration from command line arguments
    pub fn from_args(global: &GlobalArgs, args: &CheckArgs) -> Self {
        let categories = match args.category {
            CategoryFilter::All => None,
            CategoryFilter::Numeric => Some(vec![CheckCategory::Numeric]),
            CategoryFilter::Sort => Some(vec![CheckCategory::Sort]),
        };

        RefcheckConfig {
            categories,
            skip_checks: args.skip.clone(),
            only_checks: args.only.clone(),
            fail_fast: args.fail_fast,
            timeout_ms: args.timeout_ms,
            backend: global.backend,
            sort: args.sort.to_config(),
        }
    }

    /// Reject settings the validators cannot honour
    pub fn validate(&self) -> Result<(), RefcheckError> {
        self.sort.validate()
    }
}

/// Run validation checks against the configured kernel backend.
///
/// This is the main entry point for running validation checks.
///
/// # Example
///
/// ```no_run
/// use refcheck::{run_checks, RefcheckConfig, CheckCategory};
///
/// // Run only the sort checks
/// let config = RefcheckConfig {
///     categories: Some(vec![CheckCategory::Sort]),
///     ..Default::default()
/// };
///
/// match run_checks(config) {
///     Ok(report) => {
///         let summary = report.summary();
///         println!("Passed: {}, Failed: {}", summary.passed, summary.failed);
///     }
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_checks(config: RefcheckConfig) -> Result<ValidationReport, RefcheckError> {
    let kernels = KernelSet::for_backend(config.backend)?;
    run_checks_with(config, kernels)
}

/// Run validation checks against an explicit set of kernels.
///
/// `config.backend` is only used as the report label.
pub fn run_checks_with(
    config: RefcheckConfig,
    kernels: KernelSet,
) -> Result<ValidationReport, RefcheckError> {
    config.validate()?;

    let orch_config = OrchestratorConfig {
        fail_fast: config.fail_fast,
        timeout_ms: config.timeout_ms,
        backend: config.backend.to_string(),
    };

    let mut orchestrator = CheckOrchestrator::new(orch_config);
    orchestrator.register_checks(create_all_checks(&kernels, &config.sort));

    let report = if !config.only_checks.is_empty() {
        orchestrator.run_specific(&config.only_checks)
    } else if !config.skip_checks.is_empty() {
        orchestrator.run_excluding(&config.skip_checks)
    } else if let Some(ref categories) = config.categories {
        if categories.is_empty() {
            orchestrator.run_all()
        } else {
            orchestrator.run_categories(categories)
        }
    } else {
        orchestrator.run_all()
    };

    Ok(report)
}

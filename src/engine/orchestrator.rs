//! Check execution orchestrator.
//!
//! Manages check registration, dependency ordering, and execution.
//!
//! # Graceful Degradation
//!
//! - Kernel panics: caught via `std::panic::catch_unwind`, converted to a Fail result
//! - Check timeout: a check that runs past `timeout_ms` is reported as Fail
//! - External validator exiting nonzero but not 1: reported as Warn
//! - Invalid check ID: silently skipped in `run_specific`/`run_excluding`
//! - Empty check list: returns an empty report (not an error)
//!
//! Checks run one after another on the calling thread. All registered checks
//! complete regardless of individual failures, unless `fail_fast` is enabled.

use crate::engine::result::{ResultAggregator, ValidationReport};
use crate::kernels::KernelSet;
use crate::platform::host;
use crate::platform::process::{self, ProbeRequest};
use crate::validators::numeric::{self, Deviation};
use crate::validators::sort::{self, SortValidatorConfig};
use crate::validators::Verdict;
use crate::{Check, CheckCategory, CheckResult, RefcheckError};
use std::collections::HashSet;
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub fail_fast: bool,
    pub timeout_ms: u64,
    /// Backend label recorded in the report
    pub backend: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            fail_fast: false,
            timeout_ms: 30000,
            backend: "reference".to_string(),
        }
    }
}

/// A registered check with its execution function
pub struct RegisteredCheck {
    pub id: String,
    pub name: String,
    pub category: CheckCategory,
    pub description: String,
    pub check_fn: Box<dyn Fn() -> CheckResult + Send + Sync>,
    pub dependencies: Vec<String>,
}

impl RegisteredCheck {
    fn to_check(&self, result: CheckResult) -> Check {
        Check {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            description: self.description.clone(),
            result: Some(result),
        }
    }
}

/// Check orchestrator
pub struct CheckOrchestrator {
    config: OrchestratorConfig,
    checks: Vec<RegisteredCheck>,
}

impl CheckOrchestrator {
    /// Create a new orchestrator with the given configuration
    pub fn new(config: OrchestratorConfig) -> Self {
        CheckOrchestrator {
            config,
            checks: Vec::new(),
        }
    }

    /// Register checks for execution
    pub fn register_checks(&mut self, checks: Vec<RegisteredCheck>) {
        self.checks.extend(checks);
    }

    /// Register a single check
    pub fn register_check(&mut self, check: RegisteredCheck) {
        self.checks.push(check);
    }

    /// IDs of all registered checks, in registration order
    pub fn check_ids(&self) -> Vec<String> {
        self.checks.iter().map(|c| c.id.clone()).collect()
    }

    /// Run all registered checks
    pub fn run_all(&self) -> ValidationReport {
        self.run_checks(&self.check_ids())
    }

    /// Run checks in a specific category
    pub fn run_category(&self, category: CheckCategory) -> ValidationReport {
        self.run_categories(&[category])
    }

    /// Run checks in multiple categories
    pub fn run_categories(&self, categories: &[CheckCategory]) -> ValidationReport {
        let ids: Vec<String> = self
            .checks
            .iter()
            .filter(|c| categories.contains(&c.category))
            .map(|c| c.id.clone())
            .collect();
        self.run_checks(&ids)
    }

    /// Run specific checks by ID
    pub fn run_specific(&self, check_ids: &[String]) -> ValidationReport {
        self.run_checks(check_ids)
    }

    /// Run all checks except specified IDs
    pub fn run_excluding(&self, skip_ids: &[String]) -> ValidationReport {
        let ids: Vec<String> = self
            .checks
            .iter()
            .filter(|c| !skip_ids.contains(&c.id))
            .map(|c| c.id.clone())
            .collect();
        self.run_checks(&ids)
    }

    /// Execute the specified checks
    fn run_checks(&self, check_ids: &[String]) -> ValidationReport {
        let start = Instant::now();
        let mut aggregator = ResultAggregator::new();

        for check_id in self.resolve_dependencies(check_ids) {
            let Some(check) = self.checks.iter().find(|c| c.id == check_id) else {
                continue;
            };

            let result = self.execute_check(check);
            match &result {
                CheckResult::Fail { message, .. } => warn!(check = %check.id, reason = %message, "check failed"),
                other => info!(check = %check.id, status = other.status(), "check finished"),
            }

            let failed = result.is_failure();
            aggregator.add_result(check.to_check(result));

            if self.config.fail_fast && failed {
                debug!(check = %check.id, "fail-fast: stopping after first failure");
                break;
            }
        }

        let total_duration_ms = start.elapsed().as_millis() as u64;
        let hostname = host::get_hostname().unwrap_or_else(|_| "unknown".to_string());

        aggregator.set_metadata(hostname, self.config.backend.clone(), total_duration_ms);
        aggregator.to_report()
    }

    /// Execute a single check, converting panics and overruns into failures
    fn execute_check(&self, check: &RegisteredCheck) -> CheckResult {
        let start = Instant::now();
        debug!(check = %check.id, "running check");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (check.check_fn)()));
        let elapsed = start.elapsed().as_millis() as u64;

        match result {
            Ok(check_result) => {
                if elapsed > self.config.timeout_ms {
                    CheckResult::Fail {
                        message: format!("Check timed out after {}ms", elapsed),
                        details: RefcheckError::Timeout {
                            operation: format!("check {}", check.id),
                            timeout_ms: self.config.timeout_ms,
                        }
                        .to_string(),
                        duration_ms: elapsed,
                    }
                } else {
                    check_result
                }
            }
            Err(payload) => CheckResult::Fail {
                message: "Kernel panicked during execution".to_string(),
                details: panic_message(payload.as_ref()),
                duration_ms: elapsed,
            },
        }
    }

    /// Order check IDs so that dependencies run first.
    ///
    /// A dependency is only pulled in if it is itself among `check_ids`.
    fn resolve_dependencies(&self, check_ids: &[String]) -> Vec<String> {
        fn visit(
            id: &str,
            checks: &[RegisteredCheck],
            check_ids: &[String],
            visited: &mut HashSet<String>,
            result: &mut Vec<String>,
        ) {
            if !visited.insert(id.to_string()) {
                return;
            }

            if let Some(check) = checks.iter().find(|c| c.id == id) {
                for dep in &check.dependencies {
                    if check_ids.contains(dep) {
                        visit(dep, checks, check_ids, visited, result);
                    }
                }
            }

            if check_ids.iter().any(|c| c == id) {
                result.push(id.to_string());
            }
        }

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        for id in check_ids {
            visit(id, &self.checks, check_ids, &mut visited, &mut result);
        }
        result
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "An unexpected error occurred".to_string()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn describe_deviations<T: Display>(name: &str, deviations: &[Deviation<T>]) -> String {
    deviations
        .iter()
        .map(|d| format!("{}({}) = {}, expected {}", name, d.index, d.actual, d.expected))
        .collect::<Vec<_>>()
        .join("; ")
}

fn deviation_result<T: Display>(
    name: &str,
    deviations: Vec<Deviation<T>>,
    start: Instant,
) -> CheckResult {
    let duration_ms = elapsed_ms(start);
    let total = numeric::REFERENCE_SEQUENCE.len();

    if deviations.is_empty() {
        CheckResult::Pass {
            message: format!("{} matches at all {} indices", name, total),
            duration_ms,
        }
    } else {
        CheckResult::Fail {
            message: format!("{} differs at {} of {} indices", name, deviations.len(), total),
            details: describe_deviations(name, &deviations),
            duration_ms,
        }
    }
}

/// NUM-001: the numeric sequence validator
pub fn run_numeric_validator(kernels: &KernelSet) -> CheckResult {
    let start = Instant::now();
    let mut printed = Vec::new();

    match numeric::validate_numeric(kernels.numeric.as_ref(), &mut printed) {
        Ok(outcome) => {
            let line = String::from_utf8_lossy(&printed).trim_end().to_string();
            match outcome.mismatch {
                None => CheckResult::Pass {
                    message: format!("printed: {}", line),
                    duration_ms: elapsed_ms(start),
                },
                Some(mismatch) => CheckResult::Fail {
                    message: format!("Mismatch at index {} (printed: {})", mismatch.index, line),
                    details: mismatch.describe(),
                    duration_ms: elapsed_ms(start),
                },
            }
        }
        Err(e) => CheckResult::Fail {
            message: "Numeric validator could not write its output".to_string(),
            details: e.to_string(),
            duration_ms: elapsed_ms(start),
        },
    }
}

/// SORT-001: the sort validator
pub fn run_sort_validator(kernels: &KernelSet, config: &SortValidatorConfig) -> CheckResult {
    if config.trials == 0 {
        return CheckResult::Skip {
            reason: "No sort trials configured".to_string(),
        };
    }

    let start = Instant::now();
    let outcome = sort::validate_sort_seeded(kernels.sort.as_ref(), config);

    match outcome.violation {
        None => CheckResult::Pass {
            message: format!(
                "{} trials of {} elements sorted",
                outcome.trials_run, config.buffer_len
            ),
            duration_ms: elapsed_ms(start),
        },
        Some(v) => CheckResult::Fail {
            message: format!("Buffer out of order in trial {}", v.trial + 1),
            details: format!(
                "arr[{}] = {} > arr[{}] = {}",
                v.index,
                v.left,
                v.index + 1,
                v.right
            ),
            duration_ms: elapsed_ms(start),
        },
    }
}

/// SORT-002: sorted output keeps the input elements
pub fn run_element_preservation(kernels: &KernelSet, config: &SortValidatorConfig) -> CheckResult {
    if config.trials == 0 {
        return CheckResult::Skip {
            reason: "No sort trials configured".to_string(),
        };
    }

    let start = Instant::now();
    let mut rng = config.rng();

    match sort::find_element_loss(kernels.sort.as_ref(), config, &mut rng) {
        None => CheckResult::Pass {
            message: format!("{} trials kept their elements", config.trials),
            duration_ms: elapsed_ms(start),
        },
        Some(loss) => CheckResult::Fail {
            message: format!("Sorted buffer lost elements in trial {}", loss.trial + 1),
            details: format!("input {:?}, output {:?}", loss.input, loss.output),
            duration_ms: elapsed_ms(start),
        },
    }
}

/// Create all registered checks bound to the given kernels
pub fn create_all_checks(kernels: &KernelSet, sort_config: &SortValidatorConfig) -> Vec<RegisteredCheck> {
    let mut checks = Vec::new();

    let k = kernels.clone();
    checks.push(RegisteredCheck {
        id: "NUM-001".to_string(),
        name: "Numeric Sequence Validator".to_string(),
        category: CheckCategory::Numeric,
        description: "Compare fib, sqr and ring against reference values, halting at the first mismatch"
            .to_string(),
        check_fn: Box::new(move || run_numeric_validator(&k)),
        dependencies: vec![],
    });

    let k = kernels.clone();
    checks.push(RegisteredCheck {
        id: "NUM-002".to_string(),
        name: "Fibonacci Reference Sequence".to_string(),
        category: CheckCategory::Numeric,
        description: "Compare fib(0..10) with 1, 1, 2, 3, 5, 8, 13, 21, 34, 55".to_string(),
        check_fn: Box::new(move || {
            let start = Instant::now();
            deviation_result("fib", numeric::sweep_fib(k.numeric.as_ref()), start)
        }),
        dependencies: vec![],
    });

    let k = kernels.clone();
    checks.push(RegisteredCheck {
        id: "NUM-003".to_string(),
        name: "Square Kernel".to_string(),
        category: CheckCategory::Numeric,
        description: "Check sqr(i) == i * i exactly for i in 0..10".to_string(),
        check_fn: Box::new(move || {
            let start = Instant::now();
            deviation_result("sqr", numeric::sweep_sqr(k.numeric.as_ref()), start)
        }),
        dependencies: vec![],
    });

    let k = kernels.clone();
    checks.push(RegisteredCheck {
        id: "NUM-004".to_string(),
        name: "Ring Kernel".to_string(),
        category: CheckCategory::Numeric,
        description: "Check ring(i) == (((0 + i)^2 + i)^2 + i)^2 exactly for i in 0..10".to_string(),
        check_fn: Box::new(move || {
            let start = Instant::now();
            deviation_result("ring", numeric::sweep_ring(k.numeric.as_ref()), start)
        }),
        dependencies: vec![],
    });

    let k = kernels.clone();
    let cfg = sort_config.clone();
    checks.push(RegisteredCheck {
        id: "SORT-001".to_string(),
        name: "Sort Validator".to_string(),
        category: CheckCategory::Sort,
        description: "Sort random buffers with quickSort and check they are non-decreasing".to_string(),
        check_fn: Box::new(move || run_sort_validator(&k, &cfg)),
        dependencies: vec![],
    });

    let k = kernels.clone();
    let cfg = sort_config.clone();
    checks.push(RegisteredCheck {
        id: "SORT-002".to_string(),
        name: "Sort Element Preservation".to_string(),
        category: CheckCategory::Sort,
        description: "Check sorted buffers hold exactly the elements that were filled in".to_string(),
        check_fn: Box::new(move || run_element_preservation(&k, &cfg)),
        dependencies: vec!["SORT-001".to_string()],
    });

    checks
}

/// PRB-001: run an external validator executable
pub fn run_probe_check(request: &ProbeRequest) -> CheckResult {
    let outcome = match process::run_probe(request) {
        Ok(outcome) => outcome,
        Err(e) => {
            return CheckResult::Fail {
                message: "Could not start validator".to_string(),
                details: e.to_string(),
                duration_ms: 0,
            }
        }
    };

    let printed = outcome.stdout.trim_end();
    match (outcome.verdict(), outcome.timed_out) {
        (Verdict::Pass, _) if outcome.exit_code == Some(i32::from(Verdict::Pass.harness_code())) => {
            CheckResult::Pass {
                message: format!("exited with 1 (printed: {})", printed),
                duration_ms: outcome.duration_ms,
            }
        }
        // Counted as a pass, but a crashing runtime (e.g. 101 on panic) lands here too.
        (Verdict::Pass, _) => CheckResult::Warn {
            message: format!(
                "Validator exited with {}, expected 1",
                outcome.exit_code.unwrap_or_default()
            ),
            details: format!("printed: {}", printed),
            duration_ms: outcome.duration_ms,
        },
        (Verdict::Fail, true) => CheckResult::Fail {
            message: format!("Validator killed after {}ms", request.timeout_ms),
            details: RefcheckError::Timeout {
                operation: format!("{} (printed: {})", request.display(), printed),
                timeout_ms: request.timeout_ms,
            }
            .to_string(),
            duration_ms: outcome.duration_ms,
        },
        (Verdict::Fail, false) => CheckResult::Fail {
            message: match outcome.exit_code {
                Some(code) => format!("Validator exited with {}", code),
                None => "Validator terminated by a signal".to_string(),
            },
            details: format!("printed: {}", printed),
            duration_ms: outcome.duration_ms,
        },
    }
}

/// Wrap an external validator run as a registered check
pub fn create_probe_check(request: ProbeRequest) -> RegisteredCheck {
    RegisteredCheck {
        id: "PRB-001".to_string(),
        name: "External Validator".to_string(),
        category: CheckCategory::Probe,
        description: format!("Run `{}` and treat a nonzero exit as a pass", request.display()),
        check_fn: Box::new(move || run_probe_check(&request)),
        dependencies: vec![],
    }
}

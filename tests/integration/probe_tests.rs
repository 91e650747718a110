//! External validator probe tests.
//!
//! Uses `sh -c` as a stand-in validator binary.

#![cfg(unix)]

use refcheck::engine::orchestrator::{create_probe_check, run_probe_check, CheckOrchestrator, OrchestratorConfig};
use refcheck::platform::process::{run_probe, ProbeRequest};
use refcheck::{CheckCategory, CheckResult, Verdict};

fn sh(script: &str) -> ProbeRequest {
    ProbeRequest::new("sh").with_args(["-c", script])
}

#[test]
fn test_passing_validator_exit_code() {
    let result = run_probe_check(&sh("printf '1 1 2 3 5 8 13 21 34 55 '; exit 1"));
    match result {
        CheckResult::Pass { message, .. } => {
            assert_eq!(message, "exited with 1 (printed: 1 1 2 3 5 8 13 21 34 55)")
        }
        other => panic!("expected pass, got {:?}", other),
    }
}

#[test]
fn test_failing_validator_exit_code() {
    match run_probe_check(&sh("printf '0 '; exit 0")) {
        CheckResult::Fail { message, details, .. } => {
            assert_eq!(message, "Validator exited with 0");
            assert_eq!(details, "printed: 0");
        }
        other => panic!("expected fail, got {:?}", other),
    }
}

#[test]
fn test_any_nonzero_exit_passes() {
    let outcome = run_probe(&sh("exit 42")).unwrap();
    assert_eq!(outcome.exit_code, Some(42));
    assert_eq!(outcome.verdict(), Verdict::Pass);
}

#[test]
fn test_unexpected_nonzero_exit_warns() {
    // A Rust validator that panicked exits 101; the harness still counts it.
    match run_probe_check(&sh("printf '1 1 '; exit 101")) {
        CheckResult::Warn { message, details, .. } => {
            assert_eq!(message, "Validator exited with 101, expected 1");
            assert_eq!(details, "printed: 1 1");
        }
        other => panic!("expected warn, got {:?}", other),
    }
}

#[test]
fn test_unexpected_exit_gives_warning_exit_code() {
    let mut orchestrator = CheckOrchestrator::new(OrchestratorConfig::default());
    orchestrator.register_check(create_probe_check(sh("exit 42")));

    let summary = orchestrator.run_all().summary();
    assert_eq!(summary.warned, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.exit_code(), 2);
}

#[test]
fn test_hanging_validator_is_killed() {
    let request = sh("sleep 10; exit 1").with_timeout_ms(150);
    match run_probe_check(&request) {
        CheckResult::Fail { message, details, duration_ms } => {
            assert_eq!(message, "Validator killed after 150ms");
            assert!(details.starts_with("Timeout after 150ms: sh -c sleep 10; exit 1"));
            assert!(duration_ms < 10_000);
        }
        other => panic!("expected timeout failure, got {:?}", other),
    }
}

#[test]
fn test_signal_death_fails() {
    match run_probe_check(&sh("kill -9 $$")) {
        CheckResult::Fail { message, .. } => assert_eq!(message, "Validator terminated by a signal"),
        other => panic!("expected fail, got {:?}", other),
    }
}

#[test]
fn test_missing_validator_fails() {
    let request = ProbeRequest::new("/nonexistent/refcheck/validator");
    match run_probe_check(&request) {
        CheckResult::Fail { message, .. } => assert_eq!(message, "Could not start validator"),
        other => panic!("expected fail, got {:?}", other),
    }
}

#[test]
fn test_probe_check_in_report() {
    let mut orchestrator = CheckOrchestrator::new(OrchestratorConfig {
        backend: "external".to_string(),
        ..Default::default()
    });
    orchestrator.register_check(create_probe_check(sh("exit 1")));

    let report = orchestrator.run_all();
    assert_eq!(report.checks.len(), 1);
    assert_eq!(report.checks[0].id, "PRB-001");
    assert_eq!(report.checks[0].category, CheckCategory::Probe);
    assert_eq!(report.backend, "external");
    assert_eq!(report.summary().exit_code(), 0);
}

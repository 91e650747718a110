//! Output formatting integration tests.
//!
//! Renders real validation runs in every format and checks the JSON output
//! can be read back as a baseline.

use crate::mocks::{conforming, with_numeric, ZeroBasedFib};
use refcheck::cli::args::OutputFormat;
use refcheck::cli::output::{get_formatter, JsonFormatter, JunitFormatter, OutputFormatter, TerminalFormatter};
use refcheck::engine::result::{compare_reports, load_baseline, save_as_baseline, ValidationReport};
use refcheck::validators::sort::SortValidatorConfig;
use refcheck::{run_checks_with, RefcheckConfig};
use std::fs;
use std::path::PathBuf;

fn config() -> RefcheckConfig {
    RefcheckConfig {
        sort: SortValidatorConfig {
            seed: Some(1),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn passing_report() -> ValidationReport {
    run_checks_with(config(), conforming()).unwrap()
}

fn failing_report() -> ValidationReport {
    run_checks_with(config(), with_numeric(ZeroBasedFib)).unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("refcheck-{}-{}.json", name, std::process::id()))
}

#[test]
fn test_terminal_output_for_passing_run() {
    let text = TerminalFormatter::new(false, false, false).format(&passing_report());
    assert!(text.contains("refcheck validation report"));
    assert!(text.contains("[PASS] NUM-001: Numeric Sequence Validator (printed: 1 1 2 3 5 8 13 21 34 55)"));
    assert!(text.contains("SORT CHECKS"));
    assert!(!text.contains("PROBE CHECKS"));
    assert!(text.contains("SUMMARY: 6 passed, 0 warnings, 0 failed, 0 skipped"));
}

#[test]
fn test_terminal_verbose_includes_details() {
    let text = TerminalFormatter::new(false, true, false).format(&failing_report());
    assert!(text.contains("fib(0) = 0, expected 1"));
    assert!(text.contains("Compare fib, sqr and ring"));
}

#[test]
fn test_json_output_is_valid() {
    let json = JsonFormatter::new(true).format(&failing_report());
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["backend"], "reference");
    assert_eq!(value["summary"]["total"], 6);
    assert_eq!(value["summary"]["failed"], 2);
    assert_eq!(value["checks"][0]["id"], "NUM-001");
    assert_eq!(value["checks"][0]["category"], "Numeric");
    assert_eq!(value["checks"][0]["result"]["status"], "fail");
}

#[test]
fn test_junit_output_has_suite_per_category() {
    let xml = JunitFormatter::new().format(&failing_report());
    assert!(xml.contains("<testsuites tests=\"6\" failures=\"2\""));
    assert!(xml.contains("<testsuite name=\"numeric\" tests=\"4\" failures=\"2\""));
    assert!(xml.contains("<testsuite name=\"sort\" tests=\"2\" failures=\"0\""));
    assert!(xml.contains("classname=\"refcheck.numeric\""));
    assert!(xml.contains("<failure message=\"Mismatch at index 0 (printed: 0)\">"));
}

#[test]
fn test_get_formatter_selects_by_format() {
    let report = passing_report();
    assert!(get_formatter(OutputFormat::Json, false, false, false)
        .format(&report)
        .starts_with('{'));
    assert!(get_formatter(OutputFormat::Junit, false, false, false)
        .format(&report)
        .starts_with("<?xml"));
    assert!(get_formatter(OutputFormat::Text, false, false, false)
        .format(&report)
        .starts_with("-----"));
}

#[test]
fn test_json_output_loads_as_baseline() {
    let report = passing_report();
    let path = temp_path("json-baseline");
    fs::write(&path, JsonFormatter::new(true).format(&report)).unwrap();

    let loaded = load_baseline(&path);
    let _ = fs::remove_file(&path);
    assert_eq!(loaded.unwrap(), report);
}

#[test]
fn test_baseline_detects_regression() {
    let baseline = passing_report();
    let path = temp_path("regression");
    save_as_baseline(&baseline, &path).unwrap();
    let loaded = load_baseline(&path).unwrap();
    let _ = fs::remove_file(&path);

    let comparison = compare_reports(&failing_report(), &loaded);
    assert_eq!(comparison.regressions, vec!["NUM-001", "NUM-002"]);
    assert!(!comparison.is_clean());

    let back = compare_reports(&baseline, &failing_report());
    assert_eq!(back.resolved, vec!["NUM-001", "NUM-002"]);
    assert!(back.is_clean());
}

#[test]
fn test_load_baseline_rejects_garbage() {
    let path = temp_path("garbage");
    fs::write(&path, "not json").unwrap();
    let err = load_baseline(&path).unwrap_err();
    let _ = fs::remove_file(&path);
    assert!(matches!(err, refcheck::RefcheckError::Parse { .. }));
}

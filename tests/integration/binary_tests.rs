//! Process-level tests against the built `refcheck` binary.
//!
//! `numeric` and `sort` must exit 1 on pass and 0 on every kind of failure,
//! including bad arguments.

use std::process::{Command, Output};

fn refcheck(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_refcheck"));
    cmd.args(args);
    for var in ["REFCHECK_FORMAT", "REFCHECK_BACKEND", "REFCHECK_SEED", "REFCHECK_LOG"] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run refcheck binary")
}

#[test]
fn test_numeric_prints_sequence_and_exits_one() {
    let output = run(&mut refcheck(&["numeric"]));
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1 1 2 3 5 8 13 21 34 55 ");
}

#[test]
fn test_sort_exits_one_and_prints_nothing() {
    let output = run(&mut refcheck(&["sort"]));
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let output = run(&mut refcheck(&["sort", "--seed", "3", "--trials", "50"]));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_bad_arguments_fail_harness_commands() {
    for args in [
        &["sort", "--trials", "x"][..],
        &["sort", "--buffer-len", "-4"],
        &["numeric", "--backend", "gpu"],
        &["--backend", "gpu", "numeric"],
        &["--format", "json", "sort", "--bogus"],
        &["numeric", "extra"],
    ] {
        let output = run(&mut refcheck(args));
        assert_eq!(output.status.code(), Some(0), "{:?}", args);
        assert!(!output.stderr.is_empty(), "{:?}", args);
    }
}

#[test]
fn test_bad_environment_fails_harness_commands() {
    let output = run(refcheck(&["sort"]).env("REFCHECK_SEED", "abc"));
    assert_eq!(output.status.code(), Some(0));

    let output = run(refcheck(&["numeric"]).env("REFCHECK_BACKEND", "gpu"));
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_buffer_len_fails_sort() {
    let output = run(&mut refcheck(&["sort", "--buffer-len", "3000000000"]));
    assert_eq!(output.status.code(), Some(0));
}

#[cfg(not(feature = "ffi"))]
#[test]
fn test_unavailable_backend_fails_harness_commands() {
    for command in ["numeric", "sort"] {
        let output = run(&mut refcheck(&["--backend", "linked", command]));
        assert_eq!(output.status.code(), Some(0), "{}", command);
        assert!(String::from_utf8_lossy(&output.stderr).contains("not available"));
    }
}

#[test]
fn test_report_commands_keep_runtime_error_code() {
    let output = run(&mut refcheck(&["check", "--trials", "x"]));
    assert_eq!(output.status.code(), Some(3));

    let output = run(&mut refcheck(&["--format", "yaml"]));
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_help_exits_zero() {
    for args in [&["--help"][..], &["sort", "--help"]] {
        let output = run(&mut refcheck(args));
        assert_eq!(output.status.code(), Some(0), "{:?}", args);
        assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
    }
}

#[test]
fn test_check_report_exit_code() {
    let output = run(&mut refcheck(&["check", "--seed", "11", "--format", "json"]));
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["failed"], 0);
}

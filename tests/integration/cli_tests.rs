//! CLI integration tests.
//!
//! Tests for argument parsing and the mapping onto library configuration.

use clap::Parser;
use refcheck::cli::args::{CategoryFilter, CheckArgs, Cli, Command, OutputFormat};
use refcheck::kernels::BackendKind;
use refcheck::{CheckCategory, RefcheckConfig};
use std::path::PathBuf;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("refcheck").chain(args.iter().copied())).unwrap()
}

fn check_args(args: &[&str]) -> (Cli, CheckArgs) {
    let cli = parse(args);
    match cli.resolved_command() {
        Command::Check(check) => (cli, check),
        other => panic!("expected check command, got {:?}", other),
    }
}

#[test]
fn test_default_args() {
    let (cli, args) = check_args(&[]);
    assert_eq!(cli.global.format, OutputFormat::Text);
    assert_eq!(cli.global.backend, BackendKind::Reference);
    assert!(!cli.global.quiet);
    assert!(!cli.global.verbose);
    assert_eq!(args.category, CategoryFilter::All);
    assert!(!args.fail_fast);
    assert_eq!(args.timeout_ms, 30000);
    assert!(args.baseline.is_none());
}

#[test]
fn test_subcommands() {
    assert!(matches!(parse(&["version"]).command, Some(Command::Version)));
    assert!(matches!(parse(&["list"]).command, Some(Command::List)));
    assert!(matches!(parse(&["numeric"]).command, Some(Command::Numeric)));
    assert!(matches!(parse(&["sort"]).command, Some(Command::Sort(_))));
    assert!(matches!(parse(&["check"]).command, Some(Command::Check(_))));
}

#[test]
fn test_sort_subcommand_options() {
    let Some(Command::Sort(args)) = parse(&["sort", "--trials", "25", "--buffer-len", "100", "--seed", "7"]).command
    else {
        panic!("expected sort command");
    };
    let config = args.to_config();
    assert_eq!(config.trials, 25);
    assert_eq!(config.buffer_len, 100);
    assert_eq!(config.seed, Some(7));
}

#[test]
fn test_category_maps_to_config() {
    let (cli, args) = check_args(&["check", "--category", "numeric"]);
    let config = RefcheckConfig::from_args(&cli.global, &args);
    assert_eq!(config.categories, Some(vec![CheckCategory::Numeric]));

    let (cli, args) = check_args(&["check"]);
    assert_eq!(RefcheckConfig::from_args(&cli.global, &args).categories, None);
}

#[test]
fn test_check_options_map_to_config() {
    let (cli, args) = check_args(&[
        "check",
        "--skip",
        "SORT-002",
        "--fail-fast",
        "--timeout",
        "1500",
        "--trials",
        "2",
        "--seed",
        "9",
        "--backend",
        "linked",
    ]);
    let config = RefcheckConfig::from_args(&cli.global, &args);
    assert_eq!(config.skip_checks, vec!["SORT-002"]);
    assert!(config.fail_fast);
    assert_eq!(config.timeout_ms, 1500);
    assert_eq!(config.sort.trials, 2);
    assert_eq!(config.sort.seed, Some(9));
    assert_eq!(config.backend, BackendKind::Linked);
}

#[test]
fn test_baseline_paths() {
    let (_, args) = check_args(&["check", "--baseline", "old.json", "--save-baseline", "new.json"]);
    assert_eq!(args.baseline, Some(PathBuf::from("old.json")));
    assert_eq!(args.save_baseline, Some(PathBuf::from("new.json")));
}

#[test]
fn test_output_formats() {
    assert_eq!(parse(&["--format", "json"]).global.format, OutputFormat::Json);
    assert_eq!(parse(&["--format", "junit"]).global.format, OutputFormat::Junit);
    assert!(parse(&["--quiet"]).global.quiet);
    assert!(!parse(&["--no-color"]).global.use_color());
}

#[test]
fn test_probe_command() {
    let Some(Command::Probe(args)) = parse(&["probe", "./validator", "a", "b"]).command else {
        panic!("expected probe command");
    };
    assert_eq!(args.executable, PathBuf::from("./validator"));
    assert_eq!(args.args, vec!["a", "b"]);
    assert_eq!(args.timeout_ms, 1000);
}

#[test]
fn test_invalid_arguments() {
    assert!(Cli::try_parse_from(["refcheck", "--category", "numeric"]).is_err());
    assert!(Cli::try_parse_from(["refcheck", "check", "--category", "io"]).is_err());
    assert!(Cli::try_parse_from(["refcheck", "check", "--timeout", "soon"]).is_err());
    assert!(Cli::try_parse_from(["refcheck", "--backend", "gpu"]).is_err());
    assert!(Cli::try_parse_from(["refcheck", "probe"]).is_err());
}

#[test]
fn test_harness_invocation_detection() {
    let detect = |args: &[&str]| Cli::is_harness_invocation(std::iter::once("refcheck").chain(args.iter().copied()));

    assert!(detect(&["numeric"]));
    assert!(detect(&["sort", "--trials", "x"]));
    assert!(detect(&["--backend", "gpu", "sort"]));
    assert!(detect(&["--format=json", "-q", "numeric"]));

    assert!(!detect(&[]));
    assert!(!detect(&["check", "--category", "sort"]));
    assert!(!detect(&["--format", "sort"]));
    assert!(!detect(&["probe", "./sort"]));
    assert!(!detect(&["--", "sort"]));
}

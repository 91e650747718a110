//! refcheck CLI entry point
//!
//! Runs the numeric and sort validators, standalone or as a report.

use refcheck::cli::args::{CheckArgs, Cli, Command, GlobalArgs, ProbeArgs, SortArgs};
use refcheck::cli::output::get_formatter;
use refcheck::engine::orchestrator::{create_all_checks, create_probe_check, CheckOrchestrator, OrchestratorConfig};
use refcheck::engine::result::{compare_reports, load_baseline, save_as_baseline, ValidationReport};
use refcheck::kernels::KernelSet;
use refcheck::platform::process::ProbeRequest;
use refcheck::validators::sort::SortValidatorConfig;
use refcheck::validators::{self, numeric, sort, Verdict};
use refcheck::version::get_build_info;
use refcheck::{run_checks, CheckCategory, RefcheckConfig};

use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const RUNTIME_ERROR: u8 = 3;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if !e.use_stderr() {
                ExitCode::SUCCESS
            } else if Cli::is_harness_invocation(std::env::args_os()) {
                // Any nonzero code would read as a pass
                harness_exit(Verdict::Fail)
            } else {
                ExitCode::from(RUNTIME_ERROR)
            };
        }
    };

    init_logging(&cli.global);

    match cli.resolved_command() {
        Command::Check(args) => run_report(&cli.global, &args),
        Command::Numeric => run_numeric(&cli.global),
        Command::Sort(args) => run_sort(&cli.global, &args),
        Command::Probe(args) => run_probe(&cli.global, &args),
        Command::List => {
            print_check_list();
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
    }
}

/// Logs go to stderr so validator output on stdout stays clean
fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_env("REFCHECK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if global.verbose { "refcheck=debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(global.use_color())
        .with_target(false)
        .init();
}

fn harness_exit(verdict: Verdict) -> ExitCode {
    ExitCode::from(verdict.harness_code())
}

fn run_numeric(global: &GlobalArgs) -> ExitCode {
    let kernels = match KernelSet::for_backend(global.backend) {
        Ok(kernels) => kernels,
        Err(e) => {
            eprintln!("Error: {}", e);
            return harness_exit(Verdict::Fail);
        }
    };

    let verdict = validators::guarded(|| {
        let mut out = io::stdout().lock();
        match numeric::validate_numeric(kernels.numeric.as_ref(), &mut out) {
            Ok(outcome) => {
                if let Some(mismatch) = &outcome.mismatch {
                    warn!(index = mismatch.index, "{}", mismatch.describe());
                }
                outcome.verdict()
            }
            Err(e) => {
                error!(error = %e, "numeric validator aborted");
                Verdict::Fail
            }
        }
    });

    info!(backend = %global.backend, verdict = %verdict, "numeric validator finished");
    harness_exit(verdict)
}

fn run_sort(global: &GlobalArgs, args: &SortArgs) -> ExitCode {
    let config = args.to_config();
    let kernels = match config.validate().and_then(|_| KernelSet::for_backend(global.backend)) {
        Ok(kernels) => kernels,
        Err(e) => {
            eprintln!("Error: {}", e);
            return harness_exit(Verdict::Fail);
        }
    };

    let verdict = validators::guarded(|| {
        let outcome = sort::validate_sort_seeded(kernels.sort.as_ref(), &config);
        if let Some(v) = &outcome.violation {
            warn!(
                trial = v.trial,
                index = v.index,
                "arr[{}] = {} > arr[{}] = {}",
                v.index,
                v.left,
                v.index + 1,
                v.right
            );
        }
        outcome.verdict()
    });

    info!(backend = %global.backend, verdict = %verdict, "sort validator finished");
    harness_exit(verdict)
}

fn print_report(global: &GlobalArgs, report: &ValidationReport) {
    let formatter = get_formatter(global.format, global.use_color(), global.verbose, global.quiet);
    println!("{}", formatter.format(report));
}

fn run_report(global: &GlobalArgs, args: &CheckArgs) -> ExitCode {
    let config = RefcheckConfig::from_args(global, args);

    let report = match run_checks(config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error running checks: {}", e);
            return ExitCode::from(RUNTIME_ERROR);
        }
    };

    print_report(global, &report);

    if let Some(path) = &args.save_baseline {
        if let Err(e) = save_as_baseline(&report, path) {
            eprintln!("Error: {}", e);
            return ExitCode::from(RUNTIME_ERROR);
        }
        info!(path = %path.display(), "baseline saved");
    }

    if let Some(path) = &args.baseline {
        match load_baseline(path) {
            Ok(baseline) => {
                let comparison = compare_reports(&report, &baseline);
                if !comparison.is_clean() {
                    warn!(regressions = comparison.regressions.len(), "results regressed against baseline");
                }
                eprintln!("{}", comparison.render());
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(RUNTIME_ERROR);
            }
        }
    }

    ExitCode::from(report.summary().exit_code())
}

fn run_probe(global: &GlobalArgs, args: &ProbeArgs) -> ExitCode {
    let request = ProbeRequest::new(args.executable.clone())
        .with_args(args.args.iter().cloned())
        .with_timeout_ms(args.timeout_ms);

    // The probe enforces its own deadline and kills the child.
    let mut orchestrator = CheckOrchestrator::new(OrchestratorConfig {
        fail_fast: false,
        timeout_ms: u64::MAX,
        backend: "external".to_string(),
    });
    orchestrator.register_check(create_probe_check(request));

    let report = orchestrator.run_all();
    print_report(global, &report);

    ExitCode::from(report.summary().exit_code())
}

fn print_check_list() {
    let checks = create_all_checks(&KernelSet::reference(), &SortValidatorConfig::default());

    println!("Available checks:");
    for category in CheckCategory::ALL {
        println!();
        println!("{} CHECKS:", category.slug().to_uppercase());
        if category == CheckCategory::Probe {
            println!("  {:<9}External Validator (refcheck probe)", "PRB-001");
            continue;
        }
        for check in checks.iter().filter(|c| c.category == category) {
            println!("  {:<9}{}", check.id, check.name);
        }
    }
}

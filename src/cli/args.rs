//! Command line arguments for refcheck.
//!
//! Global flags apply to every subcommand. Running without a subcommand is the
//! same as `refcheck check` with default settings.

use crate::kernels::BackendKind;
use crate::validators::sort::{SortValidatorConfig, DEFAULT_BUFFER_LEN, DEFAULT_TRIALS};
use clap::{Arg, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// Default per-check timeout for `refcheck check`
pub const DEFAULT_CHECK_TIMEOUT_MS: u64 = 30000;

#[derive(Debug, Parser)]
#[command(
    name = "refcheck",
    about = "Validate fib/sqr/ring and quickSort kernels against reference behaviour",
    disable_version_flag = true,
    after_help = "\
Exit codes:
  numeric, sort   1 = pass, 0 = fail (bad arguments also exit 0)
  check, probe    0 = pass, 1 = failures, 2 = warnings, 3 = runtime error

Environment:
  REFCHECK_FORMAT    Default output format
  REFCHECK_BACKEND   Default kernel backend
  REFCHECK_SEED      Fixed seed for the sort validator
  REFCHECK_LOG       Log filter (e.g. refcheck=debug)
  NO_COLOR           Disable colored output"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Subcommand to run, `check` when none was given
    pub fn resolved_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Check(CheckArgs::default()))
    }

    /// Whether a raw command line (program name first) invokes `numeric` or `sort`.
    ///
    /// Used when parsing fails: those commands must still exit with the harness
    /// fail code instead of a nonzero error code.
    pub fn is_harness_invocation<I, T>(args: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let cmd = Cli::command();
        let takes_value = |pred: &dyn Fn(&Arg) -> bool| {
            cmd.get_arguments()
                .any(|a| pred(a) && a.get_action().takes_values())
        };

        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            let Some(arg) = arg.to_str() else {
                return false;
            };
            if arg == "--" {
                return false;
            }
            if let Some(long) = arg.strip_prefix("--") {
                if !long.contains('=') && takes_value(&|a| a.get_long() == Some(long)) {
                    iter.next();
                }
                continue;
            }
            if let Some(short) = arg.strip_prefix('-') {
                let mut chars = short.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    if takes_value(&|a| a.get_short() == Some(c)) {
                        iter.next();
                    }
                }
                continue;
            }
            return matches!(arg, "numeric" | "sort");
        }
        false
    }
}

/// Flags shared by all subcommands
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Output format for reports
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "REFCHECK_FORMAT", global = true)]
    pub format: OutputFormat,

    /// Only show failures and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show check descriptions and debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Kernel implementation to validate
    #[arg(long, value_enum, default_value_t = BackendKind::Reference, env = "REFCHECK_BACKEND", global = true)]
    pub backend: BackendKind,
}

impl GlobalArgs {
    /// Color is on unless `--no-color` or `NO_COLOR` says otherwise
    pub fn use_color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run validation checks and print a report (default)
    Check(CheckArgs),
    /// Run the numeric sequence validator; exits 1 on pass, 0 on fail
    Numeric,
    /// Run the sort validator; exits 1 on pass, 0 on fail
    Sort(SortArgs),
    /// Run an external validator executable with a deadline
    Probe(ProbeArgs),
    /// List all available checks
    List,
    /// Print version information
    Version,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}

/// Check category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CategoryFilter {
    /// Run all checks
    #[default]
    All,
    /// Run only fib/sqr/ring checks
    Numeric,
    /// Run only quicksort checks
    Sort,
}

/// Sort validator tuning
#[derive(Debug, Clone, Args)]
pub struct SortArgs {
    /// Number of fill/sort/verify trials
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    pub trials: usize,

    /// Elements per trial buffer
    #[arg(long, default_value_t = DEFAULT_BUFFER_LEN)]
    pub buffer_len: usize,

    /// Fixed RNG seed; random when omitted
    #[arg(long, env = "REFCHECK_SEED")]
    pub seed: Option<u64>,
}

impl Default for SortArgs {
    fn default() -> Self {
        SortArgs {
            trials: DEFAULT_TRIALS,
            buffer_len: DEFAULT_BUFFER_LEN,
            seed: None,
        }
    }
}

impl SortArgs {
    pub fn to_config(&self) -> SortValidatorConfig {
        SortValidatorConfig {
            trials: self.trials,
            buffer_len: self.buffer_len,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Category of checks to run
    #[arg(long, value_enum, default_value_t = CategoryFilter::All)]
    pub category: CategoryFilter,

    /// Skip a check by ID (repeatable)
    #[arg(long, value_name = "ID")]
    pub skip: Vec<String>,

    /// Run only this check ID (repeatable, overrides --skip)
    #[arg(long, value_name = "ID")]
    pub only: Vec<String>,

    /// Stop after the first failing check
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-check timeout in milliseconds
    #[arg(long = "timeout", value_name = "MS", default_value_t = DEFAULT_CHECK_TIMEOUT_MS)]
    pub timeout_ms: u64,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Compare results against a saved JSON report
    #[arg(long, value_name = "FILE")]
    pub baseline: Option<PathBuf>,

    /// Write this run's report as a JSON baseline
    #[arg(long, value_name = "FILE")]
    pub save_baseline: Option<PathBuf>,
}

impl Default for CheckArgs {
    fn default() -> Self {
        CheckArgs {
            category: CategoryFilter::All,
            skip: Vec::new(),
            only: Vec::new(),
            fail_fast: false,
            timeout_ms: DEFAULT_CHECK_TIMEOUT_MS,
            sort: SortArgs::default(),
            baseline: None,
            save_baseline: None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ProbeArgs {
    /// Validator executable to run
    pub executable: PathBuf,

    /// Arguments passed to the executable
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Kill the validator after this many milliseconds
    #[arg(long = "timeout", value_name = "MS", default_value_t = crate::platform::process::DEFAULT_PROBE_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

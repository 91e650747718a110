//! The two validators.
//!
//! - [`numeric`]: Fibonacci, square and ring kernels against reference values
//! - [`sort`]: repeated fill-sort-check trials over a quicksort kernel
//!
//! Neither validator shares state with the other. Each run starts from scratch,
//! so repeating a run with the same kernels yields the same verdict.

pub mod numeric;
pub mod sort;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Terminal outcome of a validator run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn passed(self) -> bool {
        self == Verdict::Pass
    }

    /// Process exit code in the harness convention: 1 for pass, 0 for fail
    pub fn harness_code(self) -> u8 {
        match self {
            Verdict::Pass => 1,
            Verdict::Fail => 0,
        }
    }

    /// Interpret a harness exit code: any nonzero code is a pass
    pub fn from_harness_code(code: i32) -> Self {
        Self::from_passed(code != 0)
    }
}

/// Run a validator, turning a kernel panic into a failing verdict.
///
/// Without this a panicking kernel would exit 101, which the harness reads as a pass.
pub fn guarded<F: FnOnce() -> Verdict>(f: F) -> Verdict {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(verdict) => verdict,
        Err(_) => {
            error!("kernel panicked during validation");
            Verdict::Fail
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail => write!(f, "fail"),
        }
    }
}

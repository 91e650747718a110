//! Numeric sequence validator.
//!
//! For every index `i` in `[0, 10)`:
//! - `fib(i)` is written to the output sink as `"{value} "` before any comparison
//! - `fib(i)` is called again and compared with [`REFERENCE_SEQUENCE`]`[i]`
//! - `sqr(i)` is compared with [`local_sqr`]
//! - `ring(i)` is compared with [`local_ring`]
//!
//! The three comparisons are combined with a non-short-circuit `|`, so all
//! of them run on every index. Float comparisons are exact. The first index with
//! any mismatch ends the run with [`Verdict::Fail`].

use super::Verdict;
use crate::kernels::NumericKernels;
use crate::RefcheckError;
use std::io::Write;
use tracing::{debug, trace};

/// The first ten Fibonacci numbers, ground truth for `fib`
pub const REFERENCE_SEQUENCE: [i32; 10] = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55];

/// Number of squaring rounds in the ring function
pub const RING_ITERATIONS: usize = 3;

/// Square computed locally
pub fn local_sqr(x: f32) -> f32 {
    x * x
}

/// Ring function computed locally: `acc = (acc + x)²`, three times from zero
pub fn local_ring(x: f32) -> f32 {
    let mut acc = 0.0f32;
    for _ in 0..RING_ITERATIONS {
        acc = local_sqr(acc + x);
    }
    acc
}

/// The first failing index of a numeric run, with all three comparisons
#[derive(Debug, Clone, PartialEq)]
pub struct NumericMismatch {
    pub index: usize,
    pub fib_value: i32,
    pub expected_fib: i32,
    pub sqr_value: f32,
    pub expected_sqr: f32,
    pub ring_value: f32,
    pub expected_ring: f32,
}

impl NumericMismatch {
    pub fn fib_mismatch(&self) -> bool {
        self.fib_value != self.expected_fib
    }

    pub fn sqr_mismatch(&self) -> bool {
        self.sqr_value != self.expected_sqr
    }

    pub fn ring_mismatch(&self) -> bool {
        self.ring_value != self.expected_ring
    }

    /// One line per failed comparison, joined with "; "
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.fib_mismatch() {
            parts.push(format!(
                "fib({}) = {}, expected {}",
                self.index, self.fib_value, self.expected_fib
            ));
        }
        if self.sqr_mismatch() {
            parts.push(format!(
                "sqr({}) = {}, expected {}",
                self.index, self.sqr_value, self.expected_sqr
            ));
        }
        if self.ring_mismatch() {
            parts.push(format!(
                "ring({}) = {}, expected {}",
                self.index, self.ring_value, self.expected_ring
            ));
        }
        parts.join("; ")
    }
}

/// Result of one numeric validator run
#[derive(Debug, Clone, PartialEq)]
pub struct NumericOutcome {
    /// `fib` values in the order they were produced
    pub values: Vec<i32>,
    /// First failing index, if any
    pub mismatch: Option<NumericMismatch>,
}

impl NumericOutcome {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_passed(self.mismatch.is_none())
    }

    /// The text the validator printed, e.g. `"1 1 2 "`
    pub fn printed(&self) -> String {
        self.values.iter().map(|v| format!("{} ", v)).collect()
    }
}

/// Run the numeric sequence validator, printing each `fib` value to `out`.
///
/// Returns an error only if `out` cannot be written.
pub fn validate_numeric<K, W>(kernels: &K, out: &mut W) -> Result<NumericOutcome, RefcheckError>
where
    K: NumericKernels + ?Sized,
    W: Write,
{
    let mut values = Vec::with_capacity(REFERENCE_SEQUENCE.len());

    for (index, &expected_fib) in REFERENCE_SEQUENCE.iter().enumerate() {
        // Printed and compared values come from separate calls, so a stateful
        // kernel is caught even when its printed output looks right.
        let printed_fib = kernels.fib(index as i32);
        values.push(printed_fib);
        write!(out, "{} ", printed_fib)
            .and_then(|_| out.flush())
            .map_err(|e| RefcheckError::Io {
                context: "validate_numeric".to_string(),
                message: e.to_string(),
            })?;

        let fib_value = kernels.fib(index as i32);
        let x = index as f32;
        let expected_sqr = local_sqr(x);
        let sqr_value = kernels.sqr(x);
        let expected_ring = local_ring(x);
        let ring_value = kernels.ring(x);

        trace!(index, fib_value, sqr_value, ring_value, "numeric kernels evaluated");

        let failed =
            (fib_value != expected_fib) | (sqr_value != expected_sqr) | (ring_value != expected_ring);

        if failed {
            let mismatch = NumericMismatch {
                index,
                fib_value,
                expected_fib,
                sqr_value,
                expected_sqr,
                ring_value,
                expected_ring,
            };
            debug!(index, details = %mismatch.describe(), "numeric validator failed");
            return Ok(NumericOutcome {
                values,
                mismatch: Some(mismatch),
            });
        }
    }

    debug!("numeric validator passed all {} indices", REFERENCE_SEQUENCE.len());
    Ok(NumericOutcome {
        values,
        mismatch: None,
    })
}

/// A kernel value that differs from its reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation<T> {
    pub index: usize,
    pub actual: T,
    pub expected: T,
}

/// Every index where `fib` disagrees with the reference sequence
pub fn sweep_fib<K: NumericKernels + ?Sized>(kernels: &K) -> Vec<Deviation<i32>> {
    REFERENCE_SEQUENCE
        .iter()
        .enumerate()
        .map(|(index, &expected)| Deviation {
            index,
            actual: kernels.fib(index as i32),
            expected,
        })
        .filter(|d| d.actual != d.expected)
        .collect()
}

/// Every index where `sqr` disagrees with [`local_sqr`]
pub fn sweep_sqr<K: NumericKernels + ?Sized>(kernels: &K) -> Vec<Deviation<f32>> {
    sweep_float(|x| kernels.sqr(x), local_sqr)
}

/// Every index where `ring` disagrees with [`local_ring`]
pub fn sweep_ring<K: NumericKernels + ?Sized>(kernels: &K) -> Vec<Deviation<f32>> {
    sweep_float(|x| kernels.ring(x), local_ring)
}

fn sweep_float(kernel: impl Fn(f32) -> f32, local: fn(f32) -> f32) -> Vec<Deviation<f32>> {
    (0..REFERENCE_SEQUENCE.len())
        .map(|index| {
            let x = index as f32;
            Deviation {
                index,
                actual: kernel(x),
                expected: local(x),
            }
        })
        .filter(|d| d.actual != d.expected)
        .collect()
}

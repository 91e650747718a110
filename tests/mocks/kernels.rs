//! Mock kernels for validator tests.
//!
//! Each mock reproduces one way a submitted kernel can go wrong:
//! - Zero-based Fibonacci (`fib(0) = 0`)
//! - A square that is off by one at a single index
//! - A ring that stops after one squaring round
//! - Kernels that panic mid-run
//! - Sorts that order descending, do nothing, or overwrite the buffer

use refcheck::kernels::reference::ReferenceKernels;
use refcheck::kernels::{KernelSet, NumericKernels, SortKernel};
use std::sync::{Arc, Mutex};

/// Textbook Fibonacci starting from zero
#[derive(Debug, Default)]
pub struct ZeroBasedFib;

impl NumericKernels for ZeroBasedFib {
    fn fib(&self, index: i32) -> i32 {
        let (mut a, mut b) = (0i32, 1i32);
        for _ in 0..index.max(0) {
            let next = a.wrapping_add(b);
            a = b;
            b = next;
        }
        a
    }

    fn sqr(&self, value: f32) -> f32 {
        ReferenceKernels.sqr(value)
    }

    fn ring(&self, value: f32) -> f32 {
        ReferenceKernels.ring(value)
    }
}

/// Correct except `sqr(bad_index)`, which is one too large
#[derive(Debug)]
pub struct OffByOneSqr {
    pub bad_index: u8,
}

impl NumericKernels for OffByOneSqr {
    fn fib(&self, index: i32) -> i32 {
        ReferenceKernels.fib(index)
    }

    fn sqr(&self, value: f32) -> f32 {
        if value == f32::from(self.bad_index) {
            value * value + 1.0
        } else {
            value * value
        }
    }

    fn ring(&self, value: f32) -> f32 {
        ReferenceKernels.ring(value)
    }
}

/// Ring that squares once instead of three times
#[derive(Debug, Default)]
pub struct SingleRoundRing;

impl NumericKernels for SingleRoundRing {
    fn fib(&self, index: i32) -> i32 {
        ReferenceKernels.fib(index)
    }

    fn sqr(&self, value: f32) -> f32 {
        value * value
    }

    fn ring(&self, value: f32) -> f32 {
        value * value
    }
}

/// `fib` panics once the index reaches `panic_at`
#[derive(Debug)]
pub struct PanickingFib {
    pub panic_at: i32,
}

impl NumericKernels for PanickingFib {
    fn fib(&self, index: i32) -> i32 {
        if index >= self.panic_at {
            panic!("fib kernel crashed at index {}", index);
        }
        ReferenceKernels.fib(index)
    }

    fn sqr(&self, value: f32) -> f32 {
        value * value
    }

    fn ring(&self, value: f32) -> f32 {
        ReferenceKernels.ring(value)
    }
}

/// Sorts the range in descending order
#[derive(Debug, Default)]
pub struct DescendingSort;

impl SortKernel for DescendingSort {
    fn quick_sort(&self, buffer: &mut [i32], low: i32, high: i32) {
        if low < high {
            buffer[low as usize..=high as usize].sort_unstable_by(|a, b| b.cmp(a));
        }
    }
}

/// Leaves the buffer untouched
#[derive(Debug, Default)]
pub struct NoopSort;

impl SortKernel for NoopSort {
    fn quick_sort(&self, _buffer: &mut [i32], _low: i32, _high: i32) {}
}

/// Produces a sorted buffer of zeros, losing every element
#[derive(Debug, Default)]
pub struct ZeroingSort;

impl SortKernel for ZeroingSort {
    fn quick_sort(&self, buffer: &mut [i32], low: i32, high: i32) {
        if low <= high {
            buffer[low as usize..=high as usize].fill(0);
        }
    }
}

/// Panics on every call
#[derive(Debug, Default)]
pub struct PanickingSort;

impl SortKernel for PanickingSort {
    fn quick_sort(&self, _buffer: &mut [i32], low: i32, high: i32) {
        panic!("quickSort crashed on range {}..={}", low, high);
    }
}

/// Correct sort that records every `(low, high)` it was called with
#[derive(Debug, Default)]
pub struct RecordingSort {
    pub calls: Mutex<Vec<(i32, i32)>>,
}

impl RecordingSort {
    pub fn calls(&self) -> Vec<(i32, i32)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl SortKernel for RecordingSort {
    fn quick_sort(&self, buffer: &mut [i32], low: i32, high: i32) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((low, high));
        }
        ReferenceKernels.quick_sort(buffer, low, high);
    }
}

/// Kernels that pass both validators
pub fn conforming() -> KernelSet {
    KernelSet::reference()
}

/// Conforming sort paired with the given numeric kernels
pub fn with_numeric<N: NumericKernels + 'static>(numeric: N) -> KernelSet {
    KernelSet::new(Arc::new(numeric), Arc::new(ReferenceKernels))
}

/// Conforming numeric kernels paired with the given sort
pub fn with_sort<S: SortKernel + 'static>(sort: S) -> KernelSet {
    KernelSet::new(Arc::new(ReferenceKernels), Arc::new(sort))
}

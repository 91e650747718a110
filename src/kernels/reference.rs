//! Built-in Rust kernels.
//!
//! These are conforming implementations: the numeric validator passes against
//! them and the sort validator finds no order violation.

use super::{NumericKernels, SortKernel};

/// Rust implementations of `fib`, `sqr`, `ring` and `quickSort`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKernels;

impl NumericKernels for ReferenceKernels {
    /// Fibonacci with `fib(0) = fib(1) = 1`, matching the reference sequence.
    /// Negative indices yield 1; values past `i32::MAX` wrap.
    fn fib(&self, index: i32) -> i32 {
        let (mut prev, mut cur) = (1i32, 1i32);
        for _ in 1..index.max(1) {
            let next = prev.wrapping_add(cur);
            prev = cur;
            cur = next;
        }
        cur
    }

    fn sqr(&self, value: f32) -> f32 {
        value * value
    }

    /// `(((0 + x)² + x)² + x)²`, evaluated step by step in `f32`
    fn ring(&self, value: f32) -> f32 {
        let first = value * value;
        let second = (first + value) * (first + value);
        (second + value) * (second + value)
    }
}

impl SortKernel for ReferenceKernels {
    fn quick_sort(&self, buffer: &mut [i32], low: i32, high: i32) {
        quick_sort(buffer, low as isize, high as isize);
    }
}

/// Lomuto quicksort over `buffer[low..=high]`, pivoting on the last element.
pub fn quick_sort(buffer: &mut [i32], low: isize, high: isize) {
    if low < high {
        let split = partition(buffer, low as usize, high as usize) as isize;
        quick_sort(buffer, low, split - 1);
        quick_sort(buffer, split + 1, high);
    }
}

fn partition(buffer: &mut [i32], low: usize, high: usize) -> usize {
    let pivot = buffer[high];
    let mut store = low;

    for j in low..high {
        if buffer[j] <= pivot {
            buffer.swap(store, j);
            store += 1;
        }
    }

    buffer.swap(store, high);
    store
}

//! C kernels linked at build time.
//!
//! Binds the symbols
//!
//! ```c
//! int fib(int i);
//! float sqr(float x);
//! float ring(float x);
//! void quickSort(int arr[], int low, int high);
//! ```
//!
//! from the library that `build.rs` locates through `REFCHECK_KERNEL_LIB_DIR`.

use super::{NumericKernels, SortKernel};
use std::os::raw::{c_float, c_int};

mod sys {
    use std::os::raw::{c_float, c_int};

    extern "C" {
        pub fn fib(i: c_int) -> c_int;
        pub fn sqr(x: c_float) -> c_float;
        pub fn ring(x: c_float) -> c_float;
        #[link_name = "quickSort"]
        pub fn quick_sort(arr: *mut c_int, low: c_int, high: c_int);
    }
}

/// Kernels resolved from the linked C library.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedKernels;

impl NumericKernels for LinkedKernels {
    fn fib(&self, index: i32) -> i32 {
        // SAFETY: plain value-in/value-out C function
        unsafe { sys::fib(index as c_int) }
    }

    fn sqr(&self, value: f32) -> f32 {
        // SAFETY: plain value-in/value-out C function
        unsafe { sys::sqr(value as c_float) }
    }

    fn ring(&self, value: f32) -> f32 {
        // SAFETY: plain value-in/value-out C function
        unsafe { sys::ring(value as c_float) }
    }
}

impl SortKernel for LinkedKernels {
    fn quick_sort(&self, buffer: &mut [i32], low: i32, high: i32) {
        if low >= high {
            return;
        }
        assert!(
            low >= 0 && (high as usize) < buffer.len(),
            "sort range {}..={} outside buffer of length {}",
            low,
            high,
            buffer.len()
        );

        // SAFETY: low..=high lies inside `buffer`, which stays borrowed mutably
        // for the duration of the call.
        unsafe { sys::quick_sort(buffer.as_mut_ptr(), low as c_int, high as c_int) }
    }
}

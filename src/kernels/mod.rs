//! Kernel interfaces under validation.
//!
//! The validators never implement the functions they test. They call them
//! through two traits:
//! - [`NumericKernels`]: `fib`, `sqr` and `ring`
//! - [`SortKernel`]: in-place ascending `quick_sort` over an inclusive range
//!
//! Backends:
//! - `reference`: the Rust implementations in [`reference`]
//! - `linked`: the C symbols bound in `ffi` (requires the `ffi` feature)

#[cfg(feature = "ffi")]
pub mod ffi;
pub mod reference;

use crate::RefcheckError;
use std::fmt;
use std::sync::Arc;

/// Fibonacci, square and ring kernels.
pub trait NumericKernels: Send + Sync {
    /// Fibonacci value at `index`
    fn fib(&self, index: i32) -> i32;
    /// Square of `value`
    fn sqr(&self, value: f32) -> f32;
    /// Three-fold iterated squaring of `value`
    fn ring(&self, value: f32) -> f32;
}

/// In-place sort kernel.
pub trait SortKernel: Send + Sync {
    /// Sort `buffer[low..=high]` ascending in place.
    ///
    /// Callers pass indices inside `buffer`. A range with `low >= high` is a no-op.
    fn quick_sort(&self, buffer: &mut [i32], low: i32, high: i32);
}

/// Which kernel implementation to validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendKind {
    /// Built-in Rust kernels
    #[default]
    Reference,
    /// C kernels linked at build time
    Linked,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Reference => write!(f, "reference"),
            BackendKind::Linked => write!(f, "linked"),
        }
    }
}

/// The kernels handed to the validators.
///
/// Numeric and sort kernels are held separately so either side can be swapped.
#[derive(Clone)]
pub struct KernelSet {
    pub numeric: Arc<dyn NumericKernels>,
    pub sort: Arc<dyn SortKernel>,
}

impl KernelSet {
    pub fn new(numeric: Arc<dyn NumericKernels>, sort: Arc<dyn SortKernel>) -> Self {
        KernelSet { numeric, sort }
    }

    /// Built-in Rust kernels
    pub fn reference() -> Self {
        let kernels = Arc::new(reference::ReferenceKernels);
        KernelSet {
            numeric: kernels.clone(),
            sort: kernels,
        }
    }

    /// Resolve a backend selection
    pub fn for_backend(kind: BackendKind) -> Result<Self, RefcheckError> {
        match kind {
            BackendKind::Reference => Ok(Self::reference()),
            BackendKind::Linked => linked(),
        }
    }
}

impl fmt::Debug for KernelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelSet").finish_non_exhaustive()
    }
}

#[cfg(feature = "ffi")]
fn linked() -> Result<KernelSet, RefcheckError> {
    let kernels = Arc::new(ffi::LinkedKernels);
    Ok(KernelSet {
        numeric: kernels.clone(),
        sort: kernels,
    })
}

#[cfg(not(feature = "ffi"))]
fn linked() -> Result<KernelSet, RefcheckError> {
    Err(RefcheckError::BackendUnavailable {
        backend: BackendKind::Linked.to_string(),
    })
}

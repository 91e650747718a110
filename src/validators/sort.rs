//! Sort validator.
//!
//! Each trial fills a fresh buffer with pseudo-random integers, sorts it with
//! `quick_sort(buffer, 0, len - 1)` and scans adjacent pairs. The first pair with
//! `arr[j] > arr[j + 1]` ends the run with [`Verdict::Fail`].
//!
//! Values are drawn from `0..=i32::MAX` with [`StdRng`], seeded from OS entropy
//! unless a seed is configured.

use super::Verdict;
use crate::kernels::SortKernel;
use crate::RefcheckError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

pub const DEFAULT_TRIALS: usize = 10;
pub const DEFAULT_BUFFER_LEN: usize = 15;

/// Trial settings for the sort validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortValidatorConfig {
    /// Number of fill-sort-check cycles
    pub trials: usize,
    /// Elements per buffer
    pub buffer_len: usize,
    /// Fixed RNG seed (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for SortValidatorConfig {
    fn default() -> Self {
        SortValidatorConfig {
            trials: DEFAULT_TRIALS,
            buffer_len: DEFAULT_BUFFER_LEN,
            seed: None,
        }
    }
}

impl SortValidatorConfig {
    /// The kernel takes `i32` indices, so the buffer must be addressable by them
    pub fn validate(&self) -> Result<(), RefcheckError> {
        if self.buffer_len > i32::MAX as usize {
            return Err(RefcheckError::InvalidConfig {
                message: format!(
                    "buffer length {} exceeds the largest sortable length {}",
                    self.buffer_len,
                    i32::MAX
                ),
            });
        }
        Ok(())
    }

    /// A fresh RNG for one validator run
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// First adjacent pair found out of order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderViolation {
    /// Zero-based trial number
    pub trial: usize,
    /// Index `j` of the pair `(j, j + 1)`
    pub index: usize,
    pub left: i32,
    pub right: i32,
}

/// Result of one sort validator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    /// Trials started, including a failing one
    pub trials_run: usize,
    pub violation: Option<OrderViolation>,
}

impl SortOutcome {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_passed(self.violation.is_none())
    }
}

/// Overwrite every slot with a value from `0..=i32::MAX`
pub fn fill_buffer<R: Rng + ?Sized>(buffer: &mut [i32], rng: &mut R) {
    for slot in buffer.iter_mut() {
        *slot = rng.gen_range(0..=i32::MAX);
    }
}

/// Sort the whole buffer through the kernel's inclusive-range interface
pub fn sort_buffer<K: SortKernel + ?Sized>(kernel: &K, buffer: &mut [i32]) {
    let high = buffer.len() as i32 - 1;
    kernel.quick_sort(buffer, 0, high);
}

/// Index and values of the first pair with `buffer[j] > buffer[j + 1]`
pub fn first_descent(buffer: &[i32]) -> Option<(usize, i32, i32)> {
    buffer
        .windows(2)
        .position(|pair| pair[0] > pair[1])
        .map(|j| (j, buffer[j], buffer[j + 1]))
}

/// Run the sort validator with an explicit RNG
pub fn validate_sort<K, R>(kernel: &K, config: &SortValidatorConfig, rng: &mut R) -> SortOutcome
where
    K: SortKernel + ?Sized,
    R: Rng + ?Sized,
{
    for trial in 0..config.trials {
        let mut buffer = vec![0i32; config.buffer_len];
        fill_buffer(&mut buffer, rng);
        trace!(trial, ?buffer, "buffer filled");

        sort_buffer(kernel, &mut buffer);

        if let Some((index, left, right)) = first_descent(&buffer) {
            debug!(trial, index, left, right, "sort validator found descending pair");
            return SortOutcome {
                trials_run: trial + 1,
                violation: Some(OrderViolation {
                    trial,
                    index,
                    left,
                    right,
                }),
            };
        }
    }

    debug!(trials = config.trials, "sort validator passed");
    SortOutcome {
        trials_run: config.trials,
        violation: None,
    }
}

/// Run the sort validator with the RNG described by `config`
pub fn validate_sort_seeded<K: SortKernel + ?Sized>(
    kernel: &K,
    config: &SortValidatorConfig,
) -> SortOutcome {
    let mut rng = config.rng();
    validate_sort(kernel, config, &mut rng)
}

/// A trial whose sorted output is not a rearrangement of its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementLoss {
    pub trial: usize,
    pub input: Vec<i32>,
    pub output: Vec<i32>,
}

/// Check that each trial's output holds exactly the input elements.
///
/// Ordering alone cannot catch a kernel that overwrites the buffer with
/// constants; this compares sorted copies of input and output.
pub fn find_element_loss<K, R>(
    kernel: &K,
    config: &SortValidatorConfig,
    rng: &mut R,
) -> Option<ElementLoss>
where
    K: SortKernel + ?Sized,
    R: Rng + ?Sized,
{
    for trial in 0..config.trials {
        let mut buffer = vec![0i32; config.buffer_len];
        fill_buffer(&mut buffer, rng);
        let input = buffer.clone();

        sort_buffer(kernel, &mut buffer);

        let mut expected = input.clone();
        expected.sort_unstable();
        let mut actual = buffer.clone();
        actual.sort_unstable();

        if expected != actual {
            debug!(trial, "sort kernel did not preserve buffer elements");
            return Some(ElementLoss {
                trial,
                input,
                output: buffer,
            });
        }
    }
    None
}

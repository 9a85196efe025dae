//! Incremental statistics over a sliding rectangular window
//!
//! A [`WindowStatistic`] is told about every sample entering and leaving the
//! window, so sliding the window by one cell costs one row or column of
//! updates instead of a full recompute.

use serde::{Deserialize, Serialize};

use crate::grid::GridData;

/// Scale used to truncate window means and drop floating point noise
const MEAN_PRECISION: f64 = 1_000_000.0;

/// Outcome of asking a window statistic for its value
///
/// Keeps "no data", "excluded" and "real value" apart so callers never need
/// to compare against sentinels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowOutcome {
    /// A statistic computed from enough included samples
    Present(f64),
    /// The window (or its center) is dominated by the excluded value
    Excluded(f64),
    /// Not enough samples to say anything
    NoResult,
}

impl WindowOutcome {
    /// The value to store for this outcome, if any
    pub fn value(self) -> Option<f64> {
        match self {
            WindowOutcome::Present(v) | WindowOutcome::Excluded(v) => Some(v),
            WindowOutcome::NoResult => None,
        }
    }
}

/// A statistic maintained incrementally as a window slides over a grid
pub trait WindowStatistic {
    /// A cell entered the window
    fn increment(&mut self, x: usize, y: usize, grid: &dyn GridData);

    /// A cell left the window. Must exactly undo [`WindowStatistic::increment`].
    fn decrement(&mut self, x: usize, y: usize, grid: &dyn GridData);

    /// The statistic for the window centered at `(x, y)`
    fn result(&self, min_good: usize, grid: &dyn GridData, x: usize, y: usize) -> WindowOutcome;
}

/// How a [`WindowMean`] treats one special data value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExcludePolicy {
    /// Samples equal to this value are counted separately, not averaged
    pub value: Option<f64>,
    /// When the center cell holds the excluded value, return it unchanged
    pub reject_center: bool,
}

/// Running mean of the non-missing samples in a window
#[derive(Debug, Clone, Default)]
pub struct WindowMean {
    sum: f64,
    count: usize,
    num_excluded: usize,
    policy: ExcludePolicy,
}

impl WindowMean {
    pub fn new(policy: ExcludePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Mean with no excluded value
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of included samples
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of samples equal to the excluded value
    pub fn num_excluded(&self) -> usize {
        self.num_excluded
    }

    fn is_excluded(&self, v: f64) -> bool {
        self.policy.value.is_some_and(|e| e == v)
    }
}

impl WindowStatistic for WindowMean {
    fn increment(&mut self, x: usize, y: usize, grid: &dyn GridData) {
        if let Some(v) = grid.value(x, y) {
            if self.is_excluded(v) {
                self.num_excluded += 1;
            } else {
                self.sum += v;
                self.count += 1;
            }
        }
    }

    fn decrement(&mut self, x: usize, y: usize, grid: &dyn GridData) {
        if let Some(v) = grid.value(x, y) {
            if self.is_excluded(v) {
                self.num_excluded -= 1;
            } else {
                self.sum -= v;
                self.count -= 1;
            }
        }
    }

    fn result(&self, min_good: usize, grid: &dyn GridData, x: usize, y: usize) -> WindowOutcome {
        if let Some(exclude) = self.policy.value {
            if self.policy.reject_center && grid.is_equal_at(x, y, exclude) {
                return WindowOutcome::Excluded(exclude);
            }
        }

        if self.count > min_good {
            return WindowOutcome::Present(truncate_mean(self.sum / self.count as f64));
        }

        match self.policy.value {
            Some(exclude) if !self.policy.reject_center && self.num_excluded > 0 => {
                WindowOutcome::Excluded(exclude)
            }
            _ => WindowOutcome::NoResult,
        }
    }
}

/// Truncate toward zero at the sixth decimal place.
///
/// The result is a multiple of 1e-6 no more than 1e-6 from `mean`. A mean
/// whose binary value sits just below a step drops to the step below, so
/// means computed along different summation orders agree to within 1e-6, not
/// exactly.
pub fn truncate_mean(mean: f64) -> f64 {
    let magnitude = (mean.abs() * MEAN_PRECISION).floor() / MEAN_PRECISION;
    if mean < 0.0 && magnitude != 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

//! Box smoothing of a grid using the sliding window traverse
//!
//! [`fast_smooth`] visits each cell once along the serpentine walk and keeps a
//! running [`WindowMean`], so the cost is linear in the number of cells
//! regardless of window size. [`smooth`] recomputes each window from scratch
//! and is kept as the reference. The two agree to within 1e-6: both truncate
//! the mean at the sixth decimal, and a sliding sum can carry a residue that
//! lands on the other side of a truncation step.

use serde::{Deserialize, Serialize};

use crate::grid::GridData;
use crate::window_stats::{ExcludePolicy, WindowMean, WindowOutcome, WindowStatistic};
use crate::window_traverse::WindowTraverse;

/// Parameters for a box smoothing pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothConfig {
    /// Window half-width in x; the window spans `2 * half_width_x + 1` columns
    pub half_width_x: usize,
    /// Window half-width in y
    pub half_width_y: usize,
    /// Optional value to keep out of the average
    pub exclude: ExcludePolicy,
    /// A window needs more than this many included samples to produce a mean
    pub min_good: usize,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            half_width_x: 1,
            half_width_y: 1,
            exclude: ExcludePolicy::default(),
            min_good: 0,
        }
    }
}

fn store<G: GridData + ?Sized>(grid: &mut G, x: usize, y: usize, outcome: WindowOutcome) {
    let value = outcome.value().unwrap_or_else(|| grid.missing());
    grid.set_value(x, y, value);
}

/// Replace every cell with the mean of its window, in place.
///
/// Cells whose window has too few samples become missing. The window reads
/// from a copy of the input, so results never feed back into later windows.
///
/// # Example
///
/// ```
/// use geo_grid_regions::{fast_smooth, Grid, GridData, SmoothConfig};
///
/// let mut grid = Grid::from_values(3, 1, vec![0.0, 3.0, 6.0], -1.0).unwrap();
/// fast_smooth(&mut grid, &SmoothConfig::default());
/// assert_eq!(grid.value(1, 0), Some(3.0));
/// assert_eq!(grid.value(0, 0), Some(1.5));
/// ```
pub fn fast_smooth<G: GridData + Clone>(grid: &mut G, config: &SmoothConfig) {
    let source = grid.clone();
    let (nx, ny) = source.dims();
    let mut traverse = WindowTraverse::new(nx, ny, config.half_width_x, config.half_width_y);
    let mut mean = WindowMean::new(config.exclude);

    while traverse.increment(&source, &mut mean) {
        let ((x, y), outcome) = traverse.result(&mean, config.min_good, &source);
        store(grid, x, y, outcome);
    }
}

/// Reference for [`fast_smooth`], recomputing each window in full. Results
/// match it to within 1e-6.
pub fn smooth<G: GridData + Clone>(grid: &mut G, config: &SmoothConfig) {
    let source = grid.clone();
    let (nx, ny) = source.dims();
    let sx = config.half_width_x;
    let sy = config.half_width_y;

    for y in 0..ny {
        for x in 0..nx {
            let mut mean = WindowMean::new(config.exclude);
            for wy in y.saturating_sub(sy)..=(y + sy).min(ny - 1) {
                for wx in x.saturating_sub(sx)..=(x + sx).min(nx - 1) {
                    mean.increment(wx, wy, &source);
                }
            }
            store(grid, x, y, mean.result(config.min_good, &source, x, y));
        }
    }
}

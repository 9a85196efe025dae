//! Addressable 2D grid used by every algorithm in this crate
//!
//! The algorithms only need a handful of operations from a grid, collected in
//! the [`GridData`] trait. [`Grid`] is a flat row-major implementation that
//! callers can use directly or replace with their own storage.

use crate::error::{GridError, Result};

/// The operations a grid pass needs from its storage.
///
/// Cells are addressed by `(x, y)` with `x` the column and `y` the row, or by
/// the flattened row-major index `y * nx + x`. A cell holding the missing
/// sentinel has no value.
pub trait GridData {
    /// Grid dimensions as `(nx, ny)`
    fn dims(&self) -> (usize, usize);

    /// The missing-value sentinel
    fn missing(&self) -> f64;

    /// Raw value at a flattened index, `None` if the index is out of range
    fn raw_at_index(&self, index: usize) -> Option<f64>;

    /// Store a value at a flattened index. Out of range writes are ignored.
    fn set_value_at_index(&mut self, index: usize, value: f64);

    /// Set every cell to `value`
    fn fill(&mut self, value: f64);

    fn nx(&self) -> usize {
        self.dims().0
    }

    fn ny(&self) -> usize {
        self.dims().1
    }

    /// Total number of cells
    fn len(&self) -> usize {
        let (nx, ny) = self.dims();
        nx * ny
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `(x, y)` addresses a cell. Signed so callers can probe
    /// neighbours and traced points that fall off the grid.
    fn in_range(&self, x: i64, y: i64) -> bool {
        let (nx, ny) = self.dims();
        x >= 0 && y >= 0 && (x as usize) < nx && (y as usize) < ny
    }

    /// Flattened index of `(x, y)`
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.nx() + x
    }

    /// True if `v` is the missing sentinel (NaN sentinels compare as missing)
    fn is_missing_value(&self, v: f64) -> bool {
        let missing = self.missing();
        v == missing || (missing.is_nan() && v.is_nan())
    }

    /// Value at a flattened index, `None` when out of range or missing
    fn value_at_index(&self, index: usize) -> Option<f64> {
        self.raw_at_index(index)
            .filter(|v| !self.is_missing_value(*v))
    }

    /// Value at `(x, y)`, `None` when out of range or missing
    fn value(&self, x: usize, y: usize) -> Option<f64> {
        if !self.in_range(x as i64, y as i64) {
            return None;
        }
        self.value_at_index(self.index(x, y))
    }

    /// Store a value at `(x, y)`. Out of range writes are ignored.
    fn set_value(&mut self, x: usize, y: usize, value: f64) {
        if self.in_range(x as i64, y as i64) {
            let index = self.index(x, y);
            self.set_value_at_index(index, value);
        }
    }

    /// True if the cell holds a value equal to `v`
    fn is_equal_at(&self, x: usize, y: usize, v: f64) -> bool {
        self.value(x, y).is_some_and(|value| value == v)
    }

    /// True if the cell holds a value greater than `v`
    fn is_gt_at(&self, x: usize, y: usize, v: f64) -> bool {
        self.value(x, y).is_some_and(|value| value > v)
    }

    fn is_missing_at(&self, x: usize, y: usize) -> bool {
        self.value(x, y).is_none()
    }

    /// True if both grids have the same dimensions
    fn size_equal(&self, other: &dyn GridData) -> bool {
        self.dims() == other.dims()
    }
}

/// Flat row-major grid of `f64` values with a missing sentinel
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    missing: f64,
    data: Vec<f64>,
}

impl Grid {
    /// Create a grid with every cell missing
    pub fn new(nx: usize, ny: usize, missing: f64) -> Self {
        Self::filled(nx, ny, missing, missing)
    }

    /// Create a grid with every cell set to `value`
    pub fn filled(nx: usize, ny: usize, value: f64, missing: f64) -> Self {
        Self {
            nx,
            ny,
            missing,
            data: vec![value; nx * ny],
        }
    }

    /// Wrap an existing row-major value array
    ///
    /// # Example
    ///
    /// ```
    /// use geo_grid_regions::{Grid, GridData};
    ///
    /// let grid = Grid::from_values(2, 2, vec![1.0, 2.0, 3.0, -1.0], -1.0).unwrap();
    /// assert_eq!(grid.value(1, 0), Some(2.0));
    /// assert_eq!(grid.value(1, 1), None);
    /// ```
    pub fn from_values(nx: usize, ny: usize, values: Vec<f64>, missing: f64) -> Result<Self> {
        if values.len() != nx * ny {
            log::error!(
                "value array of length {} does not fit a {}x{} grid",
                values.len(),
                nx,
                ny
            );
            return Err(GridError::DimensionMismatch {
                expected: (nx, ny),
                actual: (values.len(), 1),
            });
        }
        Ok(Self {
            nx,
            ny,
            missing,
            data: values,
        })
    }

    /// Raw row-major storage, missing cells included
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Value at `(x, y)` or the missing sentinel
    pub fn value_or_missing(&self, x: usize, y: usize) -> f64 {
        self.value(x, y).unwrap_or(self.missing)
    }
}

impl GridData for Grid {
    fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    fn missing(&self) -> f64 {
        self.missing
    }

    fn raw_at_index(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    fn set_value_at_index(&mut self, index: usize, value: f64) {
        if let Some(cell) = self.data.get_mut(index) {
            *cell = value;
        }
    }

    fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}

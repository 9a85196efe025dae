//! Serpentine traversal that slides a window statistic over a grid
//!
//! The walk starts at `(0, 0)`, climbs column 0 to the top row, steps right,
//! descends column 1 to the bottom row, steps right, and so on until every
//! column has been consumed:
//!
//! ```text
//!   y
//!   3  ^ > v ^
//!   2  ^   v ^
//!   1  ^   v ^
//!   0  ^   > ^
//!      0 1 2 3  x
//! ```
//!
//! Every move after the first changes exactly one coordinate by one cell, so
//! the window only has to drop one row (or column) and add one row (or
//! column) of samples.

use crate::grid::GridData;
use crate::window_stats::{WindowOutcome, WindowStatistic};

/// Where the walk is in its climb / step / descend cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraverseState {
    /// Not started; the next increment computes the window at `(0, 0)`
    Init,
    /// Moving up the current column
    Climb,
    /// Just moved one column to the right
    StepRight,
    /// Moving down the current column
    Descend,
    /// Every cell has been visited
    Done,
}

/// Deterministic serpentine walk over an `nx` by `ny` grid with a window of
/// half-widths `sx`, `sy` centered on the current cell.
#[derive(Debug, Clone)]
pub struct WindowTraverse {
    nx: usize,
    ny: usize,
    sx: i64,
    sy: i64,
    x: usize,
    y: usize,
    // inclusive window bounds; may extend past the grid
    min_x: i64,
    max_x: i64,
    min_y: i64,
    max_y: i64,
    state: TraverseState,
}

impl WindowTraverse {
    pub fn new(nx: usize, ny: usize, sx: usize, sy: usize) -> Self {
        let mut traverse = Self {
            nx,
            ny,
            sx: sx as i64,
            sy: sy as i64,
            x: 0,
            y: 0,
            min_x: 0,
            max_x: 0,
            min_y: 0,
            max_y: 0,
            state: TraverseState::Init,
        };
        traverse.reset();
        traverse
    }

    /// Return to the initial state at `(0, 0)`
    pub fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
        self.min_x = -self.sx;
        self.max_x = self.sx;
        self.min_y = -self.sy;
        self.max_y = self.sy;
        self.state = TraverseState::Init;
    }

    /// Current cell
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn state(&self) -> TraverseState {
        self.state
    }

    /// Advance one cell, updating `stat` with the samples that enter and
    /// leave the window.
    ///
    /// The first call positions the walk at `(0, 0)` and fills the window
    /// there. Returns false once there is no cell left to move to; later
    /// calls keep returning false.
    pub fn increment(&mut self, grid: &dyn GridData, stat: &mut dyn WindowStatistic) -> bool {
        match self.state {
            TraverseState::Init => {
                if self.nx == 0 || self.ny == 0 {
                    self.state = TraverseState::Done;
                    return false;
                }
                self.full_compute(grid, stat);
                self.state = TraverseState::Climb;
                true
            }
            TraverseState::Climb => {
                if self.y + 1 < self.ny {
                    self.move_up(grid, stat);
                    true
                } else {
                    self.step_right(grid, stat)
                }
            }
            TraverseState::Descend => {
                if self.y > 0 {
                    self.move_down(grid, stat);
                    true
                } else {
                    self.step_right(grid, stat)
                }
            }
            TraverseState::StepRight => {
                if self.ny == 1 {
                    // single row: nothing to climb or descend
                    self.step_right(grid, stat)
                } else if self.y + 1 >= self.ny {
                    self.state = TraverseState::Descend;
                    self.move_down(grid, stat);
                    true
                } else {
                    self.state = TraverseState::Climb;
                    self.move_up(grid, stat);
                    true
                }
            }
            TraverseState::Done => false,
        }
    }

    /// Current cell together with the statistic for the window around it
    pub fn result(
        &self,
        stat: &dyn WindowStatistic,
        min_good: usize,
        grid: &dyn GridData,
    ) -> ((usize, usize), WindowOutcome) {
        let (x, y) = self.position();
        ((x, y), stat.result(min_good, grid, x, y))
    }

    fn step_right(&mut self, grid: &dyn GridData, stat: &mut dyn WindowStatistic) -> bool {
        if self.x + 1 >= self.nx {
            self.state = TraverseState::Done;
            return false;
        }
        self.x += 1;
        self.state = TraverseState::StepRight;
        self.subtract_column(self.min_x, grid, stat);
        self.min_x += 1;
        self.max_x += 1;
        self.add_column(self.max_x, grid, stat);
        true
    }

    fn move_up(&mut self, grid: &dyn GridData, stat: &mut dyn WindowStatistic) {
        self.y += 1;
        self.subtract_row(self.min_y, grid, stat);
        self.min_y += 1;
        self.max_y += 1;
        self.add_row(self.max_y, grid, stat);
    }

    fn move_down(&mut self, grid: &dyn GridData, stat: &mut dyn WindowStatistic) {
        self.y -= 1;
        self.subtract_row(self.max_y, grid, stat);
        self.min_y -= 1;
        self.max_y -= 1;
        self.add_row(self.min_y, grid, stat);
    }

    fn full_compute(&self, grid: &dyn GridData, stat: &mut dyn WindowStatistic) {
        for y in self.min_y..=self.max_y {
            self.add_row(y, grid, stat);
        }
    }

    fn columns(&self) -> impl Iterator<Item = usize> {
        clip(self.min_x, self.max_x, self.nx)
    }

    fn rows(&self) -> impl Iterator<Item = usize> {
        clip(self.min_y, self.max_y, self.ny)
    }

    fn add_row(&self, y: i64, grid: &dyn GridData, stat: &mut dyn WindowStatistic) {
        if y < 0 || y as usize >= self.ny {
            return;
        }
        for x in self.columns() {
            stat.increment(x, y as usize, grid);
        }
    }

    fn subtract_row(&self, y: i64, grid: &dyn GridData, stat: &mut dyn WindowStatistic) {
        if y < 0 || y as usize >= self.ny {
            return;
        }
        for x in self.columns() {
            stat.decrement(x, y as usize, grid);
        }
    }

    fn add_column(&self, x: i64, grid: &dyn GridData, stat: &mut dyn WindowStatistic) {
        if x < 0 || x as usize >= self.nx {
            return;
        }
        for y in self.rows() {
            stat.increment(x as usize, y, grid);
        }
    }

    fn subtract_column(&self, x: i64, grid: &dyn GridData, stat: &mut dyn WindowStatistic) {
        if x < 0 || x as usize >= self.nx {
            return;
        }
        for y in self.rows() {
            stat.decrement(x as usize, y, grid);
        }
    }
}

/// Inclusive `[lo, hi]` clipped to `[0, n)`
fn clip(lo: i64, hi: i64, n: usize) -> impl Iterator<Item = usize> {
    let start = lo.max(0) as usize;
    let end = if hi < 0 { 0 } else { (hi as usize + 1).min(n) };
    start..end
}

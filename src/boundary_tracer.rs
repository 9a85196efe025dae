//! Turns a sequence of traced vertices into a pixel-connected closed curve
//!
//! Vertices are added one at a time in grid coordinates, possibly off the
//! grid. Each new vertex is joined to the previous one by interpolated cells
//! so that consecutive points never differ by more than one cell in either
//! coordinate. The curve is then rasterized into a local mask covering its
//! bounding box, which [`crate::InteriorClassifier`] scans.

use crate::error::{GridError, Result};
use crate::grid::GridData;

/// Value written into edge grids for boundary cells
pub const EDGE_VALUE: f64 = 1.0;

/// A point of the boundary in grid coordinates, possibly outside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub x: i64,
    pub y: i64,
}

impl BoundaryPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Inclusive bounding rectangle of the explicitly added vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryBox {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl BoundaryBox {
    fn around(p: BoundaryPoint) -> Self {
        Self {
            x0: p.x,
            y0: p.y,
            x1: p.x,
            y1: p.y,
        }
    }

    fn extend(&mut self, p: BoundaryPoint) {
        self.x0 = self.x0.min(p.x);
        self.y0 = self.y0.min(p.y);
        self.x1 = self.x1.max(p.x);
        self.y1 = self.y1.max(p.y);
    }

    /// Number of columns covered
    pub fn width(&self) -> usize {
        (self.x1 - self.x0 + 1) as usize
    }

    /// Number of rows covered
    pub fn height(&self) -> usize {
        (self.y1 - self.y0 + 1) as usize
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Ordered boundary of one closed region
#[derive(Debug, Clone)]
pub struct BoundaryTracer {
    nx: usize,
    ny: usize,
    points: Vec<BoundaryPoint>,
    bounds: Option<BoundaryBox>,
    last: Option<BoundaryPoint>,
    local_edge: Option<Vec<bool>>,
}

impl BoundaryTracer {
    /// Tracer for boundaries that will be written to an `nx` by `ny` grid
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            points: Vec::new(),
            bounds: None,
            last: None,
            local_edge: None,
        }
    }

    /// Tracer sized to match `grid`
    pub fn for_grid(grid: &dyn GridData) -> Self {
        let (nx, ny) = grid.dims();
        Self::new(nx, ny)
    }

    /// Append a vertex, filling any gap from the previous vertex.
    ///
    /// Only the vertex itself extends the bounding box; filled points do not.
    pub fn add(&mut self, x: i64, y: i64) {
        let p = BoundaryPoint::new(x, y);
        match self.bounds.as_mut() {
            Some(bounds) => bounds.extend(p),
            None => self.bounds = Some(BoundaryBox::around(p)),
        }
        if let Some(last) = self.last {
            self.fill_gap(last, p);
        }
        self.points.push(p);
        self.last = Some(p);
        self.local_edge = None;
    }

    /// Push the cells strictly between `from` and `to`, walking from `from`
    fn fill_gap(&mut self, from: BoundaryPoint, to: BoundaryPoint) {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        if dx == 0 || dy.abs() > dx.abs() {
            // more vertical: one point per row
            let step = dy.signum();
            let mut iy = from.y + step;
            while iy != to.y {
                let ix = if dx == 0 {
                    to.x
                } else {
                    let t = (iy - from.y) as f64 / dy as f64;
                    (from.x as f64 + t * dx as f64).round_ties_even() as i64
                };
                log::trace!("Filled gap point {},{}", ix, iy);
                self.points.push(BoundaryPoint::new(ix, iy));
                iy += step;
            }
        } else {
            let step = dx.signum();
            let mut ix = from.x + step;
            while ix != to.x {
                let t = (ix - from.x) as f64 / dx as f64;
                let iy = (from.y as f64 + t * dy as f64).round_ties_even() as i64;
                log::trace!("Filled gap point {},{}", ix, iy);
                self.points.push(BoundaryPoint::new(ix, iy));
                ix += step;
            }
        }
    }

    /// True until the first vertex is added
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in walk order, filled points included
    pub fn points(&self) -> &[BoundaryPoint] {
        &self.points
    }

    /// Bounding box of the added vertices, `None` before the first
    pub fn bounding_box(&self) -> Option<BoundaryBox> {
        self.bounds
    }

    /// Dimensions of the grid this boundary belongs to
    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Join the last vertex back to the first one
    pub fn close(&mut self) {
        if let (Some(first), Some(last)) = (self.points.first().copied(), self.last) {
            if first != last {
                self.add(first.x, first.y);
            }
        }
    }

    /// Dense edge mask over the bounding box, row-major in local
    /// coordinates. Reuses the mask from [`BoundaryTracer::put_to_grid`] when
    /// there is one; empty before the first vertex.
    pub fn local_edge_mask(&self) -> Vec<bool> {
        match &self.local_edge {
            Some(mask) => mask.clone(),
            None => self.rasterize_local(),
        }
    }

    fn rasterize_local(&self) -> Vec<bool> {
        let Some(bounds) = self.bounds else {
            return Vec::new();
        };
        let w = bounds.width();
        let mut mask = vec![false; w * bounds.height()];
        for p in &self.points {
            if bounds.contains(p.x, p.y) {
                let lx = (p.x - bounds.x0) as usize;
                let ly = (p.y - bounds.y0) as usize;
                mask[ly * w + lx] = true;
            }
        }
        mask
    }

    /// Rasterize the boundary.
    ///
    /// Builds the local edge mask and raises every boundary cell that falls
    /// inside `edge` to at least [`EDGE_VALUE`]. Existing higher values are
    /// kept, so several tracers can share one edge grid. An `edge` grid of the
    /// wrong size is an error and nothing is written.
    pub fn put_to_grid(&mut self, edge: &mut dyn GridData) -> Result<()> {
        if edge.dims() != (self.nx, self.ny) {
            log::error!(
                "Dimensions unequal {},{}  {},{}",
                edge.nx(),
                edge.ny(),
                self.nx,
                self.ny
            );
            return Err(GridError::DimensionMismatch {
                expected: (self.nx, self.ny),
                actual: edge.dims(),
            });
        }
        if self.is_empty() {
            return Err(GridError::EmptyBoundary);
        }

        self.local_edge = Some(self.rasterize_local());
        for p in &self.points {
            if !edge.in_range(p.x, p.y) {
                continue;
            }
            let (x, y) = (p.x as usize, p.y as usize);
            match edge.value(x, y) {
                Some(v) if v >= EDGE_VALUE => {}
                _ => edge.set_value(x, y, EDGE_VALUE),
            }
        }
        Ok(())
    }

    /// True if local cell `(x, y)` is not on the boundary. Local coordinates
    /// are relative to the bounding box corner; anything outside the box is
    /// not an edge.
    pub fn not_edge(&self, x: i64, y: i64) -> bool {
        let Some(bounds) = self.bounds else {
            return true;
        };
        if x < 0 || y < 0 || x as usize >= bounds.width() || y as usize >= bounds.height() {
            return true;
        }
        match &self.local_edge {
            Some(mask) => !mask[y as usize * bounds.width() + x as usize],
            None => {
                let (gx, gy) = (x + bounds.x0, y + bounds.y0);
                !self.points.iter().any(|p| p.x == gx && p.y == gy)
            }
        }
    }

    /// Map local cell `(x, y)` to the full grid, `None` if it falls off it
    pub fn data_grid_index(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let bounds = self.bounds?;
        let xi = x + bounds.x0;
        let yi = y + bounds.y0;
        if xi >= 0 && yi >= 0 && (xi as usize) < self.nx && (yi as usize) < self.ny {
            Some((xi as usize, yi as usize))
        } else {
            None
        }
    }
}

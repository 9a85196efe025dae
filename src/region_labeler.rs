//! Companion label grid for one clump labeling pass
//!
//! The labeler does not walk the grid itself. A flood driver (see
//! [`crate::ClumpBuilder`]) asks it whether cells were already seen, marks
//! cells into the current clump, and advances to the next clump id between
//! independent growths.

use arrayvec::ArrayVec;

use crate::grid::{Grid, GridData};

/// Positive clump identifier, strictly increasing within a pass
pub type ClumpId = u32;

/// First id handed out by [`RegionLabeler::init`]
pub const INITIAL_CLUMP_ID: ClumpId = 1;

/// Label encoding used by [`RegionLabeler::to_grid`]
pub const NOT_MARKED_VALUE: f64 = -1.0;
pub const REJECTED_VALUE: f64 = 0.0;

/// State of one cell of the label grid
///
/// Variants are ordered: `Bad < NotMarked < Rejected < Clump(_)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Unusable cell, also written over clumps removed after a pass
    Bad,
    /// Not visited yet this pass
    NotMarked,
    /// Visited, not part of any clump
    Rejected,
    /// Member of the clump with this id
    Clump(ClumpId),
}

impl Label {
    /// The clump id, if the cell belongs to one
    pub fn clump_id(self) -> Option<ClumpId> {
        match self {
            Label::Clump(id) => Some(id),
            _ => None,
        }
    }
}

/// Label grid plus the running id and area counters of one pass
#[derive(Debug, Clone)]
pub struct RegionLabeler {
    nx: usize,
    ny: usize,
    labels: Vec<Label>,
    current_id: ClumpId,
    current_area: usize,
}

impl RegionLabeler {
    /// Create a labeler for an `nx` by `ny` grid, ready for a pass
    pub fn new(nx: usize, ny: usize) -> Self {
        let mut labeler = Self {
            nx,
            ny,
            labels: vec![Label::Bad; nx * ny],
            current_id: INITIAL_CLUMP_ID,
            current_area: 0,
        };
        labeler.init();
        labeler
    }

    /// Reset every cell to `NotMarked`, the id to 1 and the area to 0
    pub fn init(&mut self) {
        self.labels.fill(Label::NotMarked);
        self.current_id = INITIAL_CLUMP_ID;
        self.current_area = 0;
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Id given to points marked now
    pub fn current_id(&self) -> ClumpId {
        self.current_id
    }

    /// Points marked into the current clump so far
    pub fn current_area(&self) -> usize {
        self.current_area
    }

    /// Finish the current clump: the next marks use a fresh id
    pub fn start_next_clump(&mut self) {
        self.current_id += 1;
        self.current_area = 0;
    }

    /// Number of clump ids handed out so far
    pub fn num_clumps(&self) -> usize {
        (self.current_id - INITIAL_CLUMP_ID) as usize
    }

    fn slot(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.nx && y < self.ny {
            Some(y * self.nx + x)
        } else {
            log::error!(
                "label query ({}, {}) outside {}x{} grid",
                x,
                y,
                self.nx,
                self.ny
            );
            None
        }
    }

    /// Label at `(x, y)`; out of range cells read as `Bad`
    pub fn label(&self, x: usize, y: usize) -> Label {
        self.slot(x, y).map_or(Label::Bad, |i| self.labels[i])
    }

    /// Label at a flattened index; out of range reads as `Bad`
    pub fn label_at_index(&self, index: usize) -> Label {
        self.labels.get(index).copied().unwrap_or(Label::Bad)
    }

    /// True once the cell was either rejected or taken into a clump
    pub fn point_processed(&self, x: usize, y: usize) -> bool {
        self.label(x, y) > Label::NotMarked
    }

    /// Put the cell into the current clump.
    ///
    /// Returns true if the cell was newly marked, false if it already held
    /// the current id. Flood drivers rely on this to count each point once.
    pub fn mark_point(&mut self, x: usize, y: usize) -> bool {
        let Some(i) = self.slot(x, y) else {
            return false;
        };
        let label = Label::Clump(self.current_id);
        if self.labels[i] == label {
            return false;
        }
        self.labels[i] = label;
        self.current_area += 1;
        true
    }

    /// Record that the cell was visited and rejected
    pub fn mark_point_not_wanted(&mut self, x: usize, y: usize) {
        if let Some(i) = self.slot(x, y) {
            self.labels[i] = Label::Rejected;
        }
    }

    /// Overwrite the label at a flattened index
    pub fn set_label_at_index(&mut self, index: usize, label: Label) {
        match self.labels.get_mut(index) {
            Some(cell) => *cell = label,
            None => log::error!("label index {} out of range [0,{})", index, self.labels.len()),
        }
    }

    /// True if the cell belongs to a clump
    pub fn is_in_a_clump(&self, x: usize, y: usize) -> bool {
        self.label(x, y) > Label::Rejected
    }

    /// Export the labels as a numeric grid: clump cells hold their id,
    /// rejected cells 0, unvisited cells -1 and bad cells `missing`.
    pub fn to_grid(&self, missing: f64) -> Grid {
        let mut grid = Grid::new(self.nx, self.ny, missing);
        for (i, label) in self.labels.iter().enumerate() {
            let value = match label {
                Label::Bad => missing,
                Label::NotMarked => NOT_MARKED_VALUE,
                Label::Rejected => REJECTED_VALUE,
                Label::Clump(id) => *id as f64,
            };
            grid.set_value_at_index(i, value);
        }
        grid
    }
}

/// In-range 8-connected neighbours of `(x, y)` on an `nx` by `ny` grid
pub fn neighbors_8(x: usize, y: usize, nx: usize, ny: usize) -> ArrayVec<(usize, usize), 8> {
    let mut out = ArrayVec::new();
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let px = x as i64 + dx;
            let py = y as i64 + dy;
            if px >= 0 && py >= 0 && (px as usize) < nx && (py as usize) < ny {
                out.push((px as usize, py as usize));
            }
        }
    }
    out
}

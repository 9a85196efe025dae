//! One complete clumping pass over a data grid
//!
//! The pass runs in two stages. First every acceptable cell is grown into a
//! clump with an iterative 8-connected flood, labeling into a
//! [`RegionLabeler`] and collecting a [`ClumpRecord`] per id. Then every pair
//! of touching ids is reconciled through a [`ClumpMerger`] and merged clumps
//! below the minimum size are flagged so callers can remove or rescale them.

use serde::{Deserialize, Serialize};

use crate::clump_merger::ClumpMerger;
use crate::clump_record::ClumpRecord;
use crate::error::{GridError, Result};
use crate::fuzzy::FuzzyFunction;
use crate::grid::{Grid, GridData};
use crate::region_labeler::{neighbors_8, ClumpId, Label, RegionLabeler};

/// Parameters of a clumping pass
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClumpConfig {
    /// Cells must hold at least this value to join a clump. `None` accepts
    /// every non-missing cell.
    pub threshold: Option<f64>,
    /// Cap on points added by a single growth. `None` means no cap.
    pub max_clump_points: Option<usize>,
    /// Merged clumps with fewer points are flagged for removal
    pub min_clump_points: usize,
}

/// Labels clumps in a grid and keeps the merged result
#[derive(Debug, Clone)]
pub struct ClumpBuilder {
    config: ClumpConfig,
    labeler: RegionLabeler,
    clumps: Vec<ClumpRecord>,
    flagged: Vec<usize>,
}

impl ClumpBuilder {
    pub fn new(nx: usize, ny: usize, config: ClumpConfig) -> Self {
        Self {
            config,
            labeler: RegionLabeler::new(nx, ny),
            clumps: Vec::new(),
            flagged: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClumpConfig {
        &self.config
    }

    /// Run a full pass over `data`, replacing any previous result.
    ///
    /// Returns the number of clumps left after merging. Fails without
    /// touching the previous result if `data` has the wrong dimensions.
    ///
    /// # Example
    ///
    /// ```
    /// use geo_grid_regions::{ClumpBuilder, ClumpConfig, Grid};
    ///
    /// let values = vec![
    ///     1.0, 0.0, 0.0, 1.0,
    ///     1.0, 0.0, 0.0, 1.0,
    /// ];
    /// let grid = Grid::from_values(4, 2, values, -1.0).unwrap();
    /// let config = ClumpConfig { threshold: Some(0.5), ..ClumpConfig::default() };
    /// let mut builder = ClumpBuilder::new(4, 2, config);
    /// assert_eq!(builder.build(&grid).unwrap(), 2);
    /// ```
    pub fn build(&mut self, data: &dyn GridData) -> Result<usize> {
        if data.dims() != self.labeler.dims() {
            log::error!(
                "Dimensions unequal {:?} {:?}",
                data.dims(),
                self.labeler.dims()
            );
            return Err(GridError::DimensionMismatch {
                expected: self.labeler.dims(),
                actual: data.dims(),
            });
        }

        self.labeler.init();
        self.clumps.clear();
        self.flagged.clear();

        let raw = self.label_all(data);
        self.merge_adjacent(raw);
        log::debug!(
            "{} clumps after merging, {} flagged below {} points",
            self.clumps.len(),
            self.flagged.len(),
            self.config.min_clump_points
        );
        Ok(self.clumps.len())
    }

    fn accepts(&self, data: &dyn GridData, x: usize, y: usize) -> Option<f64> {
        let value = data.value(x, y)?;
        match self.config.threshold {
            Some(threshold) if value < threshold => None,
            _ => Some(value),
        }
    }

    /// First stage: one record per id, in id order
    fn label_all(&mut self, data: &dyn GridData) -> Vec<ClumpRecord> {
        let (nx, ny) = self.labeler.dims();
        let mut raw = Vec::new();
        for y in 0..ny {
            for x in 0..nx {
                if self.labeler.point_processed(x, y) {
                    continue;
                }
                if self.accepts(data, x, y).is_none() {
                    self.labeler.mark_point_not_wanted(x, y);
                    continue;
                }
                raw.push(self.grow(data, x, y));
                self.labeler.start_next_clump();
            }
        }
        raw
    }

    fn grow(&mut self, data: &dyn GridData, x0: usize, y0: usize) -> ClumpRecord {
        let (nx, ny) = self.labeler.dims();
        let mut clump = ClumpRecord::new(self.labeler.current_id());
        let mut stack = vec![(x0, y0)];
        let mut capped = false;

        while let Some((x, y)) = stack.pop() {
            if self.labeler.point_processed(x, y) {
                continue;
            }
            if self
                .config
                .max_clump_points
                .is_some_and(|max| self.labeler.current_area() >= max)
            {
                capped = true;
                continue;
            }
            let Some(value) = self.accepts(data, x, y) else {
                self.labeler.mark_point_not_wanted(x, y);
                continue;
            };
            if self.labeler.mark_point(x, y) {
                clump.add_point(y * nx + x, value);
            }
            for (px, py) in neighbors_8(x, y, nx, ny) {
                if !self.labeler.point_processed(px, py) {
                    stack.push((px, py));
                }
            }
        }

        if capped {
            log::debug!(
                "clump {} stopped growing at {} points",
                clump.id(),
                clump.npt()
            );
        }
        clump
    }

    /// Second stage: reconcile touching ids into merged clumps
    fn merge_adjacent(&mut self, raw: Vec<ClumpRecord>) {
        let (nx, ny) = self.labeler.dims();
        // id 0 is never handed out and stays a singleton
        let mut merger = ClumpMerger::new(raw.len() + 1);
        for y in 0..ny {
            for x in 0..nx {
                let Some(a) = self.labeler.label(x, y).clump_id() else {
                    continue;
                };
                for (px, py) in neighbors_8(x, y, nx, ny) {
                    if let Some(b) = self.labeler.label(px, py).clump_id() {
                        if a < b {
                            merger.update(a as usize, b as usize);
                        }
                    }
                }
            }
        }
        merger.merge();

        for group in merger.groups() {
            if group.as_slice() == [0] {
                continue;
            }
            let id = group[0] as ClumpId;
            let mut merged = ClumpRecord::new(id);
            for &member in group {
                let Some(record) = raw.get(member - 1) else {
                    log::error!("merged id {} has no clump record", member);
                    continue;
                };
                merged.merge_points(record);
                if member != group[0] {
                    for &index in record.indices() {
                        self.labeler.set_label_at_index(index, Label::Clump(id));
                    }
                }
            }

            if merged.npt() < self.config.min_clump_points {
                log::debug!(
                    "clump {} after merge too small {} points",
                    id,
                    merged.npt()
                );
                self.flagged.push(self.clumps.len());
            }
            self.clumps.push(merged);
        }
    }

    /// Merged clumps from the last [`ClumpBuilder::build`]
    pub fn clumps(&self) -> &[ClumpRecord] {
        &self.clumps
    }

    pub fn num_clumps(&self) -> usize {
        self.clumps.len()
    }

    /// Clumps below the minimum size
    pub fn flagged(&self) -> impl Iterator<Item = &ClumpRecord> {
        self.flagged.iter().map(move |&i| &self.clumps[i])
    }

    pub fn labeler(&self) -> &RegionLabeler {
        &self.labeler
    }

    /// The label grid as numbers: clump ids, 0 for rejected cells, `missing`
    /// for removed cells
    pub fn clump_grid(&self, missing: f64) -> Grid {
        self.labeler.to_grid(missing)
    }

    /// Write the missing sentinel of `grid` over every flagged clump, and mark
    /// those cells bad in the label grid.
    pub fn remove_small<G: GridData + ?Sized>(&mut self, grid: &mut G) {
        let missing = grid.missing();
        for &i in &self.flagged {
            let clump = &self.clumps[i];
            clump.write_clump_to_grid_with_value(grid, missing);
            for &index in clump.indices() {
                self.labeler.set_label_at_index(index, Label::Bad);
            }
        }
    }

    /// Fill `scale` with 1.0, then give every flagged clump the scale
    /// `f(min value)` when that differs from 1.0
    pub fn rescale<G: GridData + ?Sized>(&self, f: &FuzzyFunction, scale: &mut G) -> Result<()> {
        if scale.dims() != self.labeler.dims() {
            log::error!(
                "Scale grid dimensions {:?} do not match {:?}",
                scale.dims(),
                self.labeler.dims()
            );
            return Err(GridError::DimensionMismatch {
                expected: self.labeler.dims(),
                actual: scale.dims(),
            });
        }

        scale.fill(1.0);
        for clump in self.flagged() {
            let Some(factor) = clump.min_clump_data_value().and_then(|min| f.apply(min)) else {
                continue;
            };
            if factor != 1.0 {
                clump.write_clump_to_grid_with_value(scale, factor);
            }
        }
        Ok(())
    }
}

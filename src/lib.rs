//! # geo-grid-regions
//!
//! Spatial analysis primitives for regular 2D meteorological grids: sliding
//! window statistics, connected region ("clump") labeling and polygon masks.
//!
//! All algorithms read and write caller-owned grids through the [`GridData`]
//! trait. [`Grid`] is a flat row-major implementation for callers without
//! storage of their own.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`WindowTraverse`] | Serpentine walk where every step moves one cell |
//! | [`WindowMean`] | Running window mean updated by add/remove |
//! | [`RegionLabeler`] | Label grid driven by a flood fill |
//! | [`ClumpRecord`] | Members and minimum value of one clump |
//! | [`ClumpMerger`] | Joins clump ids found to touch |
//! | [`BoundaryTracer`] | Gap-filled closed curve and its edge mask |
//! | [`InteriorClassifier`] | Scanline inside/outside classification |
//! | [`PolygonMask`] | Polygons burned into a mask on a projection |
//!
//! ## Examples
//!
//! ### Smoothing
//!
//! ```rust
//! use geo_grid_regions::{fast_smooth, Grid, GridData, SmoothConfig};
//!
//! let values = vec![0.0, 0.0, 0.0, 0.0, 9.0, 0.0, 0.0, 0.0, 0.0];
//! let mut grid = Grid::from_values(3, 3, values, -1.0).unwrap();
//!
//! // 3x3 box mean, windows clipped at the grid border
//! fast_smooth(&mut grid, &SmoothConfig::default());
//! assert_eq!(grid.value(1, 1), Some(1.0));
//! assert_eq!(grid.value(0, 0), Some(2.25));
//! ```
//!
//! ### Clumping
//!
//! ```rust
//! use geo_grid_regions::{ClumpBuilder, ClumpConfig, Grid};
//!
//! let values = vec![
//!     5.0, 5.0, 0.0, 0.0,
//!     0.0, 0.0, 0.0, 7.0,
//! ];
//! let mut data = Grid::from_values(4, 2, values, -1.0).unwrap();
//!
//! let config = ClumpConfig {
//!     threshold: Some(1.0),
//!     min_clump_points: 2,
//!     ..ClumpConfig::default()
//! };
//! let mut clumps = ClumpBuilder::new(4, 2, config);
//! assert_eq!(clumps.build(&data).unwrap(), 2);
//!
//! // the single-cell clump is too small and gets removed
//! clumps.remove_small(&mut data);
//! assert_eq!(data.values()[7], -1.0);
//! ```
//!
//! ### Polygon masks
//!
//! ```rust
//! use geo_grid_regions::{LatLonProjection, PolygonMask};
//!
//! let proj = LatLonProjection::new(10, 10, 30.0, -100.0, 1.0, 1.0);
//! let mut mask = PolygonMask::new();
//! mask.add_polygon(vec![(32.0, -98.0), (32.0, -95.0), (35.0, -95.0), (35.0, -98.0)]);
//! mask.create_mask(&proj, 2, 2).unwrap();
//!
//! assert!(mask.is_inside(3, 3));
//! assert!(!mask.is_inside(0, 0));
//! ```
//!
//! ## Errors and logging
//!
//! Dimension mismatches and unusable inputs return [`GridError`]. Out of
//! range lookups are logged through the [`log`] facade and answered with a
//! safe default. The crate never installs a logger.

mod boundary_tracer;
mod clump_builder;
mod clump_merger;
mod clump_record;
mod error;
mod fuzzy;
mod grid;
mod interior_classifier;
mod polygon_mask;
mod projection;
mod rasterize;
mod region_labeler;
mod smooth;
mod window_stats;
mod window_traverse;

pub use boundary_tracer::{BoundaryBox, BoundaryPoint, BoundaryTracer, EDGE_VALUE};
pub use clump_builder::{ClumpBuilder, ClumpConfig};
pub use clump_merger::ClumpMerger;
pub use clump_record::ClumpRecord;
pub use error::{GridError, Result};
pub use fuzzy::FuzzyFunction;
pub use grid::{Grid, GridData};
pub use interior_classifier::{Classification, InteriorClassifier};
pub use polygon_mask::PolygonMask;
pub use projection::{LatLonProjection, Projection};
pub use rasterize::{
    polygon_to_grid, polygons_to_grid, PolygonRasterizer, TracingRasterizer, MASK_MISSING,
    MASK_VALUE,
};
pub use region_labeler::{
    neighbors_8, ClumpId, Label, RegionLabeler, INITIAL_CLUMP_ID, NOT_MARKED_VALUE, REJECTED_VALUE,
};
pub use smooth::{fast_smooth, smooth, SmoothConfig};
pub use window_stats::{truncate_mean, ExcludePolicy, WindowMean, WindowOutcome, WindowStatistic};
pub use window_traverse::{TraverseState, WindowTraverse};

//! Burning geographic polygons into grids
//!
//! A polygon is traced with a [`BoundaryTracer`], its edge cells are written
//! to an edge grid, and every cell the [`InteriorClassifier`] finds inside
//! gets the requested value in the output grid.

use crate::boundary_tracer::BoundaryTracer;
use crate::error::{GridError, Result};
use crate::grid::GridData;
use crate::interior_classifier::InteriorClassifier;
use crate::projection::Projection;

/// Value of mask cells inside a polygon
pub const MASK_VALUE: f64 = 1.0;

/// Missing sentinel of mask and edge grids
pub const MASK_MISSING: f64 = -1.0;

/// Rasterize one polygon given as `(lat, lon)` vertices. The ring is closed
/// if the last vertex does not repeat the first.
///
/// `grid` receives `value` at every inside cell, `edge` is raised to
/// [`crate::EDGE_VALUE`] along the traced boundary. Both grids must match the
/// projection's dimensions.
pub fn polygon_to_grid(
    proj: &dyn Projection,
    latlon: &[(f64, f64)],
    value: f64,
    grid: &mut dyn GridData,
    edge: &mut dyn GridData,
) -> Result<()> {
    let dims = (proj.nx(), proj.ny());
    if grid.dims() != dims {
        log::error!("Dimensions unequal {:?} {:?}", grid.dims(), dims);
        return Err(GridError::DimensionMismatch {
            expected: dims,
            actual: grid.dims(),
        });
    }
    if !edge.size_equal(grid) {
        log::error!("Dimensions unequal {:?} {:?}", edge.dims(), dims);
        return Err(GridError::DimensionMismatch {
            expected: dims,
            actual: edge.dims(),
        });
    }

    let mut tracer = BoundaryTracer::for_grid(grid);
    for &(lat, lon) in latlon {
        let (x, y) = proj.latlon_to_grid_index_any(lat, lon);
        log::trace!("Adding lat/lon {}, {} at {},{}", lat, lon, x, y);
        tracer.add(x, y);
    }
    if tracer.is_empty() {
        log::error!("constructing the edges");
        return Err(GridError::EmptyBoundary);
    }
    tracer.close();
    tracer.put_to_grid(edge)?;

    let inside = InteriorClassifier::new(&tracer)?;
    for y in 0..inside.ny() as i64 {
        for x in 0..inside.nx() as i64 {
            if !inside.is_inside(x, y) {
                continue;
            }
            if let Some((xi, yi)) = tracer.data_grid_index(x, y) {
                grid.set_value(xi, yi, value);
            }
        }
    }
    Ok(())
}

/// Rasterize every polygon, returning how many succeeded.
///
/// Failures of single polygons are logged and skipped; it is an error only if
/// none succeeded.
pub fn polygons_to_grid(
    proj: &dyn Projection,
    polygons: &[Vec<(f64, f64)>],
    value: f64,
    grid: &mut dyn GridData,
    edge: &mut dyn GridData,
) -> Result<usize> {
    let mut count = 0;
    for (i, polygon) in polygons.iter().enumerate() {
        match polygon_to_grid(proj, polygon, value, grid, edge) {
            Ok(()) => count += 1,
            Err(e) => log::error!("polygon {} not rasterized: {}", i, e),
        }
    }
    if count == 0 {
        return Err(GridError::NoPolygons);
    }
    Ok(count)
}

/// Anything that can burn a set of polygons into a mask and an edge grid
pub trait PolygonRasterizer {
    fn rasterize(
        &self,
        proj: &dyn Projection,
        polygons: &[Vec<(f64, f64)>],
        value: f64,
        grid: &mut dyn GridData,
        edge: &mut dyn GridData,
    ) -> Result<usize>;
}

/// Default rasterizer built on boundary tracing and scanline classification
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRasterizer;

impl PolygonRasterizer for TracingRasterizer {
    fn rasterize(
        &self,
        proj: &dyn Projection,
        polygons: &[Vec<(f64, f64)>],
        value: f64,
        grid: &mut dyn GridData,
        edge: &mut dyn GridData,
    ) -> Result<usize> {
        polygons_to_grid(proj, polygons, value, grid, edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::projection::LatLonProjection;

    fn unit_proj() -> LatLonProjection {
        LatLonProjection::new(6, 6, 0.0, 0.0, 1.0, 1.0)
    }

    fn grids() -> (Grid, Grid) {
        (Grid::new(6, 6, MASK_MISSING), Grid::new(6, 6, MASK_MISSING))
    }

    #[test]
    fn test_square_polygon() {
        let (mut mask, mut edge) = grids();
        let square = [(1.0, 1.0), (1.0, 4.0), (4.0, 4.0), (4.0, 1.0)];
        polygon_to_grid(&unit_proj(), &square, MASK_VALUE, &mut mask, &mut edge).unwrap();

        let inside = mask.values().iter().filter(|v| **v == MASK_VALUE).count();
        assert_eq!(inside, 16);
        assert_eq!(mask.value(2, 2), Some(MASK_VALUE));
        assert_eq!(mask.value(0, 0), None);
        assert_eq!(edge.value(1, 1), Some(1.0));
        assert_eq!(edge.value(2, 2), None);
    }

    #[test]
    fn test_polygon_past_grid_edge() {
        let (mut mask, mut edge) = grids();
        let square = [(-2.0, -2.0), (-2.0, 2.0), (2.0, 2.0), (2.0, -2.0)];
        polygon_to_grid(&unit_proj(), &square, 7.0, &mut mask, &mut edge).unwrap();
        assert_eq!(mask.value(0, 0), Some(7.0));
        assert_eq!(mask.value(2, 2), Some(7.0));
        assert_eq!(mask.value(3, 0), None);
    }

    #[test]
    fn test_empty_polygon_fails() {
        let (mut mask, mut edge) = grids();
        assert!(polygon_to_grid(&unit_proj(), &[], 1.0, &mut mask, &mut edge).is_err());
        assert!(matches!(
            polygons_to_grid(&unit_proj(), &[Vec::new()], 1.0, &mut mask, &mut edge),
            Err(GridError::NoPolygons)
        ));
    }

    #[test]
    fn test_any_success_is_enough() {
        let (mut mask, mut edge) = grids();
        let polygons = vec![Vec::new(), vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]];
        assert_eq!(
            TracingRasterizer
                .rasterize(&unit_proj(), &polygons, 1.0, &mut mask, &mut edge)
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_wrong_grid_size() {
        let mut mask = Grid::new(3, 3, MASK_MISSING);
        let mut edge = Grid::new(6, 6, MASK_MISSING);
        let square = [(1.0, 1.0), (1.0, 2.0), (2.0, 2.0)];
        assert!(matches!(
            polygon_to_grid(&unit_proj(), &square, 1.0, &mut mask, &mut edge),
            Err(GridError::DimensionMismatch { .. })
        ));
    }
}

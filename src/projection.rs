//! Mapping between geographic coordinates and grid cells
//!
//! Map projection math lives with the caller. Polygon masks only need the
//! conversions in [`Projection`]; [`LatLonProjection`] covers the common
//! regular latitude/longitude grid.

use serde::{Deserialize, Serialize};

/// Conversions between `(lat, lon)` and grid coordinates
pub trait Projection {
    fn nx(&self) -> usize;

    fn ny(&self) -> usize;

    /// Fractional grid coordinates `(x, y)` of a location, possibly off the grid
    fn latlon_to_grid_xy(&self, lat: f64, lon: f64) -> (f64, f64);

    /// `(lat, lon)` of the center of cell `(x, y)`
    fn grid_index_to_latlon(&self, x: i64, y: i64) -> (f64, f64);

    /// The same projection grown by `mx` cells on the left and right and `my`
    /// cells on the bottom and top
    fn expanded(&self, mx: usize, my: usize) -> Self
    where
        Self: Sized;

    /// Nearest cell to a location, even if it falls off the grid
    fn latlon_to_grid_index_any(&self, lat: f64, lon: f64) -> (i64, i64) {
        let (x, y) = self.latlon_to_grid_xy(lat, lon);
        (x.round() as i64, y.round() as i64)
    }

    /// Nearest cell to a location, `None` if it is off the grid
    fn latlon_to_grid_index(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        let (x, y) = self.latlon_to_grid_index_any(lat, lon);
        if x >= 0 && y >= 0 && (x as usize) < self.nx() && (y as usize) < self.ny() {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }
}

/// Regular grid in latitude and longitude. Cell `(0, 0)` is centered on
/// `(min_lat, min_lon)`; x grows with longitude and y with latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonProjection {
    pub nx: usize,
    pub ny: usize,
    pub min_lat: f64,
    pub min_lon: f64,
    /// Latitude spacing in degrees
    pub dlat: f64,
    /// Longitude spacing in degrees
    pub dlon: f64,
}

impl LatLonProjection {
    pub fn new(nx: usize, ny: usize, min_lat: f64, min_lon: f64, dlat: f64, dlon: f64) -> Self {
        Self {
            nx,
            ny,
            min_lat,
            min_lon,
            dlat,
            dlon,
        }
    }
}

impl Projection for LatLonProjection {
    fn nx(&self) -> usize {
        self.nx
    }

    fn ny(&self) -> usize {
        self.ny
    }

    fn latlon_to_grid_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        ((lon - self.min_lon) / self.dlon, (lat - self.min_lat) / self.dlat)
    }

    fn grid_index_to_latlon(&self, x: i64, y: i64) -> (f64, f64) {
        (
            self.min_lat + y as f64 * self.dlat,
            self.min_lon + x as f64 * self.dlon,
        )
    }

    fn expanded(&self, mx: usize, my: usize) -> Self {
        Self {
            nx: self.nx + 2 * mx,
            ny: self.ny + 2 * my,
            min_lat: self.min_lat - my as f64 * self.dlat,
            min_lon: self.min_lon - mx as f64 * self.dlon,
            ..*self
        }
    }
}

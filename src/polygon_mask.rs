//! Persistent "inside any of these polygons" mask over a projection
//!
//! Polygons are collected first, from code, from `lat,lon` text files or
//! from GeoJSON. [`PolygonMask::create_mask`] then burns them all into a mask
//! grid and an edge grid, optionally on a projection expanded by a margin so
//! polygons that reach past the analysis domain are still traced whole.

use std::fs;
use std::path::Path;

use geojson::{GeoJson, Geometry, Position, Value as GeoValue};

use crate::error::{GridError, Result};
use crate::grid::{Grid, GridData};
use crate::projection::Projection;
use crate::rasterize::{PolygonRasterizer, TracingRasterizer, MASK_MISSING, MASK_VALUE};

#[derive(Debug, Clone)]
struct BuiltMask<P> {
    proj: P,
    margin: (usize, usize),
    mask: Grid,
    edges: Grid,
}

/// Collection of polygons and the mask built from them
#[derive(Debug, Clone)]
pub struct PolygonMask<P, R = TracingRasterizer> {
    polygons: Vec<Vec<(f64, f64)>>,
    rasterizer: R,
    built: Option<BuiltMask<P>>,
}

impl<P: Projection> PolygonMask<P> {
    pub fn new() -> Self {
        Self::with_rasterizer(TracingRasterizer)
    }
}

impl<P: Projection> Default for PolygonMask<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Projection, R: PolygonRasterizer> PolygonMask<P, R> {
    pub fn with_rasterizer(rasterizer: R) -> Self {
        Self {
            polygons: Vec::new(),
            rasterizer,
            built: None,
        }
    }

    /// Add one polygon as `(lat, lon)` vertices
    pub fn add_polygon(&mut self, latlon: Vec<(f64, f64)>) {
        self.polygons.push(latlon);
    }

    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    pub fn polygons(&self) -> &[Vec<(f64, f64)>] {
        &self.polygons
    }

    /// Add the exterior ring of every polygon in a GeoJSON geometry.
    ///
    /// Accepts `Polygon`, `MultiPolygon` and collections of them. Positions
    /// are `[lon, lat]` as GeoJSON requires. Returns the number of polygons
    /// added.
    pub fn add_geojson(&mut self, geometry: &Geometry) -> Result<usize> {
        match &geometry.value {
            GeoValue::Polygon(rings) => Ok(self.add_exterior(rings)),
            GeoValue::MultiPolygon(polygons) => {
                Ok(polygons.iter().map(|rings| self.add_exterior(rings)).sum())
            }
            GeoValue::GeometryCollection(geometries) => {
                let mut added = 0;
                for g in geometries {
                    added += self.add_geojson(g)?;
                }
                Ok(added)
            }
            other => {
                let name = geometry_name(other);
                log::error!("cannot mask with a {} geometry", name);
                Err(GridError::UnsupportedGeometry(name.to_string()))
            }
        }
    }

    fn add_exterior(&mut self, rings: &[Vec<Position>]) -> usize {
        let Some(exterior) = rings.first() else {
            return 0;
        };
        let latlon = exterior
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| (position[1], position[0]))
            .collect();
        self.polygons.push(latlon);
        1
    }

    /// Read every polygon from a GeoJSON document: a bare geometry, a feature
    /// or a feature collection. Features without geometry are skipped.
    pub fn read_geojson_file<Q: AsRef<Path>>(&mut self, path: Q) -> Result<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            log::error!("Opening {}", path.display());
            GridError::PolygonFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let geometries: Vec<Geometry> = match GeoJson::from_json_value(value)? {
            GeoJson::Geometry(g) => vec![g],
            GeoJson::Feature(f) => f.geometry.into_iter().collect(),
            GeoJson::FeatureCollection(fc) => {
                fc.features.into_iter().filter_map(|f| f.geometry).collect()
            }
        };
        let mut added = 0;
        for g in &geometries {
            added += self.add_geojson(g)?;
        }
        Ok(added)
    }

    /// Read one polygon from a text file of `lat,lon` pairs.
    ///
    /// Pairs are separated by whitespace, which may also follow the comma.
    /// Reading stops at the first text that is not a pair. A file without any
    /// pair is an error and adds nothing.
    pub fn read_polygon_file<Q: AsRef<Path>>(&mut self, path: Q) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            log::error!("Opening {}", path.display());
            GridError::PolygonFile {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let latlon = scan_pairs(&text);
        if latlon.is_empty() {
            log::error!("Scanning pairs from {}", path.display());
            return Err(GridError::PolygonParse {
                path: path.to_path_buf(),
            });
        }
        self.polygons.push(latlon);
        Ok(())
    }

    /// Burn every polygon into a new mask on `proj` grown by `margin_x` and
    /// `margin_y` cells on each side. Returns the number of polygons that
    /// were rasterized. On failure any previous mask is dropped.
    pub fn create_mask(&mut self, proj: &P, margin_x: usize, margin_y: usize) -> Result<usize> {
        self.built = None;
        let proj = proj.expanded(margin_x, margin_y);
        let mut mask = Grid::new(proj.nx(), proj.ny(), MASK_MISSING);
        let mut edges = Grid::new(proj.nx(), proj.ny(), MASK_MISSING);

        let count = self
            .rasterizer
            .rasterize(&proj, &self.polygons, MASK_VALUE, &mut mask, &mut edges)?;
        log::debug!(
            "{} of {} polygons rasterized onto {}x{} mask",
            count,
            self.polygons.len(),
            proj.nx(),
            proj.ny()
        );
        self.built = Some(BuiltMask {
            proj,
            margin: (margin_x, margin_y),
            mask,
            edges,
        });
        Ok(count)
    }

    /// True once [`PolygonMask::create_mask`] succeeded
    pub fn is_mask_set(&self) -> bool {
        self.built.is_some()
    }

    /// True if cell `(x, y)` of the unexpanded projection is inside any
    /// polygon. False before a mask is built and for cells off the mask.
    pub fn is_inside(&self, x: i64, y: i64) -> bool {
        let Some(built) = &self.built else {
            return false;
        };
        let ix = x + built.margin.0 as i64;
        let iy = y + built.margin.1 as i64;
        if !built.mask.in_range(ix, iy) {
            return false;
        }
        built.mask.is_equal_at(ix as usize, iy as usize, MASK_VALUE)
    }

    /// The mask grid on the expanded projection
    pub fn mask(&self) -> Option<&Grid> {
        self.built.as_ref().map(|b| &b.mask)
    }

    /// The edge grid on the expanded projection
    pub fn edges(&self) -> Option<&Grid> {
        self.built.as_ref().map(|b| &b.edges)
    }

    /// The expanded projection the mask was built on
    pub fn projection(&self) -> Option<&P> {
        self.built.as_ref().map(|b| &b.proj)
    }

    /// The mask sampled at every cell center of another projection
    pub fn resample_to<Q: Projection + ?Sized>(&self, proj: &Q) -> Option<Grid> {
        let built = self.built.as_ref()?;
        let mut out = Grid::new(proj.nx(), proj.ny(), MASK_MISSING);
        for y in 0..proj.ny() {
            for x in 0..proj.nx() {
                let (lat, lon) = proj.grid_index_to_latlon(x as i64, y as i64);
                let value = built
                    .proj
                    .latlon_to_grid_index(lat, lon)
                    .and_then(|(ix, iy)| built.mask.value(ix, iy));
                if let Some(v) = value {
                    out.set_value(x, y, v);
                }
            }
        }
        Some(out)
    }
}

impl<P: Projection + PartialEq, R: PolygonRasterizer> PolygonMask<P, R> {
    /// True if `proj` is the projection the mask was built for
    pub fn is_consistent(&self, proj: &P) -> bool {
        let Some(built) = &self.built else {
            return false;
        };
        let good = proj.expanded(built.margin.0, built.margin.1) == built.proj;
        if !good {
            log::error!("Projection in use for test not correct");
        }
        good
    }
}

fn geometry_name(value: &GeoValue) -> &'static str {
    match value {
        GeoValue::Point(_) => "Point",
        GeoValue::MultiPoint(_) => "MultiPoint",
        GeoValue::LineString(_) => "LineString",
        GeoValue::MultiLineString(_) => "MultiLineString",
        GeoValue::Polygon(_) => "Polygon",
        GeoValue::MultiPolygon(_) => "MultiPolygon",
        GeoValue::GeometryCollection(_) => "GeometryCollection",
    }
}

fn scan_pairs(text: &str) -> Vec<(f64, f64)> {
    let mut pairs = Vec::new();
    let mut rest = text;
    while let Some((pair, tail)) = scan_pair(rest) {
        pairs.push(pair);
        rest = tail;
    }
    pairs
}

/// Whitespace may precede either number but not the comma
fn scan_pair(text: &str) -> Option<((f64, f64), &str)> {
    let (lat, rest) = scan_number(text)?;
    let rest = rest.strip_prefix(',')?;
    let (lon, rest) = scan_number(rest)?;
    Some(((lat, lon), rest))
}

fn scan_number(text: &str) -> Option<(f64, &str)> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| c.is_whitespace() || c == ',')
        .unwrap_or(text.len());
    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

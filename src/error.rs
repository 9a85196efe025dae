//! Error type shared by the grid algorithms.
//!
//! Only configuration and input problems are errors. Out-of-range lookups are
//! logged and answered with a default, and "not enough data" outcomes are
//! ordinary return values.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running a grid pass.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Grid dimensions unequal: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Boundary has no points")]
    EmptyBoundary,

    #[error("No polygon produced any mask points")]
    NoPolygons,

    #[error("Failed to read polygon file '{path}': {source}")]
    PolygonFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No lat,lon pairs could be parsed from '{path}'")]
    PolygonParse { path: PathBuf },

    #[error("Unsupported geometry for a polygon mask: {0}")]
    UnsupportedGeometry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;

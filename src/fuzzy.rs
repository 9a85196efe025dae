use serde::{Deserialize, Serialize};

/// Piecewise linear mapping through a sorted list of `(x, y)` points.
///
/// Inputs below the first x map to the first y, inputs above the last x map
/// to the last y.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuzzyFunction {
    points: Vec<(f64, f64)>,
}

impl FuzzyFunction {
    /// Build from `(x, y)` pairs in any order
    pub fn new(mut points: Vec<(f64, f64)>) -> Self {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Evaluate at `v`; `None` when the mapping has no points
    pub fn apply(&self, v: f64) -> Option<f64> {
        let (first, last) = (self.points.first()?, self.points.last()?);
        if v <= first.0 {
            return Some(first.1);
        }
        if v >= last.0 {
            return Some(last.1);
        }
        self.points
            .windows(2)
            .find(|pair| v >= pair[0].0 && v <= pair[1].0)
            .map(|pair| interpolate(v, pair[0], pair[1]))
            .or(Some(last.1))
    }
}

fn interpolate(v: f64, (x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (v - x0) * (y1 - y0) / (x1 - x0)
}

use crate::grid::GridData;
use crate::region_labeler::ClumpId;

/// Members of one clump as flattened grid indices, in insertion order, plus
/// the smallest data value seen among them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClumpRecord {
    id: ClumpId,
    indices: Vec<usize>,
    min_value: Option<f64>,
}

impl ClumpRecord {
    pub fn new(id: ClumpId) -> Self {
        Self {
            id,
            indices: Vec::new(),
            min_value: None,
        }
    }

    pub fn id(&self) -> ClumpId {
        self.id
    }

    /// Number of member points
    pub fn npt(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Smallest data value added, `None` for an empty clump
    pub fn min_clump_data_value(&self) -> Option<f64> {
        self.min_value
    }

    /// Append a point and fold its value into the running minimum
    pub fn add_point(&mut self, index: usize, value: f64) {
        self.min_value = Some(match self.min_value {
            Some(min) if min <= value => min,
            _ => value,
        });
        self.indices.push(index);
    }

    /// Append every point of `other`, keeping the lesser minimum
    pub fn merge_points(&mut self, other: &ClumpRecord) {
        self.min_value = match (self.min_value, other.min_value) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.indices.extend_from_slice(&other.indices);
    }

    /// The `i`th member index.
    ///
    /// Out of range requests are logged and answered with index 0 so one bad
    /// lookup never aborts a grid-wide pass.
    pub fn ith_grid_index(&self, i: usize) -> usize {
        match self.indices.get(i) {
            Some(index) => *index,
            None => {
                log::error!(
                    "clump {} index out of range [0,{}) got {}",
                    self.id,
                    self.indices.len(),
                    i
                );
                0
            }
        }
    }

    /// Write `value` at every member index
    pub fn write_clump_to_grid_with_value<G: GridData + ?Sized>(&self, grid: &mut G, value: f64) {
        for &index in &self.indices {
            grid.set_value_at_index(index, value);
        }
    }
}

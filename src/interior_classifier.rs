//! Inside/outside classification of the cells in a boundary's bounding box
//!
//! Every row is swept left to right and right to left, and every column top
//! to bottom and bottom to top. A cell reached from the box border without
//! crossing an edge cell is outside for that sweep direction; edge cells are
//! inside; anything else is only possibly inside. The row and column verdicts
//! are then fused:
//!
//! | row \ column | Inside | Outside | Maybe   |
//! |--------------|--------|---------|---------|
//! | **Inside**   | inside | inside  | inside  |
//! | **Outside**  | inside | outside | outside |
//! | **Maybe**    | inside | outside | inside  |
//!
//! Cells that are "maybe" in both directions are ambiguous and count as
//! inside.

use crate::boundary_tracer::{BoundaryBox, BoundaryTracer};
use crate::error::{GridError, Result};

/// Fused verdict for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Inside,
    Outside,
    /// Neither sweep reached the cell from outside; treated as inside
    Ambiguous,
}

impl Classification {
    pub fn is_inside(self) -> bool {
        !matches!(self, Classification::Outside)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    In,
    Out,
    Maybe,
}

/// Classification of every cell in a boundary's bounding box, addressed in
/// box-local coordinates
#[derive(Debug, Clone)]
pub struct InteriorClassifier {
    bounds: BoundaryBox,
    nx: usize,
    ny: usize,
    cells: Vec<Classification>,
}

impl InteriorClassifier {
    /// Classify the bounding box of a finished boundary
    pub fn new(tracer: &BoundaryTracer) -> Result<Self> {
        let Some(bounds) = tracer.bounding_box() else {
            log::error!("constructing the edges");
            return Err(GridError::EmptyBoundary);
        };
        let nx = bounds.width();
        let ny = bounds.height();
        log::trace!(
            "Range ({},{}) to ({},{}) so nx,ny={},{}",
            bounds.x0,
            bounds.y0,
            bounds.x1,
            bounds.y1,
            nx,
            ny
        );

        let edge = tracer.local_edge_mask();

        let mut by_row = vec![Sweep::Maybe; nx * ny];
        for y in 0..ny {
            sweep_line(&edge, &mut by_row, (0..nx).map(|x| y * nx + x));
        }
        let mut by_column = vec![Sweep::Maybe; nx * ny];
        for x in 0..nx {
            sweep_line(&edge, &mut by_column, (0..ny).map(|y| y * nx + x));
        }

        let cells = by_row
            .iter()
            .zip(&by_column)
            .enumerate()
            .map(|(i, (row, column))| match (row, column) {
                (Sweep::In, _) | (_, Sweep::In) => Classification::Inside,
                (Sweep::Out, _) | (_, Sweep::Out) => Classification::Outside,
                _ => {
                    log::trace!("AMBIGUOUS Point {}", i);
                    Classification::Ambiguous
                }
            })
            .collect();

        Ok(Self {
            bounds,
            nx,
            ny,
            cells,
        })
    }

    /// Box width in cells
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Box height in cells
    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn bounding_box(&self) -> BoundaryBox {
        self.bounds
    }

    /// Verdict for local cell `(x, y)`, `None` outside the box
    pub fn classification(&self, x: i64, y: i64) -> Option<Classification> {
        if x < 0 || y < 0 || x as usize >= self.nx || y as usize >= self.ny {
            return None;
        }
        Some(self.cells[y as usize * self.nx + x as usize])
    }

    /// True for inside and ambiguous cells. Cells outside the box are never
    /// inside.
    pub fn is_inside(&self, x: i64, y: i64) -> bool {
        self.classification(x, y).is_some_and(Classification::is_inside)
    }
}

/// Sweep one row or column in both directions
fn sweep_line<I>(edge: &[bool], out: &mut [Sweep], line: I)
where
    I: DoubleEndedIterator<Item = usize> + Clone,
{
    let mut outside = true;
    for i in line.clone() {
        if edge[i] {
            outside = false;
            out[i] = Sweep::In;
        } else {
            out[i] = if outside { Sweep::Out } else { Sweep::Maybe };
        }
    }

    // the reverse pass can only downgrade to outside
    for i in line.rev() {
        if edge[i] {
            break;
        }
        out[i] = Sweep::Out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: i64, y0: i64, x1: i64, y1: i64) -> BoundaryTracer {
        let mut tracer = BoundaryTracer::new(20, 20);
        tracer.add(x0, y0);
        tracer.add(x1, y0);
        tracer.add(x1, y1);
        tracer.add(x0, y1);
        tracer.close();
        tracer
    }

    #[test]
    fn test_center_of_3x3_loop() {
        let classifier = InteriorClassifier::new(&square(4, 4, 6, 6)).unwrap();
        assert_eq!((classifier.nx(), classifier.ny()), (3, 3));
        // neither sweep can reach the center from outside
        assert_eq!(classifier.classification(1, 1), Some(Classification::Ambiguous));
        assert!(classifier.is_inside(1, 1));
        assert_eq!(classifier.classification(0, 0), Some(Classification::Inside));
    }

    #[test]
    fn test_outside_box_never_classified() {
        let classifier = InteriorClassifier::new(&square(0, 0, 2, 2)).unwrap();
        assert_eq!(classifier.classification(-1, 0), None);
        assert_eq!(classifier.classification(3, 1), None);
        assert!(!classifier.is_inside(0, 5));
    }

    #[test]
    fn test_notch_is_outside() {
        // a U shape open at the top: the notch is reachable from above
        let mut tracer = BoundaryTracer::new(10, 10);
        for (x, y) in [(0, 0), (0, 4), (4, 4), (4, 0), (3, 0), (3, 3), (1, 3), (1, 0)] {
            tracer.add(x, y);
        }
        tracer.close();
        let classifier = InteriorClassifier::new(&tracer).unwrap();
        assert!(!classifier.is_inside(2, 0));
        assert!(!classifier.is_inside(2, 2));
        assert!(classifier.is_inside(2, 3));
    }

    #[test]
    fn test_empty_boundary_is_error() {
        let tracer = BoundaryTracer::new(4, 4);
        assert!(matches!(
            InteriorClassifier::new(&tracer),
            Err(GridError::EmptyBoundary)
        ));
    }

    #[test]
    fn test_ambiguous_counts_as_inside() {
        assert!(Classification::Ambiguous.is_inside());
        assert!(!Classification::Outside.is_inside());
    }
}

/*!
This module holds the fixed geometry of the seven [`ShapeKind`]s.

Every shape is described relative to its *pivot*, the one cell that keeps its position when the
shape rotates. For every [`Rotation`] a shape has three further cells at fixed offsets from the
pivot, and a [`PivotBounds`] saying where the pivot may go so that none of the four cells leaves the
well's sides or bottom.

Note that the bounds are written out per shape and rotation instead of being derived from the
offsets; the tests in this module check that both tables agree.
*/

use crate::{add, Cell, Color, Coord, Offset, Rotation, ShapeKind};

/// The legal pivot positions of a shape in a given rotation.
///
/// Pivot `x` must lie in `x_min..=x_max` and pivot `y` must be strictly below `y_limit`.
/// There is no upper limit on how far above the well a pivot may be.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub struct PivotBounds {
    /// Smallest legal pivot column.
    pub x_min: i32,
    /// Largest legal pivot column.
    pub x_max: i32,
    /// Pivot row must be less than this.
    pub y_limit: i32,
}

impl PivotBounds {
    const fn new(x_min: i32, x_max: i32, y_limit: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_limit,
        }
    }

    /// Whether a pivot position lies within these bounds.
    pub const fn contains(&self, (x, y): Coord) -> bool {
        self.x_min <= x && x <= self.x_max && y < self.y_limit
    }
}

impl ShapeKind {
    /// All `ShapeKind` enum variants in order.
    ///
    /// Note that `ShapeKind::VARIANTS[s as usize] == s` always holds.
    pub const VARIANTS: [Self; 7] = {
        use ShapeKind::*;
        [L, J, O, I, T, Z, S]
    };

    /// The fixed display color of the shape.
    pub const fn color(&self) -> Color {
        match self {
            ShapeKind::L => Color::Green,
            ShapeKind::J => Color::Orange,
            ShapeKind::O => Color::Magenta,
            ShapeKind::I => Color::Blue,
            ShapeKind::T => Color::Yellow,
            ShapeKind::Z => Color::Red,
            ShapeKind::S => Color::Cyan,
        }
    }

    /// Returns the offsets of the three non-pivot cells, given a rotation.
    ///
    /// ```text
    ///     L (N)     L (E)        L (S)      L (W)
    ///
    ///   [ ]                    [ ][ ]           [ ]
    ///   [p]      [ ][p][ ]        [p]     [ ][p][ ]
    ///   [ ][ ]   [ ]              [ ]
    /// ```
    #[rustfmt::skip]
    pub const fn offsets(&self, rotation: Rotation) -> [Offset; 3] {
        use Rotation::*;
        match self {
            ShapeKind::L => match rotation {
                North => [( 0, -1), ( 0, 1), ( 1,  1)],
                East  => [( 1,  0), (-1, 0), (-1,  1)],
                South => [( 0,  1), ( 0,-1), (-1, -1)],
                West  => [(-1,  0), ( 1, 0), ( 1, -1)],
            },
            ShapeKind::J => match rotation {
                North => [( 0, -1), ( 0, 1), (-1,  1)],
                East  => [( 1,  0), (-1, 0), (-1, -1)],
                South => [( 0,  1), ( 0,-1), ( 1, -1)],
                West  => [(-1,  0), ( 1, 0), ( 1,  1)],
            },
            ShapeKind::O => [(0, -1), (1, -1), (1, 0)],
            ShapeKind::I => match rotation {
                North | South => [( 0, -1), ( 0, 1), ( 0, 2)],
                East  | West  => [(-1,  0), ( 1, 0), ( 2, 0)],
            },
            ShapeKind::T => match rotation {
                North => [(-1,  0), ( 1, 0), ( 0, -1)],
                East  => [( 0, -1), ( 0, 1), ( 1,  0)],
                South => [( 1,  0), (-1, 0), ( 0,  1)],
                West  => [( 0,  1), ( 0,-1), (-1,  0)],
            },
            ShapeKind::Z => match rotation {
                North | South => [(-1,  0), ( 0, 1), ( 1, 1)],
                East  | West  => [( 0, -1), (-1, 0), (-1, 1)],
            },
            ShapeKind::S => match rotation {
                North | South => [( 1,  0), ( 0, 1), (-1, 1)],
                East  | West  => [( 0, -1), ( 1, 0), ( 1, 1)],
            },
        }
    }

    /// Where the pivot may be placed in a given rotation without any cell leaving the well's
    /// sides or bottom.
    #[rustfmt::skip]
    pub const fn bounds(&self, rotation: Rotation) -> PivotBounds {
        use Rotation::*;
        match self {
            ShapeKind::L => match rotation {
                North => PivotBounds::new(0, 8, 19),
                East  => PivotBounds::new(1, 8, 19),
                South => PivotBounds::new(1, 9, 19),
                West  => PivotBounds::new(1, 8, 20),
            },
            ShapeKind::J => match rotation {
                North => PivotBounds::new(1, 9, 19),
                East  => PivotBounds::new(1, 8, 20),
                South => PivotBounds::new(0, 8, 19),
                West  => PivotBounds::new(1, 8, 19),
            },
            ShapeKind::O => PivotBounds::new(0, 8, 20),
            ShapeKind::I => match rotation {
                North | South => PivotBounds::new(0, 9, 18),
                East  | West  => PivotBounds::new(1, 7, 20),
            },
            ShapeKind::T => match rotation {
                North => PivotBounds::new(1, 8, 20),
                East  => PivotBounds::new(0, 8, 19),
                South => PivotBounds::new(1, 8, 19),
                West  => PivotBounds::new(1, 9, 19),
            },
            ShapeKind::Z => match rotation {
                North | South => PivotBounds::new(1, 8, 19),
                East  | West  => PivotBounds::new(1, 9, 19),
            },
            ShapeKind::S => match rotation {
                North | South => PivotBounds::new(1, 8, 19),
                East  | West  => PivotBounds::new(0, 8, 19),
            },
        }
    }

    /// Whether a pivot position and rotation keep the shape within the well's sides and bottom.
    ///
    /// This ignores settled cells entirely.
    pub const fn in_bounds(&self, pivot: Coord, rotation: Rotation) -> bool {
        self.bounds(rotation).contains(pivot)
    }

    /// Returns the four cells of the shape, pivot first, for a pivot position and rotation.
    pub fn cells_for(&self, pivot: Coord, rotation: Rotation) -> [Cell; 4] {
        let color = self.color();
        let [a, b, c] = self.offsets(rotation).map(|offset| add(pivot, offset));
        [pivot, a, b, c].map(|(x, y)| Cell::new(x, y, color))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::Engine;

    fn inside_well(cells: &[Cell; 4]) -> bool {
        cells
            .iter()
            .all(|cell| 0 <= cell.x && cell.x < Engine::WIDTH && cell.y < Engine::HEIGHT)
    }

    #[test]
    fn four_distinct_cells_including_pivot() {
        for shape in ShapeKind::VARIANTS {
            for rotation in Rotation::VARIANTS {
                let cells = shape.cells_for((4, 5), rotation);
                let coords: HashSet<_> = cells.iter().map(Cell::coord).collect();
                assert_eq!(coords.len(), 4, "{shape:?} {rotation:?}");
                assert_eq!(cells[0].coord(), (4, 5));
                assert!(cells.iter().all(|cell| cell.color == shape.color()));
            }
        }
    }

    #[test]
    fn cells_stay_connected() {
        for shape in ShapeKind::VARIANTS {
            for rotation in Rotation::VARIANTS {
                let cells = shape.cells_for((4, 5), rotation);
                for cell in &cells {
                    let has_neighbor = cells.iter().any(|other| {
                        (other.x - cell.x).abs() + (other.y - cell.y).abs() == 1
                    });
                    assert!(has_neighbor, "{shape:?} {rotation:?} {cell:?}");
                }
            }
        }
    }

    #[test]
    fn bounds_table_matches_offsets() {
        // The hand-written bounds must accept a pivot iff every resulting cell is inside the well.
        for shape in ShapeKind::VARIANTS {
            for rotation in Rotation::VARIANTS {
                for x in -3..=12 {
                    for y in -4..=22 {
                        let cells = shape.cells_for((x, y), rotation);
                        assert_eq!(
                            shape.in_bounds((x, y), rotation),
                            inside_well(&cells),
                            "{shape:?} {rotation:?} pivot ({x}, {y})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn symmetric_shapes_repeat() {
        for rotation in Rotation::VARIANTS {
            assert_eq!(
                ShapeKind::O.offsets(rotation),
                ShapeKind::O.offsets(Rotation::North)
            );
            for shape in [ShapeKind::I, ShapeKind::Z, ShapeKind::S] {
                assert_eq!(shape.offsets(rotation), shape.offsets(rotation.turn(2)));
                assert_ne!(shape.offsets(rotation), shape.offsets(rotation.turn(1)));
            }
        }
        for shape in [ShapeKind::L, ShapeKind::J, ShapeKind::T] {
            let layouts: HashSet<_> = Rotation::VARIANTS
                .iter()
                .map(|&rotation| shape.offsets(rotation))
                .collect();
            assert_eq!(layouts.len(), 4, "{shape:?}");
        }
    }

    #[test]
    fn l_shape_bounds_examples() {
        assert!(ShapeKind::L.in_bounds((0, 0), Rotation::North));
        assert!(ShapeKind::L.in_bounds((8, 0), Rotation::North));
        assert!(!ShapeKind::L.in_bounds((9, 0), Rotation::North));
        assert!(!ShapeKind::L.in_bounds((0, 0), Rotation::South));
        assert!(ShapeKind::L.in_bounds((9, 0), Rotation::South));
        assert!(ShapeKind::L.in_bounds((4, -7), Rotation::North));
    }
}

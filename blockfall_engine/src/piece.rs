/*!
This module handles the falling piece and its movement rules.
*/

use crate::{board::SettledCells, Cell, Coord, Engine, Rotation, ShapeKind};

/// A shape in play.
///
/// Only the pivot position and rotation are stored; the four cells are recomputed from them on
/// demand by [`Piece::cells`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    /// Which shape the piece is.
    pub kind: ShapeKind,
    /// Position of the pivot cell.
    pub pivot: Coord,
    /// How the shape is turned.
    pub rotation: Rotation,
    /// Set once a drop attempt failed to move the piece.
    pub settled: bool,
}

impl Piece {
    /// Creates a piece at the spawn position, facing north.
    pub const fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            pivot: Engine::SPAWN,
            rotation: Rotation::North,
            settled: false,
        }
    }

    /// Returns the four cells of the piece, pivot first.
    pub fn cells(&self) -> [Cell; 4] {
        self.kind.cells_for(self.pivot, self.rotation)
    }

    /// Whether the piece could legally be placed at `pivot` with `rotation`.
    ///
    /// This holds iff the pivot lies within the shape's bounds for that rotation and none of the
    /// resulting cells coincides with a settled cell.
    pub fn fits_at(&self, settled: &SettledCells, pivot: Coord, rotation: Rotation) -> bool {
        self.kind.in_bounds(pivot, rotation)
            && !settled.collides(&self.kind.cells_for(pivot, rotation))
    }

    /// Whether the piece legally fits where it currently is.
    pub fn fits(&self, settled: &SettledCells) -> bool {
        self.fits_at(settled, self.pivot, self.rotation)
    }

    /// Moves the piece if the target is legal; returns whether it moved.
    fn reposition(&mut self, settled: &SettledCells, pivot: Coord, rotation: Rotation) -> bool {
        let legal = self.fits_at(settled, pivot, rotation);
        if legal {
            self.pivot = pivot;
            self.rotation = rotation;
        }
        legal
    }

    /// Tries to move one column to the left.
    pub fn move_left(&mut self, settled: &SettledCells) -> bool {
        let (x, y) = self.pivot;
        self.reposition(settled, (x - 1, y), self.rotation)
    }

    /// Tries to move one column to the right.
    pub fn move_right(&mut self, settled: &SettledCells) -> bool {
        let (x, y) = self.pivot;
        self.reposition(settled, (x + 1, y), self.rotation)
    }

    /// Tries to turn clockwise around the pivot. There are no wall kicks.
    pub fn rotate_clockwise(&mut self, settled: &SettledCells) -> bool {
        self.reposition(settled, self.pivot, self.rotation.clockwise())
    }

    /// Tries to turn counter-clockwise around the pivot. There are no wall kicks.
    pub fn rotate_counter_clockwise(&mut self, settled: &SettledCells) -> bool {
        self.reposition(settled, self.pivot, self.rotation.counter_clockwise())
    }

    /// Tries to move one row down.
    ///
    /// If that is illegal, the piece stays where it is and becomes [settled](Piece::is_settled).
    pub fn drop(&mut self, settled: &SettledCells) -> bool {
        if self.settled {
            return false;
        }
        let (x, y) = self.pivot;
        let moved = self.reposition(settled, (x, y + 1), self.rotation);
        if !moved {
            self.settled = true;
        }
        moved
    }

    /// Whether a drop attempt has failed, i.e. the piece came to rest.
    pub const fn is_settled(&self) -> bool {
        self.settled
    }
}

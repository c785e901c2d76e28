/*!
This module handles the board: the settled occupancy of the well plus the two live pieces.
*/

use std::collections::BTreeMap;

use crate::{Cell, Color, Coord, Engine, Piece};

/// The set of settled cells, unique by position.
///
/// Occupancy is stored sparsely, keyed by [`Coord`], rather than as a matrix.
#[derive(Eq, PartialEq, Clone, Default, Debug)]
pub struct SettledCells {
    cells: BTreeMap<Coord, Color>,
}

/// The well: settled cells, the piece currently falling and the piece to fall next.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Board {
    settled: SettledCells,
    active_piece: Piece,
    next_piece: Piece,
}

impl SettledCells {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a settled cell exists at the given position.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.cells.contains_key(&(x, y))
    }

    /// Whether any of the given cells coincides with a settled cell.
    pub fn collides(&self, cells: &[Cell]) -> bool {
        cells.iter().any(|cell| self.is_occupied(cell.x, cell.y))
    }

    /// Inserts cells; a cell at an already occupied position replaces the old one.
    pub fn insert(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.cells
            .extend(cells.into_iter().map(|cell| (cell.coord(), cell.color)));
    }

    /// How many settled cells lie on row `y`.
    pub fn row_len(&self, y: i32) -> usize {
        self.cells.keys().filter(|&&(_, cy)| cy == y).count()
    }

    /// Whether row `y` is completely filled.
    pub fn is_row_complete(&self, y: i32) -> bool {
        self.row_len(y) == Engine::WIDTH as usize
    }

    /// Deletes every cell on row `y` and moves every cell above it down by one.
    pub fn remove_row(&mut self, y: i32) {
        self.cells = std::mem::take(&mut self.cells)
            .into_iter()
            .filter(|&((_, cy), _)| cy != y)
            .map(|((cx, cy), color)| if cy < y { ((cx, cy + 1), color) } else { ((cx, cy), color) })
            .collect();
    }

    /// Removes several rows; rows are processed in ascending order so that a removal never
    /// touches cells shifted by an earlier one into a different pending row.
    pub fn remove_rows(&mut self, rows: &[i32]) {
        let mut rows = rows.to_vec();
        rows.sort_unstable();
        rows.dedup();
        for y in rows {
            self.remove_row(y);
        }
    }

    /// Iterates over all settled cells, ordered by position.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .map(|(&(x, y), &color)| Cell::new(x, y, color))
    }

    /// Number of settled cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether there are no settled cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<Cell> for SettledCells {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut settled = SettledCells::new();
        settled.insert(iter);
        settled
    }
}

impl Board {
    /// Creates a board with no settled cells.
    pub fn new(active_piece: Piece, next_piece: Piece) -> Self {
        Self::with_settled(SettledCells::new(), active_piece, next_piece)
    }

    /// Creates a board with a pre-existing layout of settled cells.
    pub fn with_settled(settled: SettledCells, active_piece: Piece, next_piece: Piece) -> Self {
        Self {
            settled,
            active_piece,
            next_piece,
        }
    }

    /// Read accessor for the settled cells.
    pub const fn settled(&self) -> &SettledCells {
        &self.settled
    }

    /// The piece currently falling.
    pub const fn active_piece(&self) -> &Piece {
        &self.active_piece
    }

    /// The piece that will fall after the active one.
    pub const fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    /// Whether a settled cell exists at the given position.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.settled.is_occupied(x, y)
    }

    /// Adds the cells of a piece that just settled.
    pub fn commit_settled_cells(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.settled.insert(cells);
    }

    /// Deletes all settled cells of row `y`, shifting everything above it down by one.
    pub fn remove_row(&mut self, y: i32) {
        self.settled.remove_row(y);
    }

    /// Deletes several rows, see [`SettledCells::remove_rows`].
    pub fn remove_rows(&mut self, rows: &[i32]) {
        self.settled.remove_rows(rows);
    }

    /// Tries to move the active piece one column left.
    pub fn move_left(&mut self) -> bool {
        self.active_piece.move_left(&self.settled)
    }

    /// Tries to move the active piece one column right.
    pub fn move_right(&mut self) -> bool {
        self.active_piece.move_right(&self.settled)
    }

    /// Tries to rotate the active piece clockwise.
    pub fn rotate_clockwise(&mut self) -> bool {
        self.active_piece.rotate_clockwise(&self.settled)
    }

    /// Tries to rotate the active piece counter-clockwise.
    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.active_piece.rotate_counter_clockwise(&self.settled)
    }

    /// Tries to move the active piece one row down, marking it settled if it cannot.
    pub fn drop(&mut self) -> bool {
        self.active_piece.drop(&self.settled)
    }

    /// Makes the next piece the active one, and `upcoming` the next one.
    pub fn promote_next_piece(&mut self, upcoming: Piece) {
        self.active_piece = std::mem::replace(&mut self.next_piece, upcoming);
    }
}

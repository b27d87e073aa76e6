//! Ordered enumeration of live cells.
//!
//! [`Cursor`] is the traversal state machine: a version snapshot plus the
//! current `(row, word, pending bits)` position, advanced by
//! [`Cursor::step`]. It holds no borrow of the grid, so the grid can be
//! mutated between steps, and the next step reports
//! [`GridError::ConcurrentModification`].
//!
//! [`Cells`] wraps a cursor around a shared borrow. The borrow rules out
//! mutation, so it is an ordinary `Iterator<Item = Cell>`.

use std::fmt;
use std::ops::Bound;

use crate::error::GridError;
use crate::grid::{join_column, SparseBoolGrid};

/// A live cell position yielded by enumeration.
///
/// Ordered by `(y, x)`, which is the enumeration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Cell {
    /// Construct a cell at `(x, y)`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Cell> for (i32, i32) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Start,
    /// Inside word `word` of row `row`; `pending` holds the bits not yet
    /// yielded.
    At {
        row: i32,
        word: i32,
        pending: u64,
    },
    Done,
}

/// Detached traversal state over a [`SparseBoolGrid`].
///
/// Restartable from scratch with [`reset`](Self::reset); never mid-flight.
///
/// ```
/// use petri_grid::{GridError, SparseBoolGrid};
///
/// let mut grid: SparseBoolGrid = [(0, 0), (1, 0)].into_iter().collect();
/// let mut cursor = grid.cursor();
/// assert!(cursor.step(&grid).unwrap().is_some());
///
/// grid.set(5, 5, true);
/// assert!(matches!(
///     cursor.step(&grid),
///     Err(GridError::ConcurrentModification { .. })
/// ));
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    version: u64,
    position: Position,
}

impl Cursor {
    /// Start a traversal of `grid`, snapshotting its version.
    pub fn new(grid: &SparseBoolGrid) -> Self {
        Self {
            version: grid.version(),
            position: Position::Start,
        }
    }

    /// Advance one cell.
    ///
    /// Returns `Ok(None)` once every live cell has been yielded, and
    /// `Err(ConcurrentModification)` if `grid` changed since the traversal
    /// started.
    pub fn step(&mut self, grid: &SparseBoolGrid) -> Result<Option<Cell>, GridError> {
        let found = grid.version();
        if found != self.version {
            return Err(GridError::ConcurrentModification {
                expected: self.version,
                found,
            });
        }
        Ok(self.advance(grid))
    }

    /// Restart from the first cell of `grid` with a fresh version snapshot.
    pub fn reset(&mut self, grid: &SparseBoolGrid) {
        *self = Self::new(grid);
    }

    /// Whether the traversal has run off the end.
    pub fn is_done(&self) -> bool {
        self.position == Position::Done
    }

    /// Advance without the version check.
    fn advance(&mut self, grid: &SparseBoolGrid) -> Option<Cell> {
        loop {
            let (row, word, pending) = match self.position {
                Position::Done => return None,
                Position::Start => match seek(grid, Bound::Unbounded, Bound::Unbounded) {
                    Some(at) => at,
                    None => {
                        self.position = Position::Done;
                        return None;
                    }
                },
                Position::At { row, word, pending } => (row, word, pending),
            };

            if pending != 0 {
                let bit = pending.trailing_zeros();
                self.position = Position::At {
                    row,
                    word,
                    pending: pending & (pending - 1),
                };
                return Some(Cell::new(join_column(word, bit), row));
            }

            // Word exhausted: next word in this row, else the next row.
            self.position = match seek(grid, Bound::Included(row), Bound::Excluded(word)) {
                Some((row, word, pending)) => Position::At { row, word, pending },
                None => Position::Done,
            };
        }
    }
}

/// Find the first stored word at or after the given row, starting the word
/// search at `first_word` within that first row and from the beginning in
/// every later row. Rows with no words are skipped.
fn seek(
    grid: &SparseBoolGrid,
    first_row: Bound<i32>,
    first_word: Bound<i32>,
) -> Option<(i32, i32, u64)> {
    let mut word_bound = first_word;
    for (&y, row) in grid.rows().range((first_row, Bound::Unbounded)) {
        if let Some((&w, &bits)) = row.range((word_bound, Bound::Unbounded)).next() {
            return Some((y, w, bits));
        }
        word_bound = Bound::Unbounded;
    }
    None
}

/// Borrowing iterator over the live cells of a grid.
///
/// Yields cells ascending by row, then word, then bit.
#[derive(Clone, Debug)]
pub struct Cells<'a> {
    grid: &'a SparseBoolGrid,
    cursor: Cursor,
}

impl<'a> Cells<'a> {
    pub(crate) fn new(grid: &'a SparseBoolGrid) -> Self {
        Self {
            grid,
            cursor: Cursor::new(grid),
        }
    }
}

impl Iterator for Cells<'_> {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        // The shared borrow pins the version, so the check in `step` is
        // not needed here.
        self.cursor.advance(self.grid)
    }
}

impl std::iter::FusedIterator for Cells<'_> {}

impl SparseBoolGrid {
    /// Start a detached traversal (see [`Cursor`]).
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_of(cells: &[(i32, i32)]) -> SparseBoolGrid {
        cells.iter().copied().collect()
    }

    fn drain(grid: &SparseBoolGrid) -> Vec<(i32, i32)> {
        grid.cells().map(Into::into).collect()
    }

    #[test]
    fn empty_grid_yields_nothing() {
        let g = SparseBoolGrid::new();
        assert_eq!(g.cells().next(), None);
        let mut c = g.cursor();
        assert_eq!(c.step(&g), Ok(None));
        assert!(c.is_done());
    }

    #[test]
    fn order_is_row_then_word_then_bit() {
        let g = grid_of(&[(0, 1), (70, 0), (0, 0)]);
        assert_eq!(drain(&g), vec![(0, 0), (70, 0), (0, 1)]);
    }

    #[test]
    fn negative_coordinates_sort_first() {
        let g = grid_of(&[(5, 0), (-1, 0), (-64, 0), (-65, 0), (3, -2)]);
        assert_eq!(drain(&g), vec![(3, -2), (-65, 0), (-64, 0), (-1, 0), (5, 0)]);
    }

    #[test]
    fn full_word_yields_all_64_bits_in_order() {
        let cells: Vec<(i32, i32)> = (64..128).map(|x| (x, 7)).collect();
        let g = grid_of(&cells);
        assert_eq!(g.word_count(), 1);
        assert_eq!(drain(&g), cells);
    }

    #[test]
    fn extreme_columns_round_trip() {
        let g = grid_of(&[(i32::MIN, i32::MIN), (i32::MAX, i32::MAX)]);
        assert_eq!(
            drain(&g),
            vec![(i32::MIN, i32::MIN), (i32::MAX, i32::MAX)]
        );
    }

    #[test]
    fn cursor_matches_iterator() {
        let g = grid_of(&[(1, 1), (2, 1), (300, 1), (-7, 4)]);
        let mut c = g.cursor();
        let mut stepped = Vec::new();
        while let Some(cell) = c.step(&g).unwrap() {
            stepped.push(cell);
        }
        assert_eq!(stepped, g.cells().collect::<Vec<_>>());
        // Exhausted cursors stay exhausted.
        assert_eq!(c.step(&g), Ok(None));
    }

    #[test]
    fn mutation_mid_traversal_fails_next_step() {
        let mut g = grid_of(&[(0, 0), (1, 0), (2, 0)]);
        let mut c = g.cursor();
        assert_eq!(c.step(&g), Ok(Some(Cell::new(0, 0))));

        let before = g.version();
        g.set(1, 0, false);
        assert_eq!(
            c.step(&g),
            Err(GridError::ConcurrentModification {
                expected: before,
                found: before + 1,
            })
        );
    }

    #[test]
    fn redundant_write_does_not_invalidate_cursor() {
        let mut g = grid_of(&[(0, 0), (1, 0)]);
        let mut c = g.cursor();
        c.step(&g).unwrap();
        g.set(0, 0, true);
        g.set(50, 50, false);
        assert_eq!(c.step(&g), Ok(Some(Cell::new(1, 0))));
    }

    #[test]
    fn reset_restarts_with_new_snapshot() {
        let mut g = grid_of(&[(0, 0)]);
        let mut c = g.cursor();
        c.step(&g).unwrap();
        g.set(9, 9, true);
        assert!(c.step(&g).is_err());

        c.reset(&g);
        assert_eq!(c.step(&g), Ok(Some(Cell::new(0, 0))));
        assert_eq!(c.step(&g), Ok(Some(Cell::new(9, 9))));
        assert_eq!(c.step(&g), Ok(None));
    }

    #[test]
    fn cell_ordering_matches_enumeration() {
        let mut cells = vec![Cell::new(5, 0), Cell::new(0, 1), Cell::new(-3, 0)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(-3, 0), Cell::new(5, 0), Cell::new(0, 1)]);
        assert_eq!(Cell::new(2, 3).to_string(), "(2, 3)");
    }

    proptest! {
        #[test]
        fn enumeration_is_sorted_and_complete(
            cells in proptest::collection::vec((-300i32..300, -20i32..20), 0..100),
        ) {
            let g = grid_of(&cells);
            let yielded: Vec<Cell> = g.cells().collect();
            let mut expected: Vec<Cell> = cells.iter().copied().map(Cell::from).collect();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(yielded, expected);
        }
    }
}

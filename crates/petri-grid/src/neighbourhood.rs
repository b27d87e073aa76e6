//! Moore neighbourhood on the unbounded plane.

use smallvec::SmallVec;

use crate::cells::Cell;

/// All 8 offsets `(dx, dy)`: W, E, N, S, NW, NE, SW, SE.
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// The Moore neighbours of `(x, y)`.
///
/// There is no wraparound: an offset that would leave the `i32` range is
/// omitted, since no cell can live there.
pub fn moore_neighbours(x: i32, y: i32) -> SmallVec<[Cell; 8]> {
    MOORE_OFFSETS
        .iter()
        .filter_map(|&(dx, dy)| Some(Cell::new(x.checked_add(dx)?, y.checked_add(dy)?)))
        .collect()
}

//! The sparse bit-packed boolean grid.
//!
//! [`SparseBoolGrid`] maps row index `y` to an ordered map of word index
//! `x >> 6` to a 64-bit word, where bit `x & 63` is the liveness of column
//! `x`. Both maps are ordered ascending; enumeration relies on that order.

use std::collections::BTreeMap;
use std::ops::{BitOr, BitOrAssign, Sub, SubAssign};

use crate::bounds::Bounds;
use crate::cells::{Cell, Cells};
use crate::neighbourhood::moore_neighbours;

/// Ordered word map for a single row: word index → packed bits.
pub(crate) type Row = BTreeMap<i32, u64>;

/// Number of columns packed into one word.
pub const WORD_BITS: i32 = 64;

const WORD_SHIFT: u32 = 6;
const BIT_MASK: i32 = WORD_BITS - 1;

/// Split a column into `(word_index, bit_offset)`.
///
/// The shift is arithmetic, so negative columns land in negative words and
/// `x == (word << 6) + bit` holds for every `i32`.
#[inline]
pub(crate) fn split_column(x: i32) -> (i32, u32) {
    (x >> WORD_SHIFT, (x & BIT_MASK) as u32)
}

/// Rebuild a column from `(word_index, bit_offset)`.
#[inline]
pub(crate) fn join_column(word: i32, bit: u32) -> i32 {
    (word << WORD_SHIFT) + bit as i32
}

/// A sparse set of live cells on an unbounded plane.
///
/// # Storage invariants
///
/// - No stored word is zero and no stored row is empty; every operation
///   prunes eagerly, so memory tracks the live population rather than the
///   board extent.
/// - `get(x, y)` is `true` iff row `y`, word `x >> 6` and bit `x & 63` all
///   exist.
///
/// # Versioning
///
/// The version increments whenever a stored bit actually changes. It exists
/// so a detached [`Cursor`](crate::Cursor) can detect that the grid moved
/// underneath it; it is not a synchronisation primitive.
///
/// # Equality
///
/// Two grids are equal when they hold the same live cells, regardless of
/// bounds or version.
#[derive(Clone, Debug, Default)]
pub struct SparseBoolGrid {
    rows: BTreeMap<i32, Row>,
    bounds: Bounds,
    version: u64,
}

impl SparseBoolGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Liveness of `(x, y)`. Never-set cells are dead.
    pub fn get(&self, x: i32, y: i32) -> bool {
        let (word_index, bit) = split_column(x);
        self.rows
            .get(&y)
            .and_then(|row| row.get(&word_index))
            .is_some_and(|word| (word >> bit) & 1 == 1)
    }

    /// Set the liveness of `(x, y)`.
    ///
    /// The scan bounds grow on every call, including sets to `false`.
    /// Storage is only allocated when a bit turns on, and a redundant write
    /// (live to live, dead to dead) leaves storage and version untouched.
    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        self.bounds.include(x, y);

        let (word_index, bit) = split_column(x);
        let mask = 1u64 << bit;

        if value {
            let word = self
                .rows
                .entry(y)
                .or_default()
                .entry(word_index)
                .or_insert(0);
            if *word & mask != 0 {
                return;
            }
            *word |= mask;
            self.version += 1;
            return;
        }

        let Some(row) = self.rows.get_mut(&y) else {
            return;
        };
        let Some(word) = row.get_mut(&word_index) else {
            return;
        };
        if *word & mask == 0 {
            return;
        }
        *word &= !mask;
        self.version += 1;

        if *word == 0 {
            row.remove(&word_index);
            if row.is_empty() {
                self.rows.remove(&y);
            }
        }
    }

    /// Set-union: every live cell of `other` becomes live in `self`.
    ///
    /// The bounds of `other` are merged in so the union stays inside the
    /// scan rectangle. Bumps the version once per changed word.
    pub fn add(&mut self, other: &SparseBoolGrid) -> &mut Self {
        for (&y, other_row) in &other.rows {
            let row = self.rows.entry(y).or_default();
            for (&word_index, &bits) in other_row {
                let word = row.entry(word_index).or_insert(0);
                let merged = *word | bits;
                if merged != *word {
                    *word = merged;
                    self.version += 1;
                }
            }
            // `other` may only hold pruned rows, but a foreign empty row
            // must not leave one behind here either.
            if row.is_empty() {
                self.rows.remove(&y);
            }
        }
        self.bounds.merge(&other.bounds);
        self
    }

    /// Set-difference: every live cell of `other` becomes dead in `self`.
    ///
    /// Words that drop to zero and rows that become empty are pruned.
    /// Bumps the version once per changed word.
    pub fn remove(&mut self, other: &SparseBoolGrid) -> &mut Self {
        for (&y, other_row) in &other.rows {
            let Some(row) = self.rows.get_mut(&y) else {
                continue;
            };
            for (&word_index, &bits) in other_row {
                let Some(word) = row.get_mut(&word_index) else {
                    continue;
                };
                let cleared = *word & !bits;
                if cleared == *word {
                    continue;
                }
                self.version += 1;
                if cleared == 0 {
                    row.remove(&word_index);
                } else {
                    *word = cleared;
                }
            }
            if row.is_empty() {
                self.rows.remove(&y);
            }
        }
        self
    }

    /// Kill every cell. Bounds are kept (they never shrink).
    pub fn clear(&mut self) {
        if !self.rows.is_empty() {
            self.rows.clear();
            self.version += 1;
        }
    }

    /// Number of live Moore neighbours of `(x, y)`, each queried with
    /// [`get`](Self::get). Coordinates beyond the `i32` range are dead.
    pub fn live_neighbours(&self, x: i32, y: i32) -> u8 {
        moore_neighbours(x, y)
            .iter()
            .filter(|cell| self.get(cell.x, cell.y))
            .count() as u8
    }

    /// The scan rectangle (see [`Bounds`]).
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Current structural version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.rows
            .values()
            .flat_map(|row| row.values())
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    /// Whether no cell is live.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of stored rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of stored (non-zero) words across all rows.
    pub fn word_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Enumerate live cells in row, word, bit order.
    pub fn cells(&self) -> Cells<'_> {
        Cells::new(self)
    }

    pub(crate) fn rows(&self) -> &BTreeMap<i32, Row> {
        &self.rows
    }
}

impl PartialEq for SparseBoolGrid {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl Eq for SparseBoolGrid {}

impl<'a> IntoIterator for &'a SparseBoolGrid {
    type Item = Cell;
    type IntoIter = Cells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

impl<C: Into<Cell>> FromIterator<C> for SparseBoolGrid {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut grid = SparseBoolGrid::new();
        grid.extend(iter);
        grid
    }
}

impl<C: Into<Cell>> Extend<C> for SparseBoolGrid {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        for cell in iter {
            let cell = cell.into();
            self.set(cell.x, cell.y, true);
        }
    }
}

// Operators mirror `BTreeSet`: `|` is union, `-` is difference. No `Add`:
// it would shadow the in-place `add` under method resolution.

impl BitOr<&SparseBoolGrid> for SparseBoolGrid {
    type Output = SparseBoolGrid;

    fn bitor(mut self, rhs: &SparseBoolGrid) -> Self::Output {
        self.add(rhs);
        self
    }
}

impl Sub<&SparseBoolGrid> for SparseBoolGrid {
    type Output = SparseBoolGrid;

    fn sub(mut self, rhs: &SparseBoolGrid) -> Self::Output {
        self.remove(rhs);
        self
    }
}

impl BitOrAssign<&SparseBoolGrid> for SparseBoolGrid {
    fn bitor_assign(&mut self, rhs: &SparseBoolGrid) {
        self.add(rhs);
    }
}

impl SubAssign<&SparseBoolGrid> for SparseBoolGrid {
    fn sub_assign(&mut self, rhs: &SparseBoolGrid) {
        self.remove(rhs);
    }
}

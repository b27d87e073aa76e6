//! Reusable boards.
//!
//! Small hand-written patterns with known behaviour, plus deterministic
//! random soups for property-style and benchmark workloads.

use std::collections::BTreeSet;

use petri_grid::SparseBoolGrid;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// A glider heading towards `+x, +y`, in RLE.
pub const GLIDER_RLE: &str = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n";

/// Period-2 oscillator, horizontal phase, centred on `(1, 1)`.
pub fn blinker_horizontal() -> SparseBoolGrid {
    [(0, 1), (1, 1), (2, 1)].into_iter().collect()
}

/// Period-2 oscillator, vertical phase, centred on `(1, 1)`.
pub fn blinker_vertical() -> SparseBoolGrid {
    [(1, 0), (1, 1), (1, 2)].into_iter().collect()
}

/// 2x2 still life with its top-left cell at the origin.
pub fn block() -> SparseBoolGrid {
    [(0, 0), (1, 0), (0, 1), (1, 1)].into_iter().collect()
}

/// The glider from [`GLIDER_RLE`].
pub fn glider() -> SparseBoolGrid {
    [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)].into_iter().collect()
}

/// A `width x height` soup anchored at the origin where each cell is live
/// with probability `density`. Same seed, same soup.
pub fn random_soup(seed: u64, width: i32, height: i32, density: f64) -> SparseBoolGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = SparseBoolGrid::new();
    for y in 0..height {
        for x in 0..width {
            if rng.gen_bool(density) {
                grid.set(x, y, true);
            }
        }
    }
    grid
}

/// Live cells of `grid` as `(x, y)` pairs, for set comparisons.
pub fn live_set(grid: &SparseBoolGrid) -> BTreeSet<(i32, i32)> {
    grid.cells().map(Into::into).collect()
}
